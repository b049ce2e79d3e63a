//! Builds a small status report with in-place formatting, then edits it.
//!
//! The buffer uses tiny chunks so every edit crosses chunk boundaries.
//!
//! Run with
//!
//! ```bash
//! cargo run -p chunkstring --example template_report
//! ```

use std::collections::BTreeMap;

use chunkstring::{
    ChunkError, ChunkOptions, ChunkString, Comparison, Delimiters, Occurrence, SplitOptions,
};

fn main() -> Result<(), ChunkError> {
    let services = [("api", 99.97, 12), ("db", 99.2, 3), ("cache", 100.0, 0)];

    let mut report = ChunkString::with_options(ChunkOptions::with_max_chunk_len(32));
    let mut header = BTreeMap::new();
    header.insert("report.title", "Weekly status");
    header.insert("report.week", "19");
    report.append_line_format("== {report.title} (week {report.week}) ==", &header)?;

    for (name, uptime, incidents) in services {
        let uptime = format!("{uptime:.2}%");
        let incidents = incidents.to_string();
        report.append_line_format("{0,-8}|{1,8}|{2,3}", &[name, uptime.as_str(), incidents.as_str()])?;
    }

    println!("{report}");
    println!("({} chars in {} chunks)\n", report.len(), report.chunk_count());

    // A template error leaves the report untouched.
    if let Err(err) = report.append_format("{0} {", &["oops"]) {
        println!("rejected template: {err}");
    }

    // Rewrite in place.
    report.replace("|", " | ")?;
    report.replace_inside("(", ")", "week 20")?;
    println!("{report}");

    let db_row = report.lines().find(|line| line.starts_with("db"));
    if let Some(row) = db_row {
        let mut row = ChunkString::from(row);
        row.substring_after('|', Occurrence::First)?
            .substring_before('|', Occurrence::First)?
            .trim();
        println!("db uptime: {row}");
    }

    let mut missing = report.clone();
    missing
        .substring_before("postgres", Occurrence::First)?
        .fail(|_| println!("no postgres row"))
        .succeed(|r| println!("postgres row found: {r}"));

    let words = report.split(&Delimiters::Whitespace, SplitOptions::omit_empty().max_segments(4));
    println!("first words: {words:?}");
    println!(
        "mentions CACHE (ignoring case): {}",
        report.contains_with("CACHE", Comparison::OrdinalIgnoreCase)
    );
    Ok(())
}
