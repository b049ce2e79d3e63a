#![allow(missing_docs, dead_code)]

use chunkstring::{ChunkOptions, ChunkString};

/// A short server log, line by line.
pub const LOG: [&str; 6] = [
    "2024-05-01 12:00:01 INFO  [http] GET /index.html 200",
    "2024-05-01 12:00:02 WARN  [db] slow query: 812ms",
    "2024-05-01 12:00:02 INFO  [http] GET /favicon.ico 404",
    "2024-05-01 12:00:03 ERROR [db] connection reset",
    "2024-05-01 12:00:05 INFO  [http] POST /login 302",
    "2024-05-01 12:00:07 DEBUG [cache] evicted 17 entries",
];

/// Options that put a chunk boundary every few characters.
pub fn tiny_chunks() -> ChunkOptions {
    ChunkOptions::with_max_chunk_len(5)
}

/// The whole [`LOG`] in one buffer of tiny chunks.
pub fn log_buffer() -> ChunkString {
    let mut text = ChunkString::with_options(tiny_chunks());
    for line in LOG {
        text.append_line(line).unwrap();
    }
    text
}
