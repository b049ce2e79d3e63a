#![no_main]

use arbitrary::Arbitrary;
use chunkstring::{ChunkOptions, ChunkString, Delimiters, Occurrence, SplitOptions};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Edit {
    Append(String),
    Insert(u16, String),
    Remove(u16, u16),
    Crop(u16, u16),
    Substitute(u16, u16, String),
    Truncate(u16),
    Replace(String, String),
    SubstringAfter(char),
    Trim,
    Format(String),
    Clear,
}

#[derive(Debug, Arbitrary)]
struct Input {
    chunk_len: u8,
    seed: String,
    edits: Vec<Edit>,
}

/// Clamps `(index, length)` into `0..=len`.
fn clamp(len: usize, index: u16, length: u16) -> (usize, usize) {
    let index = usize::from(index) % (len + 1);
    let length = usize::from(length) % (len - index + 1);
    (index, length)
}

fn char_to_byte(model: &str, index: usize) -> usize {
    model.char_indices().nth(index).map_or(model.len(), |(i, _)| i)
}

fn run(input: Input) {
    let options = ChunkOptions::with_max_chunk_len(usize::from(input.chunk_len % 32) + 1);
    let Ok(mut buffer) = ChunkString::from_str_with(&input.seed, options) else {
        return;
    };
    let mut model = input.seed.clone();

    for edit in input.edits {
        let len = model.chars().count();
        match edit {
            Edit::Append(text) => {
                buffer.append(&text).unwrap();
                model.push_str(&text);
            }
            Edit::Insert(index, text) => {
                let index = usize::from(index) % (len + 1);
                buffer.insert(index, &text).unwrap();
                model.insert_str(char_to_byte(&model, index), &text);
            }
            Edit::Remove(index, length) => {
                let (index, length) = clamp(len, index, length);
                buffer.remove(index, length).unwrap();
                let start = char_to_byte(&model, index);
                let end = char_to_byte(&model, index + length);
                model.replace_range(start..end, "");
            }
            Edit::Crop(index, length) => {
                let (index, length) = clamp(len, index, length);
                buffer.crop(index, length).unwrap();
                let start = char_to_byte(&model, index);
                let end = char_to_byte(&model, index + length);
                model = model[start..end].to_owned();
            }
            Edit::Substitute(index, length, text) => {
                let (index, length) = clamp(len, index, length);
                buffer.substitute(index, length, &text).unwrap();
                let start = char_to_byte(&model, index);
                let end = char_to_byte(&model, index + length);
                model.replace_range(start..end, &text);
            }
            Edit::Truncate(new_len) => {
                let new_len = usize::from(new_len);
                buffer.truncate(new_len);
                model.truncate(char_to_byte(&model, new_len));
            }
            Edit::Replace(old, new) => {
                if old.is_empty() {
                    continue;
                }
                buffer.replace(&old, &new).unwrap();
                model = model.replace(&old, &new);
            }
            Edit::SubstringAfter(marker) => {
                buffer.substring_after(marker, Occurrence::First).unwrap();
                if let Some(at) = model.find(marker) {
                    model = model[at + marker.len_utf8()..].to_owned();
                }
            }
            Edit::Trim => {
                buffer.trim();
                model = model.trim_matches(chunkstring::is_whitespace).to_owned();
            }
            Edit::Format(template) => {
                // Either the template formats or the buffer is left as it was.
                let before = buffer.len();
                if buffer.append_format(&template, &["x", "y"]).is_ok() {
                    model = buffer.to_string();
                } else {
                    assert_eq!(buffer.len(), before);
                }
            }
            Edit::Clear => {
                buffer.clear();
                model.clear();
            }
        }
        buffer.check_invariants();
        assert_eq!(buffer, model, "after edit, chunk_len {}", options.max_chunk_len);
    }

    let parts = buffer.split(&Delimiters::Whitespace, SplitOptions::omit_empty());
    let expected: Vec<&str> = model.split(chunkstring::is_whitespace).filter(|s| !s.is_empty()).collect();
    assert_eq!(parts, expected);
}

fuzz_target!(|input: Input| run(input));
