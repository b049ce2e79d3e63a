use alloc::{string::String, vec::Vec};

use quickcheck::{Arbitrary, Gen};

use crate::{ChunkOptions, ChunkString};

/// Characters drawn from a tiny alphabet so that searches and replacements
/// actually hit.
const ALPHABET: [char; 7] = ['a', 'b', 'c', ' ', '\t', 'é', '\n'];

pub(crate) fn small_text(g: &mut Gen, max_len: usize) -> String {
    let len = usize::arbitrary(g) % (max_len + 1);
    (0..len).map(|_| *g.choose(&ALPHABET).unwrap_or(&'a')).collect()
}

/// A chunk limit small enough to force many chunk boundaries.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ChunkLen(pub(crate) usize);

impl ChunkLen {
    pub(crate) fn options(self) -> ChunkOptions {
        ChunkOptions::with_max_chunk_len(self.0)
    }

    pub(crate) fn buffer(self, text: &str) -> ChunkString {
        ChunkString::from_str_with(text, self.options()).unwrap()
    }
}

impl Arbitrary for ChunkLen {
    fn arbitrary(g: &mut Gen) -> Self {
        Self(1 + usize::arbitrary(g) % 8)
    }
}

/// Text over [`ALPHABET`].
#[derive(Debug, Clone)]
pub(crate) struct SmallText(pub(crate) String);

impl Arbitrary for SmallText {
    fn arbitrary(g: &mut Gen) -> Self {
        Self(small_text(g, 24))
    }

    fn shrink(&self) -> alloc::boxed::Box<dyn Iterator<Item = Self>> {
        let chars: Vec<char> = self.0.chars().collect();
        alloc::boxed::Box::new(
            chars
                .shrink()
                .map(|chars| Self(chars.into_iter().collect())),
        )
    }
}

/// One edit applied to both a [`ChunkString`] and a `Vec<char>` model.
///
/// Positions are taken modulo the current length when applied.
#[derive(Debug, Clone)]
pub(crate) enum Op {
    Append(String),
    Prepend(String),
    Insert(usize, String),
    Remove(usize, usize),
    Crop(usize, usize),
    Substitute(usize, usize, String),
    Truncate(usize),
    Replace(String, String),
    ReplaceChar(char, char),
    TrimEnd,
    PadLeft(usize),
    Clear,
}

impl Arbitrary for Op {
    fn arbitrary(g: &mut Gen) -> Self {
        let pos = |g: &mut Gen| usize::arbitrary(g) % 64;
        match usize::arbitrary(g) % 12 {
            0 => Op::Append(small_text(g, 12)),
            1 => Op::Prepend(small_text(g, 6)),
            2 => Op::Insert(pos(g), small_text(g, 12)),
            3 => Op::Remove(pos(g), pos(g)),
            4 => Op::Crop(pos(g), pos(g)),
            5 => Op::Substitute(pos(g), pos(g), small_text(g, 8)),
            6 => Op::Truncate(pos(g)),
            7 => Op::Replace(small_text(g, 2), small_text(g, 3)),
            8 => Op::ReplaceChar(*g.choose(&ALPHABET).unwrap_or(&'a'), 'x'),
            9 => Op::TrimEnd,
            10 => Op::PadLeft(pos(g)),
            _ => Op::Clear,
        }
    }
}

/// Clamps `(index, length)` into a valid range of a `len`-character text.
pub(crate) fn clamp_range(len: usize, index: usize, length: usize) -> (usize, usize) {
    let index = index % (len + 1);
    let length = length % (len - index + 1);
    (index, length)
}

impl Op {
    /// Applies the edit to `buffer` and to `model`.
    pub(crate) fn apply(&self, buffer: &mut ChunkString, model: &mut Vec<char>) {
        let len = model.len();
        match self {
            Op::Append(text) => {
                buffer.append(text).unwrap();
                model.extend(text.chars());
            }
            Op::Prepend(text) => {
                buffer.prepend(text).unwrap();
                model.splice(0..0, text.chars());
            }
            Op::Insert(index, text) => {
                let index = index % (len + 1);
                buffer.insert(index, text).unwrap();
                model.splice(index..index, text.chars());
            }
            Op::Remove(index, length) => {
                let (index, length) = clamp_range(len, *index, *length);
                buffer.remove(index, length).unwrap();
                model.drain(index..index + length);
            }
            Op::Crop(index, length) => {
                let (index, length) = clamp_range(len, *index, *length);
                buffer.crop(index, length).unwrap();
                model.truncate(index + length);
                model.drain(..index);
            }
            Op::Substitute(index, length, text) => {
                let (index, length) = clamp_range(len, *index, *length);
                buffer.substitute(index, length, text).unwrap();
                model.splice(index..index + length, text.chars());
            }
            Op::Truncate(new_len) => {
                buffer.truncate(*new_len);
                model.truncate(*new_len);
            }
            Op::Replace(old, new) => {
                if old.is_empty() {
                    return;
                }
                buffer.replace(old, new).unwrap();
                let replaced = model.iter().collect::<String>().replace(old.as_str(), new);
                *model = replaced.chars().collect();
            }
            Op::ReplaceChar(old, new) => {
                buffer.replace_char(*old, *new);
                for ch in model.iter_mut() {
                    if ch == old {
                        *ch = *new;
                    }
                }
            }
            Op::TrimEnd => {
                buffer.trim_end();
                while model.last().is_some_and(|&ch| crate::is_whitespace(ch)) {
                    model.pop();
                }
            }
            Op::PadLeft(width) => {
                buffer.pad_left(*width, '.').unwrap();
                let missing = width.saturating_sub(len);
                model.splice(0..0, core::iter::repeat_n('.', missing));
            }
            Op::Clear => {
                buffer.clear();
                model.clear();
            }
        }
    }
}
