//! Delimiter scanning and splitting.

use alloc::{string::String, vec, vec::Vec};

use crate::{
    options::{SplitMode, SplitOptions},
    search::is_whitespace,
    string::ChunkString,
};

/// What separates segments in [`ChunkString::split`].
///
/// An empty set, or a string set holding only empty strings, falls back to
/// [`Delimiters::Whitespace`].
#[derive(Debug, Clone, Copy, Default)]
pub enum Delimiters<'a> {
    /// Any character of the whitespace table.
    #[default]
    Whitespace,
    /// Any of the given characters.
    Chars(&'a [char]),
    /// Any of the given strings. At each position the first listed string
    /// that matches wins, and matches never overlap.
    Strings(&'a [&'a str]),
}

/// A delimiter match: `len` characters starting at `index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiter {
    /// Position of the first delimiter character.
    pub index: usize,
    /// Number of characters matched.
    pub len: usize,
}

impl Delimiter {
    fn end(self) -> usize {
        self.index + self.len
    }
}

impl ChunkString {
    /// Finds every delimiter match in one forward pass.
    #[must_use]
    pub fn delimit(&self, delimiters: &Delimiters<'_>) -> Vec<Delimiter> {
        match *delimiters {
            Delimiters::Chars(set) if !set.is_empty() => {
                self.delimit_chars(|ch| set.contains(&ch))
            }
            Delimiters::Strings(strings) => {
                let candidates: Vec<Vec<char>> = strings
                    .iter()
                    .filter(|s| !s.is_empty())
                    .map(|s| s.chars().collect())
                    .collect();
                if candidates.is_empty() {
                    self.delimit_chars(is_whitespace)
                } else {
                    self.delimit_strings(&candidates)
                }
            }
            Delimiters::Whitespace | Delimiters::Chars(_) => self.delimit_chars(is_whitespace),
        }
    }

    fn delimit_chars(&self, mut pred: impl FnMut(char) -> bool) -> Vec<Delimiter> {
        self.chars()
            .enumerate()
            .filter(|&(_, ch)| pred(ch))
            .map(|(index, _)| Delimiter { index, len: 1 })
            .collect()
    }

    fn delimit_strings(&self, candidates: &[Vec<char>]) -> Vec<Delimiter> {
        let len = self.len();
        let mut found = Vec::new();
        let mut position = 0;
        let mut cursor = self.cursor(0);
        while position < len {
            let hit = candidates.iter().find(|candidate| {
                candidate.len() <= len - position && self.matches_at(cursor, candidate, false)
            });
            let step = match hit {
                Some(candidate) => {
                    found.push(Delimiter {
                        index: position,
                        len: candidate.len(),
                    });
                    candidate.len()
                }
                None => 1,
            };
            for _ in 0..step {
                self.advance(&mut cursor);
            }
            position += step;
        }
        found
    }

    /// Segment ranges as `(start, end)` pairs.
    fn segment_ranges(&self, delimiters: &Delimiters<'_>, options: SplitOptions) -> Vec<(usize, usize)> {
        let len = self.len();
        let max = options.max_segments;
        let omit_empty = options.mode == SplitMode::OmitEmpty;
        if max == 0 || (omit_empty && len == 0) {
            return Vec::new();
        }
        let found = if max == 1 {
            Vec::new()
        } else {
            self.delimit(delimiters)
        };
        if found.is_empty() {
            return vec![(0, len)];
        }

        let mut ranges = Vec::new();
        let mut start = 0;
        if omit_empty {
            let mut found = found.into_iter().peekable();
            while let Some(delimiter) = found.next() {
                let gap = (start, delimiter.index);
                start = delimiter.end();
                if gap.0 == gap.1 {
                    continue;
                }
                ranges.push(gap);
                if ranges.len() == max - 1 {
                    while let Some(next) = found.next_if(|next| next.index == start) {
                        start = next.end();
                    }
                    break;
                }
            }
            if start < len {
                ranges.push((start, len));
            }
        } else {
            for delimiter in found.iter().take(max - 1) {
                ranges.push((start, delimiter.index));
                start = delimiter.end();
            }
            ranges.push((start, len));
        }
        ranges
    }

    /// Splits the buffer into owned strings.
    ///
    /// With [`SplitMode::KeepEmpty`] every gap becomes a segment, including
    /// an empty one after a trailing delimiter. With
    /// [`SplitMode::OmitEmpty`] empty gaps are skipped. At most
    /// `max_segments` segments are produced; the last one holds the
    /// unsplit remainder.
    ///
    /// ```rust
    /// use chunkstring::{ChunkString, Delimiters, SplitOptions};
    ///
    /// let text = ChunkString::from("a,,b,");
    /// let commas = Delimiters::Chars(&[',']);
    /// assert_eq!(text.split(&commas, SplitOptions::keep_empty()), ["a", "", "b", ""]);
    /// assert_eq!(text.split(&commas, SplitOptions::omit_empty()), ["a", "b"]);
    /// assert_eq!(
    ///     text.split(&commas, SplitOptions::keep_empty().max_segments(2)),
    ///     ["a", ",b,"]
    /// );
    /// ```
    #[must_use]
    pub fn split(&self, delimiters: &Delimiters<'_>, options: SplitOptions) -> Vec<String> {
        self.segment_ranges(delimiters, options)
            .into_iter()
            .map(|(start, end)| self.chars_from(start).take(end - start).collect())
            .collect()
    }

    /// Like [`split`](Self::split), producing buffers that share this
    /// buffer's options.
    #[must_use]
    pub fn split_to_buffers(&self, delimiters: &Delimiters<'_>, options: SplitOptions) -> Vec<ChunkString> {
        self.segment_ranges(delimiters, options)
            .into_iter()
            .map(|(start, end)| {
                let mut segment = ChunkString::with_options(self.options);
                let count = end - start;
                if segment.append_iter(count, self.chars_from(start).take(count)).is_err() {
                    unreachable!("a segment is never longer than its source");
                }
                segment
            })
            .collect()
    }
}
