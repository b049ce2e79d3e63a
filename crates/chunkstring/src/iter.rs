use alloc::string::String;
use core::iter::{FusedIterator, Peekable};

use crate::string::{ChunkString, Cursor};

/// In-order characters of a [`ChunkString`].
///
/// Created by [`ChunkString::chars`].
#[derive(Debug, Clone)]
pub struct Chars<'a> {
    buffer: &'a ChunkString,
    cursor: Cursor,
    remaining: usize,
}

impl<'a> Chars<'a> {
    pub(crate) fn new(buffer: &'a ChunkString, cursor: Cursor, remaining: usize) -> Self {
        Self {
            buffer,
            cursor,
            remaining,
        }
    }
}

impl Iterator for Chars<'_> {
    type Item = char;

    #[inline]
    fn next(&mut self) -> Option<char> {
        if self.remaining == 0 {
            return None;
        }
        let ch = self.buffer.char_under(self.cursor)?;
        self.buffer.advance(&mut self.cursor);
        self.remaining -= 1;
        Some(ch)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Chars<'_> {}

impl FusedIterator for Chars<'_> {}

/// Lines of a [`ChunkString`], without their terminators.
///
/// `\r`, `\n`, `\r\n` and `\n\r` each end one line. A terminator at the very
/// end does not produce a trailing empty line.
///
/// Created by [`ChunkString::lines`].
#[derive(Debug, Clone)]
pub struct Lines<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> Lines<'a> {
    pub(crate) fn new(chars: Chars<'a>) -> Self {
        Self {
            chars: chars.peekable(),
        }
    }
}

impl Iterator for Lines<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let mut line = String::new();
        let mut saw_any = false;
        while let Some(ch) = self.chars.next() {
            saw_any = true;
            match ch {
                '\r' | '\n' => {
                    let pair = if ch == '\r' { '\n' } else { '\r' };
                    self.chars.next_if_eq(&pair);
                    return Some(line);
                }
                _ => line.push(ch),
            }
        }
        saw_any.then_some(line)
    }
}

impl FusedIterator for Lines<'_> {}

#[cfg(test)]
mod tests {
    use alloc::{string::String, vec::Vec};

    use rstest::rstest;

    use crate::{ChunkOptions, ChunkString};

    fn lines(text: &str) -> Vec<String> {
        ChunkString::from_str_with(text, ChunkOptions::with_max_chunk_len(3))
            .unwrap()
            .lines()
            .collect()
    }

    #[rstest]
    #[case("", &[])]
    #[case("one", &["one"])]
    #[case("one\n", &["one"])]
    #[case("one\ntwo", &["one", "two"])]
    #[case("one\r\ntwo\n\rthree", &["one", "two", "three"])]
    #[case("a\rb\r\r", &["a", "b", ""])]
    #[case("a\n\nb", &["a", "", "b"])]
    #[case("\n", &[""])]
    fn splits_lines(#[case] text: &str, #[case] expected: &[&str]) {
        assert_eq!(lines(text), expected);
    }

    #[test]
    fn chars_is_exact_size() {
        let text = ChunkString::from_str_with("abcdefg", ChunkOptions::with_max_chunk_len(2)).unwrap();
        let mut chars = text.chars();
        assert_eq!(chars.len(), 7);
        chars.next();
        assert_eq!(chars.len(), 6);
        assert_eq!(chars.collect::<String>(), "bcdefg");
    }

    #[test]
    fn lines_iterator_is_fused() {
        let text = ChunkString::from("x\ny");
        let mut lines = text.lines();
        assert_eq!(lines.next().as_deref(), Some("x"));
        assert_eq!(lines.next().as_deref(), Some("y"));
        assert_eq!(lines.next(), None);
        assert_eq!(lines.next(), None);
    }
}
