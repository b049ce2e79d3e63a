//! Search engine: chunk-crossing comparisons and scans.
//!
//! Every scan runs on a [`Cursor`] that steps across chunk boundaries, so a
//! match may straddle any number of chunks. Empty needles and empty windows
//! never match, and a needle longer than its window is rejected before
//! scanning.

use alloc::{borrow::Cow, vec, vec::Vec};

use crate::{
    error::ChunkError,
    options::Comparison,
    string::{ChunkString, Cursor},
};

/// Something to search for: a character, a string, a character slice or
/// another buffer.
#[derive(Debug, Clone, Copy)]
pub enum Needle<'a> {
    /// A single character.
    Char(char),
    /// A string slice.
    Str(&'a str),
    /// A character slice.
    Chars(&'a [char]),
    /// The content of another buffer.
    Buffer(&'a ChunkString),
}

impl<'a> Needle<'a> {
    pub(crate) fn to_chars(&self) -> Cow<'a, [char]> {
        match *self {
            Needle::Char(ch) => Cow::Owned(vec![ch]),
            Needle::Str(text) => Cow::Owned(text.chars().collect()),
            Needle::Chars(chars) => Cow::Borrowed(chars),
            Needle::Buffer(buffer) => Cow::Owned(buffer.to_chars()),
        }
    }
}

impl From<char> for Needle<'_> {
    fn from(ch: char) -> Self {
        Needle::Char(ch)
    }
}

impl<'a> From<&'a str> for Needle<'a> {
    fn from(text: &'a str) -> Self {
        Needle::Str(text)
    }
}

impl<'a> From<&'a alloc::string::String> for Needle<'a> {
    fn from(text: &'a alloc::string::String) -> Self {
        Needle::Str(text)
    }
}

impl<'a> From<&'a [char]> for Needle<'a> {
    fn from(chars: &'a [char]) -> Self {
        Needle::Chars(chars)
    }
}

impl<'a> From<&'a ChunkString> for Needle<'a> {
    fn from(buffer: &'a ChunkString) -> Self {
        Needle::Buffer(buffer)
    }
}

/// Whitespace as used by trimming, default splitting and the sequence
/// predicates.
///
/// A fixed table: the Unicode space, line and paragraph separators plus the
/// ASCII control whitespace characters and U+0085. No locale is consulted.
#[must_use]
pub fn is_whitespace(ch: char) -> bool {
    matches!(
        ch,
        '\u{0009}'..='\u{000D}'
            | '\u{0020}'
            | '\u{0085}'
            | '\u{00A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
    )
}

/// Simple case folding: the single-character lowercase mapping, or the
/// character itself when the mapping expands.
#[inline]
pub(crate) fn fold(ch: char) -> char {
    if ch.is_ascii() {
        return ch.to_ascii_lowercase();
    }
    let mut lower = ch.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(folded), None) => folded,
        _ => ch,
    }
}

#[inline]
pub(crate) fn chars_match(a: char, b: char, ignore_case: bool) -> bool {
    a == b || (ignore_case && fold(a) == fold(b))
}

impl ChunkString {
    // --------------------------------------------------------------------
    // Primitives
    // --------------------------------------------------------------------

    /// Compares `needle` against the characters starting at `cursor`.
    pub(crate) fn matches_at(&self, mut cursor: Cursor, needle: &[char], ignore_case: bool) -> bool {
        for &expected in needle {
            match self.char_under(cursor) {
                Some(ch) if chars_match(ch, expected, ignore_case) => self.advance(&mut cursor),
                _ => return false,
            }
        }
        true
    }

    pub(crate) fn contains_chars_at(
        &self,
        needle: &[char],
        index: usize,
        comparison: Comparison,
    ) -> bool {
        let len = self.len();
        if needle.is_empty() || index >= len || needle.len() > len - index {
            return false;
        }
        let ignore_case = comparison.ignore_case();
        if let [single] = needle {
            return self
                .char_at(index)
                .is_some_and(|ch| chars_match(ch, *single, ignore_case));
        }
        self.matches_at(self.cursor(index), needle, ignore_case)
    }

    /// First start position in `[index, index + length - needle.len()]`.
    pub(crate) fn scan_first(
        &self,
        needle: &[char],
        index: usize,
        length: usize,
        comparison: Comparison,
    ) -> Option<usize> {
        if length == 0 || needle.is_empty() || needle.len() > length {
            return None;
        }
        let ignore_case = comparison.ignore_case();
        let last = index + length - needle.len();
        let mut cursor = self.cursor(index);
        for position in index..=last {
            if self.matches_at(cursor, needle, ignore_case) {
                return Some(position);
            }
            self.advance(&mut cursor);
        }
        None
    }

    /// Same window as [`scan_first`](Self::scan_first), scanned
    /// from the high end.
    pub(crate) fn scan_last(
        &self,
        needle: &[char],
        index: usize,
        length: usize,
        comparison: Comparison,
    ) -> Option<usize> {
        if length == 0 || needle.is_empty() || needle.len() > length {
            return None;
        }
        let ignore_case = comparison.ignore_case();
        let last = index + length - needle.len();
        let mut cursor = self.cursor(last);
        for position in (index..=last).rev() {
            if self.matches_at(cursor, needle, ignore_case) {
                return Some(position);
            }
            if position > index {
                self.retreat(&mut cursor);
            }
        }
        None
    }

    /// Number of consecutive characters from `from` on satisfying `pred`.
    pub(crate) fn leading_matches(&self, from: usize, mut pred: impl FnMut(char) -> bool) -> usize {
        self.chars_from(from).take_while(|&ch| pred(ch)).count()
    }

    /// Number of consecutive characters before `end` satisfying `pred`.
    pub(crate) fn trailing_matches(&self, end: usize, mut pred: impl FnMut(char) -> bool) -> usize {
        let mut cursor = self.cursor(end);
        let mut count = 0;
        while count < end && self.retreat(&mut cursor) {
            match self.char_under(cursor) {
                Some(ch) if pred(ch) => count += 1,
                _ => break,
            }
        }
        count
    }

    /// End of `parts` matched in order from `start`, with optional
    /// whitespace skipped before each part.
    fn sequence_end(
        &self,
        start: usize,
        parts: &[Vec<char>],
        comparison: Comparison,
        skip_whitespace: bool,
        skip_leading: bool,
    ) -> Option<usize> {
        let mut position = start;
        for (i, part) in parts.iter().enumerate() {
            if skip_whitespace && (i > 0 || skip_leading) {
                position += self.leading_matches(position, is_whitespace);
            }
            if part.is_empty() {
                continue;
            }
            if !self.contains_chars_at(part, position, comparison) {
                return None;
            }
            position += part.len();
        }
        Some(position)
    }

    // --------------------------------------------------------------------
    // Public surface
    // --------------------------------------------------------------------

    /// Returns `true` if `needle` occurs at `index`.
    pub fn contains_at<'n>(
        &self,
        needle: impl Into<Needle<'n>>,
        index: usize,
        comparison: Comparison,
    ) -> bool {
        self.contains_chars_at(&needle.into().to_chars(), index, comparison)
    }

    /// Position of the first ordinal occurrence of `needle`.
    pub fn index_of<'n>(&self, needle: impl Into<Needle<'n>>) -> Option<usize> {
        self.index_of_with(needle, Comparison::Ordinal)
    }

    /// Position of the first occurrence of `needle` under `comparison`.
    pub fn index_of_with<'n>(
        &self,
        needle: impl Into<Needle<'n>>,
        comparison: Comparison,
    ) -> Option<usize> {
        self.scan_first(&needle.into().to_chars(), 0, self.len(), comparison)
    }

    /// Position of the first occurrence of `needle` lying entirely inside
    /// `[index, index + length)`.
    ///
    /// # Errors
    ///
    /// [`ChunkError::RangeOutOfBounds`] if the window does not fit.
    pub fn index_of_in<'n>(
        &self,
        needle: impl Into<Needle<'n>>,
        index: usize,
        length: usize,
        comparison: Comparison,
    ) -> Result<Option<usize>, ChunkError> {
        self.check_range(index, length)?;
        Ok(self.scan_first(&needle.into().to_chars(), index, length, comparison))
    }

    /// Position of the last ordinal occurrence of `needle`.
    pub fn last_index_of<'n>(&self, needle: impl Into<Needle<'n>>) -> Option<usize> {
        self.last_index_of_with(needle, Comparison::Ordinal)
    }

    /// Position of the last occurrence of `needle` under `comparison`.
    pub fn last_index_of_with<'n>(
        &self,
        needle: impl Into<Needle<'n>>,
        comparison: Comparison,
    ) -> Option<usize> {
        self.scan_last(&needle.into().to_chars(), 0, self.len(), comparison)
    }

    /// Position of the last occurrence of `needle` lying entirely inside
    /// `[index, index + length)`.
    ///
    /// # Errors
    ///
    /// [`ChunkError::RangeOutOfBounds`] if the window does not fit.
    pub fn last_index_of_in<'n>(
        &self,
        needle: impl Into<Needle<'n>>,
        index: usize,
        length: usize,
        comparison: Comparison,
    ) -> Result<Option<usize>, ChunkError> {
        self.check_range(index, length)?;
        Ok(self.scan_last(&needle.into().to_chars(), index, length, comparison))
    }

    /// Position of the first character contained in `set`.
    #[must_use]
    pub fn index_of_any(&self, set: &[char]) -> Option<usize> {
        self.chars().position(|ch| set.contains(&ch))
    }

    /// Position of the last character contained in `set`.
    #[must_use]
    pub fn last_index_of_any(&self, set: &[char]) -> Option<usize> {
        let len = self.len();
        let skipped = self.trailing_matches(len, |ch| !set.contains(&ch));
        (skipped < len).then(|| len - skipped - 1)
    }

    /// Returns `true` if `needle` occurs anywhere (ordinal).
    pub fn contains<'n>(&self, needle: impl Into<Needle<'n>>) -> bool {
        self.index_of(needle).is_some()
    }

    /// Returns `true` if `needle` occurs anywhere under `comparison`.
    pub fn contains_with<'n>(&self, needle: impl Into<Needle<'n>>, comparison: Comparison) -> bool {
        self.index_of_with(needle, comparison).is_some()
    }

    /// Returns `true` if the buffer begins with `needle`.
    pub fn starts_with<'n>(&self, needle: impl Into<Needle<'n>>, comparison: Comparison) -> bool {
        self.contains_chars_at(&needle.into().to_chars(), 0, comparison)
    }

    /// Returns `true` if the buffer ends with `needle`.
    pub fn ends_with<'n>(&self, needle: impl Into<Needle<'n>>, comparison: Comparison) -> bool {
        let needle = needle.into().to_chars();
        let len = self.len();
        needle.len() <= len && self.contains_chars_at(&needle, len - needle.len(), comparison)
    }

    /// Index of the first candidate the buffer begins with.
    #[must_use]
    pub fn starts_with_any(&self, candidates: &[&str], comparison: Comparison) -> Option<usize> {
        candidates
            .iter()
            .position(|candidate| self.starts_with(*candidate, comparison))
    }

    /// Index of the first candidate the buffer ends with.
    #[must_use]
    pub fn ends_with_any(&self, candidates: &[&str], comparison: Comparison) -> Option<usize> {
        candidates
            .iter()
            .position(|candidate| self.ends_with(*candidate, comparison))
    }

    /// Returns `true` if the buffer begins with `parts` in order.
    ///
    /// With `skip_whitespace`, whitespace before the first part and between
    /// parts is ignored.
    ///
    /// ```rust
    /// use chunkstring::{ChunkString, Comparison};
    ///
    /// let text = ChunkString::from("  pub   fn main()");
    /// assert!(text.starts_with_sequence(&["pub", "fn"], Comparison::Ordinal, true));
    /// assert!(!text.starts_with_sequence(&["pub", "fn"], Comparison::Ordinal, false));
    /// ```
    #[must_use]
    pub fn starts_with_sequence(
        &self,
        parts: &[&str],
        comparison: Comparison,
        skip_whitespace: bool,
    ) -> bool {
        let parts = collect_parts(parts);
        if parts.iter().all(Vec::is_empty) {
            return false;
        }
        self.sequence_end(0, &parts, comparison, skip_whitespace, true)
            .is_some()
    }

    /// Returns `true` if the buffer ends with `parts` in order.
    ///
    /// With `skip_whitespace`, whitespace after the last part and between
    /// parts is ignored.
    #[must_use]
    pub fn ends_with_sequence(
        &self,
        parts: &[&str],
        comparison: Comparison,
        skip_whitespace: bool,
    ) -> bool {
        let parts = collect_parts(parts);
        if parts.iter().all(Vec::is_empty) {
            return false;
        }
        let mut position = self.len();
        for part in parts.iter().rev() {
            if skip_whitespace {
                position -= self.trailing_matches(position, is_whitespace);
            }
            if part.is_empty() {
                continue;
            }
            if part.len() > position
                || !self.contains_chars_at(part, position - part.len(), comparison)
            {
                return false;
            }
            position -= part.len();
        }
        true
    }

    /// Start of the first place where `parts` occur in order.
    ///
    /// With `skip_whitespace`, whitespace between parts is ignored.
    #[must_use]
    pub fn contains_sequence(
        &self,
        parts: &[&str],
        comparison: Comparison,
        skip_whitespace: bool,
    ) -> Option<usize> {
        let parts = collect_parts(parts);
        if parts.iter().all(Vec::is_empty) {
            return None;
        }
        (0..self.len()).find(|&start| {
            self.sequence_end(start, &parts, comparison, skip_whitespace, false)
                .is_some()
        })
    }
}

fn collect_parts(parts: &[&str]) -> Vec<Vec<char>> {
    parts.iter().map(|part| part.chars().collect()).collect()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::ChunkOptions;

    fn small(text: &str, chunk: usize) -> ChunkString {
        ChunkString::from_str_with(text, ChunkOptions::with_max_chunk_len(chunk)).unwrap()
    }

    #[rstest]
    #[case("abcabcabc", "cab", Some(2), Some(5))]
    #[case("abcabcabc", "abc", Some(0), Some(6))]
    #[case("abcabcabc", "x", None, None)]
    #[case("abcabcabc", "", None, None)]
    #[case("ab", "abc", None, None)]
    #[case("aaaa", "aa", Some(0), Some(2))]
    fn finds_first_and_last(
        #[case] haystack: &str,
        #[case] needle: &str,
        #[case] first: Option<usize>,
        #[case] last: Option<usize>,
    ) {
        for chunk in [1, 2, 3, 64] {
            let text = small(haystack, chunk);
            assert_eq!(text.index_of(needle), first, "chunk size {chunk}");
            assert_eq!(text.last_index_of(needle), last, "chunk size {chunk}");
        }
    }

    #[test]
    fn window_bounds_are_respected() {
        let text = small("one two one two", 4);
        assert_eq!(
            text.index_of_in("one", 1, 10, Comparison::Ordinal).unwrap(),
            Some(8)
        );
        assert_eq!(
            text.index_of_in("one", 1, 9, Comparison::Ordinal).unwrap(),
            None
        );
        assert_eq!(
            text.last_index_of_in("two", 0, 10, Comparison::Ordinal).unwrap(),
            Some(4)
        );
        assert_eq!(
            text.index_of_in("x", 10, 6, Comparison::Ordinal),
            Err(ChunkError::RangeOutOfBounds {
                index: 10,
                length: 6,
                len: 15
            })
        );
    }

    #[test]
    fn ignore_case_folds_per_character() {
        let text = small("Grüße AUS Köln", 3);
        assert_eq!(text.index_of("aus"), None);
        assert_eq!(text.index_of_with("aus", Comparison::OrdinalIgnoreCase), Some(6));
        assert_eq!(text.index_of_with("KÖLN", Comparison::OrdinalIgnoreCase), Some(10));
        assert!(text.contains_with('g', Comparison::OrdinalIgnoreCase));
        assert!(!text.contains('g'));
    }

    #[test]
    fn needle_kinds() {
        let text = small("needle in a haystack", 5);
        let other = ChunkString::from("hay");
        let chars = ['i', 'n'];
        assert_eq!(text.index_of(&other), Some(12));
        assert_eq!(text.index_of(&chars[..]), Some(7));
        assert_eq!(text.index_of('y'), Some(14));
        assert!(text.contains_at("in", 7, Comparison::Ordinal));
        assert!(!text.contains_at("in", 8, Comparison::Ordinal));
    }

    #[test]
    fn any_variants() {
        let text = small("path/to\\file.txt", 3);
        assert_eq!(text.index_of_any(&['/', '\\']), Some(4));
        assert_eq!(text.last_index_of_any(&['/', '\\']), Some(7));
        assert_eq!(text.last_index_of_any(&['#']), None);
        assert_eq!(text.starts_with_any(&["x", "pa"], Comparison::Ordinal), Some(1));
        assert_eq!(text.ends_with_any(&[".TXT"], Comparison::OrdinalIgnoreCase), Some(0));
        assert_eq!(text.ends_with_any(&[".TXT"], Comparison::Ordinal), None);
    }

    #[test]
    fn starts_and_ends_with() {
        let text = small("prefix-body-suffix", 4);
        assert!(text.starts_with("prefix", Comparison::Ordinal));
        assert!(text.ends_with("suffix", Comparison::Ordinal));
        assert!(!text.ends_with("prefix-body-suffix!", Comparison::Ordinal));
        assert!(!text.starts_with("", Comparison::Ordinal));
    }

    #[test]
    fn ends_with_every_needle_kind() {
        let text = small("body-suffix", 3);
        let tail = small("FIX", 2);
        assert!(text.ends_with('x', Comparison::Ordinal));
        assert!(text.ends_with(&['f', 'i', 'x'][..], Comparison::Ordinal));
        assert!(text.ends_with(&tail, Comparison::OrdinalIgnoreCase));
        assert!(!text.ends_with(&tail, Comparison::Ordinal));
    }

    #[test]
    fn sequences_skip_whitespace() {
        let text = small(" \t let  x =\u{3000}1 ;\n", 3);
        let cmp = Comparison::Ordinal;
        assert!(text.starts_with_sequence(&["let", "x", "="], cmp, true));
        assert!(!text.starts_with_sequence(&["let", "x"], cmp, false));
        assert!(text.ends_with_sequence(&["1", ";"], cmp, true));
        assert!(!text.ends_with_sequence(&["1", ";"], cmp, false));
        assert_eq!(text.contains_sequence(&["x", "=", "1"], cmp, true), Some(8));
        assert_eq!(text.contains_sequence(&["x", "=", "1"], cmp, false), None);
        assert_eq!(text.contains_sequence(&[""], cmp, true), None);
    }

    #[rstest]
    #[case(' ', true)]
    #[case('\t', true)]
    #[case('\u{000B}', true)]
    #[case('\u{0085}', true)]
    #[case('\u{00A0}', true)]
    #[case('\u{2007}', true)]
    #[case('\u{2028}', true)]
    #[case('\u{3000}', true)]
    #[case('\u{200B}', false)]
    #[case('x', false)]
    fn whitespace_table(#[case] ch: char, #[case] expected: bool) {
        assert_eq!(is_whitespace(ch), expected);
    }

    #[test]
    fn fold_keeps_expanding_mappings() {
        assert_eq!(fold('A'), 'a');
        assert_eq!(fold('Ä'), 'ä');
        assert_eq!(fold('\u{0130}'), '\u{0130}');
    }
}
