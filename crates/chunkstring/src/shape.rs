//! Trimming, padding and case conversion.

use core::iter;

use crate::{error::ChunkError, search::is_whitespace, string::ChunkString};

/// Single-character case mapping; expanding mappings keep the original.
fn simple_case<I: Iterator<Item = char>>(ch: char, mut mapped: I) -> char {
    match (mapped.next(), mapped.next()) {
        (Some(single), None) => single,
        _ => ch,
    }
}

impl ChunkString {
    /// Removes leading and trailing whitespace.
    ///
    /// Whitespace is the fixed table of [`is_whitespace`](crate::is_whitespace).
    pub fn trim(&mut self) -> &mut Self {
        self.trim_end().trim_start()
    }

    /// Removes leading whitespace.
    pub fn trim_start(&mut self) -> &mut Self {
        self.trim_start_by(is_whitespace)
    }

    /// Removes trailing whitespace.
    pub fn trim_end(&mut self) -> &mut Self {
        self.trim_end_by(is_whitespace)
    }

    /// Removes leading and trailing characters contained in `set`.
    pub fn trim_matches(&mut self, set: &[char]) -> &mut Self {
        self.trim_end_by(|ch| set.contains(&ch))
            .trim_start_by(|ch| set.contains(&ch))
    }

    fn trim_start_by(&mut self, pred: impl FnMut(char) -> bool) -> &mut Self {
        self.failed = false;
        let count = self.leading_matches(0, pred);
        self.shrink(0, count);
        self
    }

    fn trim_end_by(&mut self, pred: impl FnMut(char) -> bool) -> &mut Self {
        self.failed = false;
        let len = self.len();
        let count = self.trailing_matches(len, pred);
        self.truncate_to(len - count);
        self
    }

    /// Right-aligns the content in `width` characters by inserting `fill`
    /// at the front. Does nothing if the buffer is already wide enough.
    ///
    /// # Errors
    ///
    /// [`ChunkError::CapacityExceeded`] if the padding does not fit.
    pub fn pad_left(&mut self, width: usize, fill: char) -> Result<&mut Self, ChunkError> {
        self.failed = false;
        let missing = width.saturating_sub(self.len());
        if missing > 0 {
            self.expand(0, missing)?;
            self.assign(0, iter::repeat_n(fill, missing));
        }
        Ok(self)
    }

    /// Left-aligns the content in `width` characters by appending `fill`.
    ///
    /// # Errors
    ///
    /// [`ChunkError::CapacityExceeded`] if the padding does not fit.
    pub fn pad_right(&mut self, width: usize, fill: char) -> Result<&mut Self, ChunkError> {
        self.failed = false;
        let missing = width.saturating_sub(self.len());
        self.append_iter(missing, iter::repeat_n(fill, missing))?;
        Ok(self)
    }

    /// Converts every character to uppercase in place.
    pub fn to_uppercase(&mut self) -> &mut Self {
        self.failed = false;
        self.map_chars(|ch| simple_case(ch, ch.to_uppercase()));
        self
    }

    /// Converts every character to lowercase in place.
    pub fn to_lowercase(&mut self) -> &mut Self {
        self.failed = false;
        self.map_chars(|ch| simple_case(ch, ch.to_lowercase()));
        self
    }
}
