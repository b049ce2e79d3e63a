//! Search-driven replace and substring operations.
//!
//! A target that cannot be found is not an error here: the call leaves the
//! buffer unchanged and sets the failed flag, which [`ChunkString::fail`] and
//! [`ChunkString::succeed`] branch on. Hard errors (empty markers, capacity
//! overflow) still come back as [`ChunkError`] and also leave the buffer
//! unchanged.

use alloc::vec::Vec;

use crate::{
    error::ChunkError,
    options::{Comparison, Occurrence},
    search::Needle,
    string::ChunkString,
};

impl ChunkString {
    fn marker_chars<'n>(
        marker: impl Into<Needle<'n>>,
        name: &'static str,
    ) -> Result<Vec<char>, ChunkError> {
        let chars = marker.into().to_chars().into_owned();
        if chars.is_empty() {
            return Err(ChunkError::EmptyArgument(name));
        }
        Ok(chars)
    }

    fn locate(&self, needle: &[char], occurrence: Occurrence) -> Option<usize> {
        let len = self.len();
        match occurrence {
            Occurrence::First => self.scan_first(needle, 0, len, Comparison::Ordinal),
            Occurrence::Last => self.scan_last(needle, 0, len, Comparison::Ordinal),
        }
    }

    /// Span `[open_start, close_end)` of the first `open` and the first
    /// `close` after it.
    fn locate_pair(&self, open: &[char], close: &[char]) -> Option<(usize, usize)> {
        let len = self.len();
        let start = self.scan_first(open, 0, len, Comparison::Ordinal)?;
        let inner = start + open.len();
        let close_at = self.scan_first(close, inner, len - inner, Comparison::Ordinal)?;
        Some((start, close_at + close.len()))
    }

    /// Checks that growing by `extra` characters fits.
    fn reserve_growth(&self, extra: usize) -> Result<(), ChunkError> {
        let available = self.options.max_capacity.saturating_sub(self.len());
        if extra > available {
            return Err(ChunkError::CapacityExceeded {
                requested: extra,
                available,
            });
        }
        Ok(())
    }

    fn splice(&mut self, index: usize, old_length: usize, text: &str) -> Result<(), ChunkError> {
        let new_len = text.chars().count();
        self.reserve_growth(new_len.saturating_sub(old_length))?;
        self.replace_in_place(index, old_length, new_len, text.chars())
    }

    /// Replaces every ordinal occurrence of `old` with `new`.
    ///
    /// # Errors
    ///
    /// [`ChunkError::EmptyArgument`] if `old` is empty, or
    /// [`ChunkError::CapacityExceeded`] if the result would be too long.
    pub fn replace(&mut self, old: &str, new: &str) -> Result<&mut Self, ChunkError> {
        self.replace_with(old, new, Comparison::Ordinal)
    }

    /// Replaces every occurrence of `old` with `new` under `comparison`.
    ///
    /// Matches are found left to right without overlapping, and inserted
    /// text is never rescanned. Sets the failed flag if there was no match.
    ///
    /// ```rust
    /// use chunkstring::{ChunkString, Comparison};
    ///
    /// let mut text = ChunkString::from("Cat, cat, CAT");
    /// text.replace_with("cat", "dog", Comparison::OrdinalIgnoreCase).unwrap();
    /// assert_eq!(text, "dog, dog, dog");
    /// ```
    ///
    /// # Errors
    ///
    /// [`ChunkError::EmptyArgument`] if `old` is empty, or
    /// [`ChunkError::CapacityExceeded`] if the result would be too long.
    pub fn replace_with(
        &mut self,
        old: &str,
        new: &str,
        comparison: Comparison,
    ) -> Result<&mut Self, ChunkError> {
        self.failed = false;
        let old = Self::marker_chars(old, "old")?;
        let new_len = new.chars().count();

        let mut hits = Vec::new();
        let mut position = 0;
        let len = self.len();
        while let Some(found) = self.scan_first(&old, position, len - position, comparison) {
            hits.push(found);
            position = found + old.len();
        }
        if hits.is_empty() {
            self.failed = true;
            return Ok(self);
        }
        if new_len > old.len() {
            self.reserve_growth(hits.len().saturating_mul(new_len - old.len()))?;
        }

        // Back to front, so pending hit indices stay valid.
        let single = new.chars().next().filter(|_| new_len == 1);
        for &hit in hits.iter().rev() {
            match single {
                Some(ch) => self.replace_with_char(hit, old.len(), ch)?,
                None => self.replace_in_place(hit, old.len(), new_len, new.chars())?,
            }
        }
        Ok(self)
    }

    /// Replaces every `old` character with `new`.
    ///
    /// Sets the failed flag if `old` does not occur.
    pub fn replace_char(&mut self, old: char, new: char) -> &mut Self {
        self.failed = false;
        if !self.chars().any(|ch| ch == old) {
            self.failed = true;
            return self;
        }
        self.map_chars(|ch| if ch == old { new } else { ch });
        self
    }

    /// Replaces everything before `marker` with `text`.
    ///
    /// # Errors
    ///
    /// [`ChunkError::EmptyArgument`] if `marker` is empty, or
    /// [`ChunkError::CapacityExceeded`] if the result would be too long.
    pub fn replace_before<'n>(
        &mut self,
        marker: impl Into<Needle<'n>>,
        text: &str,
        occurrence: Occurrence,
    ) -> Result<&mut Self, ChunkError> {
        self.failed = false;
        let marker = Self::marker_chars(marker, "marker")?;
        match self.locate(&marker, occurrence) {
            Some(index) => self.splice(0, index, text)?,
            None => self.failed = true,
        }
        Ok(self)
    }

    /// Replaces everything after `marker` with `text`.
    ///
    /// # Errors
    ///
    /// [`ChunkError::EmptyArgument`] if `marker` is empty, or
    /// [`ChunkError::CapacityExceeded`] if the result would be too long.
    pub fn replace_after<'n>(
        &mut self,
        marker: impl Into<Needle<'n>>,
        text: &str,
        occurrence: Occurrence,
    ) -> Result<&mut Self, ChunkError> {
        self.failed = false;
        let marker = Self::marker_chars(marker, "marker")?;
        match self.locate(&marker, occurrence) {
            Some(index) => {
                let start = index + marker.len();
                let length = self.len() - start;
                self.splice(start, length, text)?;
            }
            None => self.failed = true,
        }
        Ok(self)
    }

    /// Replaces the text between the first `open` and the next `close` with
    /// `text`, keeping both markers.
    ///
    /// # Errors
    ///
    /// [`ChunkError::EmptyArgument`] if a marker is empty, or
    /// [`ChunkError::CapacityExceeded`] if the result would be too long.
    pub fn replace_inside<'o, 'c>(
        &mut self,
        open: impl Into<Needle<'o>>,
        close: impl Into<Needle<'c>>,
        text: &str,
    ) -> Result<&mut Self, ChunkError> {
        self.failed = false;
        let open = Self::marker_chars(open, "open")?;
        let close = Self::marker_chars(close, "close")?;
        match self.locate_pair(&open, &close) {
            Some((start, end)) => {
                let inner = start + open.len();
                self.splice(inner, end - close.len() - inner, text)?;
            }
            None => self.failed = true,
        }
        Ok(self)
    }

    /// Keeps only `[index, index + length)`; an alias of
    /// [`crop`](Self::crop) in the substring family.
    ///
    /// # Errors
    ///
    /// [`ChunkError::RangeOutOfBounds`] if the range does not fit.
    pub fn substring_range(&mut self, index: usize, length: usize) -> Result<&mut Self, ChunkError> {
        self.crop(index, length)
    }

    /// Keeps only the text before `marker`.
    ///
    /// ```rust
    /// use chunkstring::{ChunkString, Occurrence};
    ///
    /// let mut path = ChunkString::from("archive.tar.gz");
    /// path.substring_before('.', Occurrence::Last).unwrap();
    /// assert_eq!(path, "archive.tar");
    ///
    /// let mut missed = false;
    /// path.substring_before('z', Occurrence::First)
    ///     .unwrap()
    ///     .fail(|_| missed = true);
    /// assert!(missed);
    /// assert_eq!(path, "archive.tar");
    /// ```
    ///
    /// # Errors
    ///
    /// [`ChunkError::EmptyArgument`] if `marker` is empty.
    pub fn substring_before<'n>(
        &mut self,
        marker: impl Into<Needle<'n>>,
        occurrence: Occurrence,
    ) -> Result<&mut Self, ChunkError> {
        self.failed = false;
        let marker = Self::marker_chars(marker, "marker")?;
        match self.locate(&marker, occurrence) {
            Some(index) => self.truncate_to(index),
            None => self.failed = true,
        }
        Ok(self)
    }

    /// Keeps only the text after `marker`.
    ///
    /// # Errors
    ///
    /// [`ChunkError::EmptyArgument`] if `marker` is empty.
    pub fn substring_after<'n>(
        &mut self,
        marker: impl Into<Needle<'n>>,
        occurrence: Occurrence,
    ) -> Result<&mut Self, ChunkError> {
        self.failed = false;
        let marker = Self::marker_chars(marker, "marker")?;
        match self.locate(&marker, occurrence) {
            Some(index) => self.shrink(0, index + marker.len()),
            None => self.failed = true,
        }
        Ok(self)
    }

    /// Keeps only the text between the first `open` and the next `close`.
    ///
    /// # Errors
    ///
    /// [`ChunkError::EmptyArgument`] if a marker is empty.
    pub fn substring_inside<'o, 'c>(
        &mut self,
        open: impl Into<Needle<'o>>,
        close: impl Into<Needle<'c>>,
    ) -> Result<&mut Self, ChunkError> {
        self.failed = false;
        let open = Self::marker_chars(open, "open")?;
        let close = Self::marker_chars(close, "close")?;
        match self.locate_pair(&open, &close) {
            Some((start, end)) => {
                let inner = start + open.len();
                self.crop_range(inner, end - close.len() - inner);
            }
            None => self.failed = true,
        }
        Ok(self)
    }

    /// Removes the first `open` through the next `close`, markers included.
    ///
    /// # Errors
    ///
    /// [`ChunkError::EmptyArgument`] if a marker is empty.
    pub fn substring_outside<'o, 'c>(
        &mut self,
        open: impl Into<Needle<'o>>,
        close: impl Into<Needle<'c>>,
    ) -> Result<&mut Self, ChunkError> {
        self.failed = false;
        let open = Self::marker_chars(open, "open")?;
        let close = Self::marker_chars(close, "close")?;
        match self.locate_pair(&open, &close) {
            Some((start, end)) => self.shrink(start, end - start),
            None => self.failed = true,
        }
        Ok(self)
    }

    /// Runs `handler` if the last search-driven call missed its target.
    pub fn fail(&mut self, handler: impl FnOnce(&mut Self)) -> &mut Self {
        if self.failed {
            handler(self);
        }
        self
    }

    /// Runs `handler` if the last search-driven call found its target.
    pub fn succeed(&mut self, handler: impl FnOnce(&mut Self)) -> &mut Self {
        if !self.failed {
            handler(self);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use crate::{ChunkError, ChunkOptions, ChunkString, Comparison, Occurrence};

    fn small(text: &str) -> ChunkString {
        ChunkString::from_str_with(text, ChunkOptions::with_max_chunk_len(3)).unwrap()
    }

    #[rstest]
    #[case("a-b-c", "-", "+", "a+b+c")]
    #[case("a-b-c", "-", "--", "a--b--c")]
    #[case("a--b--c", "--", "", "abc")]
    #[case("aaaa", "aa", "b", "bb")]
    #[case("xx", "x", "xx", "xxxx")]
    fn replace_all_occurrences(
        #[case] text: &str,
        #[case] old: &str,
        #[case] new: &str,
        #[case] expected: &str,
    ) {
        let mut buffer = small(text);
        buffer.replace(old, new).unwrap();
        buffer.check_invariants();
        assert_eq!(buffer, expected);
        assert!(!buffer.failed());
    }

    #[test]
    fn replace_miss_sets_failed() {
        let mut buffer = small("abc");
        buffer.replace("z", "y").unwrap();
        assert!(buffer.failed());
        assert_eq!(buffer, "abc");
        assert_eq!(
            buffer.replace("", "y").unwrap_err(),
            ChunkError::EmptyArgument("old")
        );
    }

    #[test]
    fn replace_checks_capacity_first() {
        let options = ChunkOptions {
            max_capacity: 6,
            max_chunk_len: 2,
            ..ChunkOptions::default()
        };
        let mut buffer = ChunkString::from_str_with("a.b.c", options).unwrap();
        let err = buffer.replace(".", "::").unwrap_err();
        assert_eq!(
            err,
            ChunkError::CapacityExceeded {
                requested: 2,
                available: 1
            }
        );
        assert_eq!(buffer, "a.b.c");
    }

    #[test]
    fn replace_char_everywhere() {
        let mut buffer = small("a b c");
        buffer.replace_char(' ', '_');
        assert_eq!(buffer, "a_b_c");
        buffer.replace_char('#', '_');
        assert!(buffer.failed());
    }

    #[test]
    fn replace_before_and_after() {
        let mut buffer = small("key = value = more");
        buffer.replace_after("= ", "x", Occurrence::First).unwrap();
        assert_eq!(buffer, "key = x");
        buffer.replace_before('=', "name ", Occurrence::Last).unwrap();
        assert_eq!(buffer, "name = x");
        buffer.replace_before('#', "", Occurrence::First).unwrap();
        assert!(buffer.failed());
        buffer.check_invariants();
    }

    #[test]
    fn replace_inside_keeps_markers() {
        let mut buffer = small("call(a, b) then(c)");
        buffer.replace_inside('(', ')', "x").unwrap();
        assert_eq!(buffer, "call(x) then(c)");
        buffer.replace_inside("[", "]", "y").unwrap();
        assert!(buffer.failed());
    }

    #[test]
    fn substring_family() {
        let mut buffer = small("<p>hello</p>");
        buffer.substring_inside("<p>", "</p>").unwrap();
        assert_eq!(buffer, "hello");

        let mut buffer = small("head [skip] tail");
        buffer.substring_outside('[', "] ").unwrap();
        assert_eq!(buffer, "head tail");

        let mut buffer = small("a/b/c");
        buffer.substring_after('/', Occurrence::First).unwrap();
        assert_eq!(buffer, "b/c");
        buffer.substring_after('/', Occurrence::Last).unwrap();
        assert_eq!(buffer, "c");
        buffer.check_invariants();

        let mut buffer = small("0123456");
        buffer.substring_range(2, 3).unwrap();
        assert_eq!(buffer, "234");
    }

    #[test]
    fn fail_and_succeed_follow_the_flag() {
        let mut buffer = small("no marker here");
        let mut failed = 0;
        let mut succeeded = 0;
        buffer
            .substring_before('z', Occurrence::First)
            .unwrap()
            .fail(|_| failed += 1)
            .succeed(|_| succeeded += 1);
        assert_eq!((failed, succeeded), (1, 0));
        assert_eq!(buffer, "no marker here");

        buffer
            .substring_before(' ', Occurrence::First)
            .unwrap()
            .succeed(|b| {
                b.append("!").unwrap();
            });
        assert_eq!(buffer, "no!");
        assert!(!buffer.failed());
    }

    #[test]
    fn ignore_case_replace() {
        let mut buffer = small("Hello HELLO hello");
        buffer
            .replace_with("hello", "bye", Comparison::OrdinalIgnoreCase)
            .unwrap();
        assert_eq!(buffer, "bye bye bye");
    }
}
