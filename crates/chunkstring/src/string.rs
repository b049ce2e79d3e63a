//! The chunk chain and everything that reads it without mutating.
//!
//! Chunks live in an arena (`Vec<Chunk>`) and are linked through
//! [`Chunk::next`]. New chunks are only ever pushed at the tail and released
//! from the tail end, so arena order and chain order always agree; the links
//! are still the source of truth for every walk.

use alloc::{string::String, vec::Vec};
use core::{
    cell::OnceCell,
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use bstr::ByteSlice;

use crate::{
    capacity,
    chunk::{Chunk, ChunkId},
    error::ChunkError,
    iter::{Chars, Lines},
    options::ChunkOptions,
};

/// A growable text buffer stored as a chain of bounded chunks.
///
/// Content is addressed by `char` index. Appends fill the tail chunk and
/// spill into new chunks of at most [`ChunkOptions::max_chunk_len`]
/// characters, so no single allocation grows with the text. Insertions and
/// removals shift characters across chunk boundaries in place.
///
/// ```rust
/// use chunkstring::ChunkString;
///
/// let mut text = ChunkString::from("hello world");
/// text.insert(5, ",").unwrap().append("!").unwrap();
/// assert_eq!(text, "hello, world!");
/// ```
pub struct ChunkString {
    pub(crate) chunks: Vec<Chunk>,
    pub(crate) head: ChunkId,
    pub(crate) tail: ChunkId,
    pub(crate) options: ChunkOptions,
    /// Flattened content; cleared by every mutation.
    pub(crate) flat: OnceCell<String>,
    pub(crate) failed: bool,
}

/// Position of a character inside the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Cursor {
    pub(crate) chunk: ChunkId,
    pub(crate) local: usize,
}

impl ChunkString {
    /// Creates an empty buffer with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(ChunkOptions::default())
    }

    /// Creates an empty buffer.
    #[must_use]
    pub fn with_options(options: ChunkOptions) -> Self {
        let head = Chunk::with_capacity(0, capacity::initial(&options));
        Self {
            chunks: alloc::vec![head],
            head: ChunkId(0),
            tail: ChunkId(0),
            options,
            flat: OnceCell::new(),
            failed: false,
        }
    }

    /// Creates a buffer holding `text`.
    ///
    /// # Errors
    ///
    /// [`ChunkError::CapacityExceeded`] if `text` is longer than
    /// `options.max_capacity`.
    pub fn from_str_with(text: &str, options: ChunkOptions) -> Result<Self, ChunkError> {
        let mut buffer = Self::with_options(options);
        buffer.append_iter(text.chars().count(), text.chars())?;
        Ok(buffer)
    }

    /// Creates a buffer holding `chars`.
    ///
    /// # Errors
    ///
    /// [`ChunkError::CapacityExceeded`] if `chars` is longer than
    /// `options.max_capacity`.
    pub fn from_chars(chars: &[char], options: ChunkOptions) -> Result<Self, ChunkError> {
        let mut buffer = Self::with_options(options);
        buffer.append_iter(chars.len(), chars.iter().copied())?;
        Ok(buffer)
    }

    /// Creates a buffer from UTF-8 bytes.
    ///
    /// # Errors
    ///
    /// [`ChunkError::InvalidUtf8`] if `bytes` is not valid UTF-8, or
    /// [`ChunkError::CapacityExceeded`] if the decoded text is too long.
    pub fn from_utf8(bytes: &[u8], options: ChunkOptions) -> Result<Self, ChunkError> {
        let text = bytes.to_str().map_err(|err| ChunkError::InvalidUtf8 {
            valid_up_to: err.valid_up_to(),
        })?;
        Self::from_str_with(text, options)
    }

    /// Creates a buffer from UTF-8 bytes, replacing invalid sequences with
    /// U+FFFD.
    ///
    /// # Errors
    ///
    /// [`ChunkError::CapacityExceeded`] if the decoded text is too long.
    pub fn from_utf8_lossy(bytes: &[u8], options: ChunkOptions) -> Result<Self, ChunkError> {
        let mut buffer = Self::with_options(options);
        buffer.append_iter(bytes.chars().count(), bytes.chars())?;
        Ok(buffer)
    }

    /// Creates a buffer of `count` copies of `ch`.
    ///
    /// # Errors
    ///
    /// [`ChunkError::CapacityExceeded`] if `count` exceeds
    /// `options.max_capacity`.
    pub fn repeat(ch: char, count: usize, options: ChunkOptions) -> Result<Self, ChunkError> {
        let mut buffer = Self::with_options(options);
        buffer.append_iter(count, core::iter::repeat_n(ch, count))?;
        Ok(buffer)
    }

    /// Number of characters in the buffer.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.chunks[self.tail.0].end()
    }

    /// Returns `true` if the buffer holds no characters.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total size of every chunk's backing array.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.chunk_ids().map(|id| self.chunks[id.0].capacity()).sum()
    }

    /// The configured limit on [`len`](Self::len).
    #[must_use]
    pub fn max_capacity(&self) -> usize {
        self.options.max_capacity
    }

    /// Number of chunks in the chain.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunk_ids().count()
    }

    /// Options the buffer was created with.
    #[must_use]
    pub fn options(&self) -> &ChunkOptions {
        &self.options
    }

    /// Character at `index`, if in range.
    #[must_use]
    pub fn char_at(&self, index: usize) -> Option<char> {
        if index >= self.len() {
            return None;
        }
        let chunk = &self.chunks[self.find_chunk(index).0];
        Some(chunk.chars[index - chunk.offset])
    }

    /// The whole buffer as a string slice.
    ///
    /// The flattened string is built on first use and cached until the next
    /// mutation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.flat.get_or_init(|| {
            let mut flat = String::with_capacity(self.len());
            for segment in self.segments() {
                flat.extend(segment.iter());
            }
            flat
        })
    }

    /// Copies the buffer into a vector of characters.
    #[must_use]
    pub fn to_chars(&self) -> Vec<char> {
        let mut chars = Vec::with_capacity(self.len());
        for segment in self.segments() {
            chars.extend_from_slice(segment);
        }
        chars
    }

    /// Copies `length` characters starting at `index` into a new `String`.
    ///
    /// # Errors
    ///
    /// [`ChunkError::RangeOutOfBounds`] if the range does not fit.
    pub fn slice(&self, index: usize, length: usize) -> Result<String, ChunkError> {
        self.check_range(index, length)?;
        Ok(self.chars_from(index).take(length).collect())
    }

    /// Iterates over the characters in order.
    ///
    /// The iterator borrows the buffer, so no mutation can run while it is
    /// alive.
    #[must_use]
    pub fn chars(&self) -> Chars<'_> {
        self.chars_from(0)
    }

    /// Iterates over lines separated by `\r`, `\n`, `\r\n` or `\n\r`.
    #[must_use]
    pub fn lines(&self) -> Lines<'_> {
        Lines::new(self.chars())
    }

    /// Whether the last search-driven `replace_*`/`substring_*` call missed
    /// its target.
    #[must_use]
    pub fn failed(&self) -> bool {
        self.failed
    }

    // --------------------------------------------------------------------
    // Locator
    // --------------------------------------------------------------------

    /// Chunk whose `[offset, offset + len)` contains `index`, or the tail if
    /// no chunk does.
    pub(crate) fn find_chunk(&self, index: usize) -> ChunkId {
        let mut id = self.head;
        loop {
            let chunk = &self.chunks[id.0];
            if chunk.contains(index) {
                return id;
            }
            match chunk.next {
                Some(next) => id = next,
                None => return id,
            }
        }
    }

    pub(crate) fn previous_chunk(&self, id: ChunkId) -> Option<ChunkId> {
        if id == self.head {
            return None;
        }
        Some(self.find_chunk(self.chunks[id.0].offset - 1))
    }

    pub(crate) fn chunk_ids(&self) -> impl Iterator<Item = ChunkId> + '_ {
        core::iter::successors(Some(self.head), |id| self.chunks[id.0].next)
    }

    /// Used parts of every chunk, in order.
    pub(crate) fn segments(&self) -> impl Iterator<Item = &[char]> + '_ {
        self.chunk_ids().map(|id| self.chunks[id.0].as_slice())
    }

    pub(crate) fn chars_from(&self, index: usize) -> Chars<'_> {
        Chars::new(self, self.cursor(index), self.len().saturating_sub(index))
    }

    // --------------------------------------------------------------------
    // Cursors
    // --------------------------------------------------------------------

    /// Cursor at `index`; `index == len` yields the end position of the tail.
    pub(crate) fn cursor(&self, index: usize) -> Cursor {
        let id = self.find_chunk(index);
        let chunk = &self.chunks[id.0];
        let mut cursor = Cursor {
            chunk: id,
            local: index.saturating_sub(chunk.offset),
        };
        self.settle(&mut cursor);
        cursor
    }

    /// Moves a cursor sitting at the end of a chunk to the start of the next.
    #[inline]
    fn settle(&self, cursor: &mut Cursor) {
        loop {
            let chunk = &self.chunks[cursor.chunk.0];
            if cursor.local < chunk.len {
                return;
            }
            match chunk.next {
                Some(next) => {
                    cursor.chunk = next;
                    cursor.local = 0;
                }
                None => return,
            }
        }
    }

    #[inline]
    pub(crate) fn char_under(&self, cursor: Cursor) -> Option<char> {
        let chunk = &self.chunks[cursor.chunk.0];
        (cursor.local < chunk.len).then(|| chunk.chars[cursor.local])
    }

    #[inline]
    pub(crate) fn advance(&self, cursor: &mut Cursor) {
        cursor.local += 1;
        self.settle(cursor);
    }

    /// Steps one character back; returns `false` at the start of the buffer.
    pub(crate) fn retreat(&self, cursor: &mut Cursor) -> bool {
        if cursor.local > 0 {
            cursor.local -= 1;
            return true;
        }
        let mut id = cursor.chunk;
        while let Some(previous) = self.previous_chunk(id) {
            let len = self.chunks[previous.0].len;
            if len > 0 {
                *cursor = Cursor {
                    chunk: previous,
                    local: len - 1,
                };
                return true;
            }
            id = previous;
        }
        false
    }

    // --------------------------------------------------------------------
    // Argument checks
    // --------------------------------------------------------------------

    pub(crate) fn check_index(&self, index: usize) -> Result<(), ChunkError> {
        let len = self.len();
        if index > len {
            return Err(ChunkError::IndexOutOfRange { index, len });
        }
        Ok(())
    }

    pub(crate) fn check_range(&self, index: usize, length: usize) -> Result<(), ChunkError> {
        let len = self.len();
        match index.checked_add(length) {
            Some(end) if end <= len => Ok(()),
            _ => Err(ChunkError::RangeOutOfBounds { index, length, len }),
        }
    }

    /// Panics if any structural invariant of the chunk chain is broken.
    #[cfg(any(test, feature = "fuzzing"))]
    pub fn check_invariants(&self) {
        assert_eq!(self.head, ChunkId(0), "head must be the first arena slot");
        assert_eq!(self.chunks[self.head.0].offset, 0, "head offset must be 0");

        let mut expected_offset = 0;
        let mut visited = 0;
        let mut last = self.head;
        for id in self.chunk_ids() {
            let chunk = &self.chunks[id.0];
            assert_eq!(chunk.offset, expected_offset, "offset of chunk {}", id.0);
            assert!(chunk.len <= chunk.capacity(), "chunk {} overflows", id.0);
            if id != self.tail {
                assert!(chunk.len > 0, "empty chunk {} before the tail", id.0);
            }
            expected_offset += chunk.len;
            visited += 1;
            last = id;
            assert!(visited <= self.chunks.len(), "cycle in the chunk chain");
        }
        assert_eq!(last, self.tail, "tail is not the last reachable chunk");
        assert_eq!(visited, self.chunks.len(), "unreachable arena slots");
        assert_eq!(self.len(), expected_offset, "length mismatch");

        let tail = &self.chunks[self.tail.0];
        assert!(
            tail.chars[tail.len..]
                .iter()
                .all(|&c| c == crate::chunk::PLACEHOLDER),
            "unused tail capacity is not zero-filled"
        );
        if let Some(flat) = self.flat.get() {
            assert!(flat.chars().eq(self.chars()), "stale flat cache");
        }
    }
}

impl Default for ChunkString {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ChunkString {
    fn clone(&self) -> Self {
        Self {
            chunks: self.chunks.clone(),
            head: self.head,
            tail: self.tail,
            options: self.options,
            flat: self.flat.clone(),
            failed: self.failed,
        }
    }
}

impl fmt::Debug for ChunkString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkString")
            .field("len", &self.len())
            .field("chunks", &self.chunk_count())
            .field("failed", &self.failed)
            .field("text", &self.as_str())
            .finish()
    }
}

impl fmt::Display for ChunkString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(flat) = self.flat.get() {
            return f.write_str(flat);
        }
        for segment in self.segments() {
            for &ch in segment {
                fmt::Write::write_char(f, ch)?;
            }
        }
        Ok(())
    }
}

impl fmt::Write for ChunkString {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.append(s).map(|_| ()).map_err(|_| fmt::Error)
    }

    fn write_char(&mut self, c: char) -> fmt::Result {
        self.append_char(c).map(|_| ()).map_err(|_| fmt::Error)
    }
}

impl PartialEq for ChunkString {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.chars().eq(other.chars())
    }
}

impl Eq for ChunkString {}

impl PartialEq<str> for ChunkString {
    fn eq(&self, other: &str) -> bool {
        self.chars().eq(other.chars())
    }
}

impl PartialEq<&str> for ChunkString {
    fn eq(&self, other: &&str) -> bool {
        self.chars().eq(other.chars())
    }
}

impl PartialEq<String> for ChunkString {
    fn eq(&self, other: &String) -> bool {
        self.chars().eq(other.chars())
    }
}

impl Hash for ChunkString {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        for ch in self.chars() {
            ch.hash(state);
        }
    }
}

impl From<&str> for ChunkString {
    fn from(text: &str) -> Self {
        match Self::from_str_with(text, ChunkOptions::default()) {
            Ok(buffer) => buffer,
            Err(_) => unreachable!("default max_capacity admits any str"),
        }
    }
}

impl From<String> for ChunkString {
    fn from(text: String) -> Self {
        Self::from(text.as_str())
    }
}

impl FromStr for ChunkString {
    type Err = ChunkError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::from_str_with(text, ChunkOptions::default())
    }
}

impl FromIterator<char> for ChunkString {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        let chars: Vec<char> = iter.into_iter().collect();
        match Self::from_chars(&chars, ChunkOptions::default()) {
            Ok(buffer) => buffer,
            Err(_) => unreachable!("default max_capacity admits any allocation"),
        }
    }
}
