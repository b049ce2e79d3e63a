//! Mutation engine.
//!
//! The primitives here are the only code that rewrites the chunk chain:
//! `append_iter`, `expand`, `shrink`, `truncate_to`, `crop_range`,
//! `reset`, `replace_in_place` and `assign`. They assume indices were
//! validated by the public methods that call them, and they clear the flat
//! cache before returning. Capacity overflow is checked up front, so a
//! rejected call leaves the buffer untouched.
//!
//! Expansion and shrinking both reduce to `move_chars`, which
//! copies characters between two chunk cursors one span at a time. A span
//! never crosses a chunk boundary on either side.

use crate::{
    capacity,
    chunk::{Chunk, ChunkId, PLACEHOLDER},
    error::ChunkError,
    string::ChunkString,
};

impl ChunkString {
    #[inline]
    pub(crate) fn invalidate(&mut self) {
        self.flat.take();
    }

    /// Appends `count` characters pulled from `chars`.
    pub(crate) fn append_iter<I>(&mut self, count: usize, mut chars: I) -> Result<(), ChunkError>
    where
        I: Iterator<Item = char>,
    {
        let available = self.options.max_capacity.saturating_sub(self.len());
        if count > available {
            log::debug!("rejecting append of {count} chars, {available} available");
            return Err(ChunkError::CapacityExceeded {
                requested: count,
                available,
            });
        }
        self.invalidate();
        if count == 0 {
            return Ok(());
        }

        let options = self.options;
        let mut remaining = count;

        let tail = &mut self.chunks[self.tail.0];
        let written = if tail.free() < remaining {
            let growth = capacity::grow(tail, remaining, &options);
            tail.resize(growth.capacity);
            growth.accepted
        } else {
            remaining
        };
        fill(tail, written, &mut chars);
        remaining -= written;

        let limit = options.chunk_limit();
        while remaining > 0 {
            let mut chunk = Chunk::with_capacity(self.len(), 0);
            let size = if remaining >= limit {
                limit
            } else {
                capacity::grow(&chunk, remaining, &options).capacity
            };
            chunk.resize(size);
            let written = remaining.min(size);
            fill(&mut chunk, written, &mut chars);
            remaining -= written;
            self.link(chunk);
        }
        Ok(())
    }

    fn link(&mut self, chunk: Chunk) {
        let id = ChunkId(self.chunks.len());
        log::trace!(
            "linking chunk {} at offset {} (capacity {})",
            id.0,
            chunk.offset,
            chunk.capacity()
        );
        self.chunks.push(chunk);
        self.chunks[self.tail.0].next = Some(id);
        self.tail = id;
    }

    /// Opens a gap of `length` placeholder characters at `index`.
    pub(crate) fn expand(&mut self, index: usize, length: usize) -> Result<(), ChunkError> {
        let old_len = self.len();
        debug_assert!(index <= old_len);
        self.append_iter(length, core::iter::repeat_n(PLACEHOLDER, length))?;
        self.move_chars(index, index + length, old_len - index);
        Ok(())
    }

    /// Removes `length` characters at `index`, shifting the rest left.
    pub(crate) fn shrink(&mut self, index: usize, length: usize) {
        if length == 0 {
            return;
        }
        let total = self.len();
        let end = index + length;
        debug_assert!(end <= total);
        if end < total {
            self.move_chars(end, index, total - end);
        }
        self.truncate_to(total - length);
    }

    /// Drops everything from `new_len` on; the chunk holding the new last
    /// character becomes the tail and later chunks are released.
    pub(crate) fn truncate_to(&mut self, new_len: usize) {
        self.invalidate();
        if new_len >= self.len() {
            return;
        }
        let keep = if new_len == 0 {
            self.head
        } else {
            self.find_chunk(new_len - 1)
        };

        let chunk = &mut self.chunks[keep.0];
        chunk.len = new_len - chunk.offset;
        chunk.clear_unused();
        let mut next = chunk.next.take();
        while let Some(id) = next {
            debug_assert!(id.0 > keep.0);
            let released = &mut self.chunks[id.0];
            next = released.next;
            log::trace!("releasing chunk {} at offset {}", id.0, released.offset);
            released.release();
        }
        self.chunks.truncate(keep.0 + 1);
        self.tail = keep;
    }

    /// Keeps exactly `[index, index + length)`.
    pub(crate) fn crop_range(&mut self, index: usize, length: usize) {
        let end = index + length;
        let total = self.len();
        self.shrink(end, total - end);
        if index != 0 {
            self.shrink(0, index);
        }
        self.invalidate();
    }

    /// Releases every chunk and installs a fresh head of `capacity`.
    pub(crate) fn reset(&mut self, capacity: usize) {
        for chunk in &mut self.chunks {
            chunk.release();
        }
        self.chunks.clear();
        let capacity = capacity
            .min(self.options.chunk_limit())
            .min(self.options.max_capacity);
        self.chunks.push(Chunk::with_capacity(0, capacity));
        self.head = ChunkId(0);
        self.tail = ChunkId(0);
        self.invalidate();
    }

    /// Replaces `old_length` characters at `index` with `new_len` characters
    /// pulled from `chars`.
    pub(crate) fn replace_in_place<I>(
        &mut self,
        index: usize,
        old_length: usize,
        new_len: usize,
        chars: I,
    ) -> Result<(), ChunkError>
    where
        I: Iterator<Item = char>,
    {
        if new_len == 0 {
            self.shrink(index, old_length);
            return Ok(());
        }
        if new_len > old_length {
            self.expand(index + old_length, new_len - old_length)?;
        } else if old_length > new_len {
            self.shrink(index + new_len, old_length - new_len);
        }
        self.assign(index, chars);
        Ok(())
    }

    /// Single-character fast path of [`replace_in_place`](Self::replace_in_place).
    pub(crate) fn replace_with_char(
        &mut self,
        index: usize,
        old_length: usize,
        ch: char,
    ) -> Result<(), ChunkError> {
        if old_length == 0 {
            self.expand(index, 1)?;
        } else if old_length > 1 {
            self.shrink(index + 1, old_length - 1);
        }
        self.assign(index, core::iter::once(ch));
        Ok(())
    }

    /// Overwrites characters from `index` on without resizing.
    pub(crate) fn assign<I>(&mut self, index: usize, chars: I)
    where
        I: Iterator<Item = char>,
    {
        self.invalidate();
        let mut id = self.find_chunk(index);
        let mut local = index - self.chunks[id.0].offset;
        for ch in chars {
            while local >= self.chunks[id.0].len {
                let Some(next) = self.chunks[id.0].next else {
                    debug_assert!(false, "assign past the end of the buffer");
                    return;
                };
                id = next;
                local = 0;
            }
            self.chunks[id.0].chars[local] = ch;
            local += 1;
        }
    }

    /// Copies `count` characters from global index `src` to `dst`.
    ///
    /// Shifting left walks forward from the front of the range; shifting
    /// right walks backward from its end so the source is read before it is
    /// overwritten.
    pub(crate) fn move_chars(&mut self, src: usize, dst: usize, count: usize) {
        if count == 0 || src == dst {
            return;
        }
        self.invalidate();
        if dst < src {
            self.move_forward(src, dst, count);
        } else {
            self.move_backward(src, dst, count);
        }
    }

    fn move_forward(&mut self, mut src: usize, mut dst: usize, mut remaining: usize) {
        let mut s = self.find_chunk(src);
        let mut d = self.find_chunk(dst);
        while remaining > 0 {
            let (Some(next_s), Some(next_d)) =
                (self.forward_to(s, src), self.forward_to(d, dst))
            else {
                debug_assert!(false, "forward move ran off the chain");
                return;
            };
            s = next_s;
            d = next_d;
            let source = &self.chunks[s.0];
            let target = &self.chunks[d.0];
            let span = remaining
                .min(source.end() - src)
                .min(target.end() - dst);
            let (s_local, d_local) = (src - source.offset, dst - target.offset);
            self.copy_span(s, s_local, d, d_local, span);
            src += span;
            dst += span;
            remaining -= span;
        }
    }

    fn move_backward(&mut self, src: usize, dst: usize, mut remaining: usize) {
        let mut src_end = src + remaining;
        let mut dst_end = dst + remaining;
        let mut s = self.find_chunk(src_end - 1);
        let mut d = self.find_chunk(dst_end - 1);
        while remaining > 0 {
            let (Some(prev_s), Some(prev_d)) =
                (self.backward_to(s, src_end), self.backward_to(d, dst_end))
            else {
                debug_assert!(false, "backward move ran off the chain");
                return;
            };
            s = prev_s;
            d = prev_d;
            let source = &self.chunks[s.0];
            let target = &self.chunks[d.0];
            let span = remaining
                .min(src_end - source.offset)
                .min(dst_end - target.offset);
            let s_local = src_end - span - source.offset;
            let d_local = dst_end - span - target.offset;
            self.copy_span(s, s_local, d, d_local, span);
            src_end -= span;
            dst_end -= span;
            remaining -= span;
        }
    }

    /// Follows `next` links until the chunk contains `index`.
    fn forward_to(&self, mut id: ChunkId, index: usize) -> Option<ChunkId> {
        while index >= self.chunks[id.0].end() {
            id = self.chunks[id.0].next?;
        }
        Some(id)
    }

    /// Steps to preceding chunks until the chunk contains `end - 1`.
    fn backward_to(&self, mut id: ChunkId, end: usize) -> Option<ChunkId> {
        while end <= self.chunks[id.0].offset {
            id = self.previous_chunk(id)?;
        }
        Some(id)
    }

    fn copy_span(&mut self, s: ChunkId, s_local: usize, d: ChunkId, d_local: usize, span: usize) {
        if s == d {
            self.chunks[s.0]
                .chars
                .copy_within(s_local..s_local + span, d_local);
            return;
        }
        let (source, target) = pair_mut(&mut self.chunks, s.0, d.0);
        target.chars[d_local..d_local + span].copy_from_slice(&source.chars[s_local..s_local + span]);
    }

    // --------------------------------------------------------------------
    // Public surface
    // --------------------------------------------------------------------

    /// Appends `text`.
    ///
    /// # Errors
    ///
    /// [`ChunkError::CapacityExceeded`] if the result would be longer than
    /// the maximum capacity; the buffer is left unchanged.
    pub fn append(&mut self, text: &str) -> Result<&mut Self, ChunkError> {
        self.failed = false;
        self.append_iter(text.chars().count(), text.chars())?;
        Ok(self)
    }

    /// Appends a single character.
    ///
    /// # Errors
    ///
    /// [`ChunkError::CapacityExceeded`] if the buffer is full.
    pub fn append_char(&mut self, ch: char) -> Result<&mut Self, ChunkError> {
        self.failed = false;
        self.append_iter(1, core::iter::once(ch))?;
        Ok(self)
    }

    /// Appends a slice of characters.
    ///
    /// # Errors
    ///
    /// [`ChunkError::CapacityExceeded`] if the result would be too long.
    pub fn append_chars(&mut self, chars: &[char]) -> Result<&mut Self, ChunkError> {
        self.failed = false;
        self.append_iter(chars.len(), chars.iter().copied())?;
        Ok(self)
    }

    /// Appends `text` followed by `\n`.
    ///
    /// # Errors
    ///
    /// [`ChunkError::CapacityExceeded`] if the result would be too long.
    pub fn append_line(&mut self, text: &str) -> Result<&mut Self, ChunkError> {
        self.failed = false;
        let count = text.chars().count() + 1;
        self.append_iter(count, text.chars().chain(core::iter::once('\n')))?;
        Ok(self)
    }

    /// Inserts `text` at the front.
    ///
    /// # Errors
    ///
    /// [`ChunkError::CapacityExceeded`] if the result would be too long.
    pub fn prepend(&mut self, text: &str) -> Result<&mut Self, ChunkError> {
        self.insert(0, text)
    }

    /// Inserts `ch` at the front.
    ///
    /// # Errors
    ///
    /// [`ChunkError::CapacityExceeded`] if the buffer is full.
    pub fn prepend_char(&mut self, ch: char) -> Result<&mut Self, ChunkError> {
        self.insert_char(0, ch)
    }

    /// Inserts `text` before the character at `index`.
    ///
    /// # Errors
    ///
    /// [`ChunkError::IndexOutOfRange`] if `index > len`, or
    /// [`ChunkError::CapacityExceeded`] if the result would be too long.
    pub fn insert(&mut self, index: usize, text: &str) -> Result<&mut Self, ChunkError> {
        self.failed = false;
        self.check_index(index)?;
        let count = text.chars().count();
        if index == self.len() {
            self.append_iter(count, text.chars())?;
        } else {
            self.expand(index, count)?;
            self.assign(index, text.chars());
        }
        Ok(self)
    }

    /// Inserts `ch` before the character at `index`.
    ///
    /// # Errors
    ///
    /// [`ChunkError::IndexOutOfRange`] if `index > len`, or
    /// [`ChunkError::CapacityExceeded`] if the buffer is full.
    pub fn insert_char(&mut self, index: usize, ch: char) -> Result<&mut Self, ChunkError> {
        self.failed = false;
        self.check_index(index)?;
        self.expand(index, 1)?;
        self.assign(index, core::iter::once(ch));
        Ok(self)
    }

    /// Removes `length` characters starting at `index`.
    ///
    /// # Errors
    ///
    /// [`ChunkError::RangeOutOfBounds`] if the range does not fit.
    pub fn remove(&mut self, index: usize, length: usize) -> Result<&mut Self, ChunkError> {
        self.failed = false;
        self.check_range(index, length)?;
        self.shrink(index, length);
        Ok(self)
    }

    /// Keeps only `[index, index + length)`.
    ///
    /// # Errors
    ///
    /// [`ChunkError::RangeOutOfBounds`] if the range does not fit.
    pub fn crop(&mut self, index: usize, length: usize) -> Result<&mut Self, ChunkError> {
        self.failed = false;
        self.check_range(index, length)?;
        self.crop_range(index, length);
        Ok(self)
    }

    /// Shortens the buffer to `len` characters; longer values do nothing.
    pub fn truncate(&mut self, len: usize) -> &mut Self {
        self.failed = false;
        self.truncate_to(len);
        self
    }

    /// Removes everything, keeping a single chunk of the initial capacity.
    pub fn clear(&mut self) -> &mut Self {
        self.clear_with_capacity(self.options.initial_capacity)
    }

    /// Removes everything, keeping a single chunk of `capacity`.
    pub fn clear_with_capacity(&mut self, capacity: usize) -> &mut Self {
        self.failed = false;
        self.reset(capacity);
        self
    }

    /// Replaces `length` characters at `index` with `text`.
    ///
    /// # Errors
    ///
    /// [`ChunkError::RangeOutOfBounds`] if the range does not fit, or
    /// [`ChunkError::CapacityExceeded`] if the result would be too long.
    pub fn substitute(
        &mut self,
        index: usize,
        length: usize,
        text: &str,
    ) -> Result<&mut Self, ChunkError> {
        self.failed = false;
        self.check_range(index, length)?;
        self.replace_in_place(index, length, text.chars().count(), text.chars())?;
        Ok(self)
    }

    /// Rewrites every character in place.
    pub(crate) fn map_chars(&mut self, mut f: impl FnMut(char) -> char) {
        self.invalidate();
        // Every arena slot is a live chunk, so order does not matter here.
        for chunk in &mut self.chunks {
            let len = chunk.len;
            for ch in &mut chunk.chars[..len] {
                *ch = f(*ch);
            }
        }
    }
}

/// Fills the next `count` slots of `chunk` from `chars`.
fn fill(chunk: &mut Chunk, count: usize, chars: &mut impl Iterator<Item = char>) {
    let start = chunk.len;
    for slot in &mut chunk.chars[start..start + count] {
        *slot = chars.next().unwrap_or(PLACEHOLDER);
    }
    chunk.len += count;
}

/// Shared access to `chunks[a]` and exclusive access to `chunks[b]`.
fn pair_mut(chunks: &mut [Chunk], a: usize, b: usize) -> (&Chunk, &mut Chunk) {
    debug_assert_ne!(a, b);
    if a < b {
        let (left, right) = chunks.split_at_mut(b);
        (&left[a], &mut right[0])
    } else {
        let (left, right) = chunks.split_at_mut(a);
        (&right[0], &mut left[b])
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use rstest::rstest;

    use crate::{ChunkError, ChunkOptions, ChunkString};

    fn small(text: &str, chunk: usize) -> ChunkString {
        ChunkString::from_str_with(text, ChunkOptions::with_max_chunk_len(chunk)).unwrap()
    }

    #[test]
    fn append_fills_tail_before_linking() {
        let mut text = small("ab", 4);
        assert_eq!(text.chunk_count(), 1);
        text.append("cd").unwrap();
        assert_eq!(text.chunk_count(), 1);
        text.append("efghijklm").unwrap();
        text.check_invariants();
        assert_eq!(text.chunk_count(), 4);
        assert_eq!(text, "abcdefghijklm");
    }

    #[test]
    fn append_chain_and_line() {
        let mut text = ChunkString::new();
        text.append("a").unwrap().append_char('b').unwrap().append_line("c").unwrap();
        text.append_chars(&['d', 'e']).unwrap();
        assert_eq!(text, "abc\nde");
    }

    #[rstest]
    #[case(0, "XY", "XYabcdefghij")]
    #[case(3, "XY", "abcXYdefghij")]
    #[case(4, "XYZWV", "abcdXYZWVefghij")]
    #[case(10, "XY", "abcdefghijXY")]
    #[case(5, "", "abcdefghij")]
    fn insert_shifts_across_chunks(#[case] index: usize, #[case] insert: &str, #[case] expected: &str) {
        for chunk in [1, 2, 3, 4, 16] {
            let mut text = small("abcdefghij", chunk);
            text.insert(index, insert).unwrap();
            text.check_invariants();
            assert_eq!(text, expected, "chunk size {chunk}");
        }
    }

    #[rstest]
    #[case(0, 3, "defghij")]
    #[case(2, 5, "abhij")]
    #[case(7, 3, "abcdefg")]
    #[case(0, 10, "")]
    #[case(4, 0, "abcdefghij")]
    #[case(9, 1, "abcdefghi")]
    fn remove_closes_the_gap(#[case] index: usize, #[case] length: usize, #[case] expected: &str) {
        for chunk in [1, 2, 3, 4, 16] {
            let mut text = small("abcdefghij", chunk);
            text.remove(index, length).unwrap();
            text.check_invariants();
            assert_eq!(text, expected, "chunk size {chunk}");
        }
    }

    #[test]
    fn remove_releases_surplus_chunks() {
        let mut text = small("abcdefghijklmnop", 4);
        assert_eq!(text.chunk_count(), 4);
        text.remove(1, 10).unwrap();
        text.check_invariants();
        assert_eq!(text, "almnop");
        assert_eq!(text.chunk_count(), 2);
    }

    #[test]
    fn crop_keeps_range() {
        let mut text = small("0123456789", 3);
        text.crop(2, 5).unwrap();
        text.check_invariants();
        assert_eq!(text, "23456");
        text.crop(0, 5).unwrap();
        assert_eq!(text, "23456");
        assert_eq!(
            text.crop(3, 3).unwrap_err(),
            ChunkError::RangeOutOfBounds {
                index: 3,
                length: 3,
                len: 5
            }
        );
    }

    #[test]
    fn substitute_grows_and_shrinks() {
        let mut text = small("hello world", 3);
        text.substitute(0, 5, "goodbye").unwrap();
        assert_eq!(text, "goodbye world");
        text.substitute(8, 5, "all").unwrap();
        assert_eq!(text, "goodbye all");
        text.substitute(4, 3, "").unwrap();
        assert_eq!(text, "good all");
        text.check_invariants();
    }

    #[test]
    fn replace_with_char_fast_path() {
        let mut text = small("abcdef", 2);
        text.replace_with_char(1, 3, '-').unwrap();
        assert_eq!(text, "a-ef");
        text.replace_with_char(4, 0, '!').unwrap();
        assert_eq!(text, "a-ef!");
        text.check_invariants();
    }

    #[test]
    fn clear_installs_single_chunk() {
        let mut text = small("abcdefghijkl", 4);
        text.clear();
        text.check_invariants();
        assert!(text.is_empty());
        assert_eq!(text.chunk_count(), 1);
        text.append("again").unwrap();
        assert_eq!(text, "again");
    }

    #[test]
    fn truncate_and_prepend() {
        let mut text = small("abcdef", 2);
        text.truncate(3).prepend(">> ").unwrap();
        text.prepend_char('[').unwrap().append_char(']').unwrap();
        assert_eq!(text, "[>> abc]");
        text.truncate(100);
        assert_eq!(text.len(), 8);
        text.check_invariants();
    }

    #[test]
    fn capacity_overflow_leaves_buffer_unchanged() {
        let options = ChunkOptions {
            max_capacity: 8,
            max_chunk_len: 3,
            ..ChunkOptions::default()
        };
        let mut text = ChunkString::from_str_with("abcdef", options).unwrap();
        let err = text.append("xyz").unwrap_err();
        assert_eq!(
            err,
            ChunkError::CapacityExceeded {
                requested: 3,
                available: 2
            }
        );
        assert_eq!(text, "abcdef");
        let err = text.insert(1, "xyz").unwrap_err();
        assert!(matches!(err, ChunkError::CapacityExceeded { .. }));
        assert_eq!(text, "abcdef");
        text.insert(1, "xy").unwrap();
        assert_eq!(text, "axybcdef");
        text.check_invariants();
    }

    #[test]
    fn flat_cache_is_invalidated() {
        let mut text = small("abc", 2);
        assert_eq!(text.as_str(), "abc");
        text.insert(1, "-").unwrap();
        text.check_invariants();
        assert_eq!(text.as_str(), "a-bc");
        text.remove(0, 2).unwrap();
        assert_eq!(text.as_str(), "bc");
    }

    #[test]
    fn write_macro_appends() {
        use core::fmt::Write;

        let mut text = small("n=", 2);
        write!(text, "{}/{}", 3, 4).unwrap();
        assert_eq!(text, "n=3/4");
        assert_eq!(String::from(text.as_str()), "n=3/4");
    }
}
