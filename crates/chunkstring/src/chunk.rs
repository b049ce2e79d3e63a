//! Chunk storage: one fixed-capacity slab of characters in the chain.

use alloc::{boxed::Box, vec};

/// Filler for unused capacity and for the gap opened by an expansion.
pub(crate) const PLACEHOLDER: char = '\0';

/// Index of a chunk inside the buffer's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ChunkId(pub(crate) usize);

/// A node of the chunk chain.
///
/// `offset` is the sum of the lengths of every chunk before this one, `len`
/// is the number of characters in use at the front of `chars`.
#[derive(Debug, Clone)]
pub(crate) struct Chunk {
    pub(crate) offset: usize,
    pub(crate) len: usize,
    pub(crate) chars: Box<[char]>,
    pub(crate) next: Option<ChunkId>,
}

impl Chunk {
    pub(crate) fn with_capacity(offset: usize, capacity: usize) -> Self {
        Self {
            offset,
            len: 0,
            chars: vec![PLACEHOLDER; capacity].into_boxed_slice(),
            next: None,
        }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.chars.len()
    }

    #[inline]
    pub(crate) fn free(&self) -> usize {
        self.chars.len() - self.len
    }

    /// Global index one past the last used character.
    #[inline]
    pub(crate) fn end(&self) -> usize {
        self.offset + self.len
    }

    #[inline]
    pub(crate) fn contains(&self, index: usize) -> bool {
        index >= self.offset && index < self.end()
    }

    #[inline]
    pub(crate) fn as_slice(&self) -> &[char] {
        &self.chars[..self.len]
    }

    /// Reallocates the backing array to `capacity`, keeping the used prefix.
    pub(crate) fn resize(&mut self, capacity: usize) {
        debug_assert!(capacity >= self.len);
        if capacity == self.capacity() {
            return;
        }
        let mut chars = vec![PLACEHOLDER; capacity].into_boxed_slice();
        chars[..self.len].copy_from_slice(&self.chars[..self.len]);
        self.chars = chars;
    }

    /// Zero-fills everything past `len`.
    pub(crate) fn clear_unused(&mut self) {
        self.chars[self.len..].fill(PLACEHOLDER);
    }

    /// Drops the backing array and unlinks the chunk.
    pub(crate) fn release(&mut self) {
        self.offset = 0;
        self.len = 0;
        self.chars = Box::default();
        self.next = None;
    }
}
