//! Growth policy for a chunk's backing array.
//!
//! Capacity doubles from [`MIN_CHUNK_CAPACITY`] until the requested length
//! fits, but never beyond the configured chunk limit and never so far that
//! the chunk would end past the buffer's maximum capacity. When the maximum
//! capacity clamps the result, [`Growth::accepted`] is smaller than the
//! request and the caller stores only that many characters in this chunk.

use crate::{chunk::Chunk, options::ChunkOptions, options::MIN_CHUNK_CAPACITY};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Growth {
    /// New size of the backing array; never below the current one.
    pub(crate) capacity: usize,
    /// How many of the requested characters fit after growing.
    pub(crate) accepted: usize,
}

pub(crate) fn grow(chunk: &Chunk, requested: usize, options: &ChunkOptions) -> Growth {
    let limit = options.chunk_limit();
    let mut capacity = chunk.capacity().max(MIN_CHUNK_CAPACITY.min(limit));
    while capacity - chunk.len < requested && capacity < limit {
        capacity = capacity.saturating_mul(2);
    }
    capacity = capacity.min(limit);

    let ceiling = options.max_capacity.saturating_sub(chunk.offset);
    if capacity > ceiling {
        capacity = ceiling;
    }
    capacity = capacity.max(chunk.capacity());

    Growth {
        capacity,
        accepted: requested.min(capacity - chunk.len),
    }
}

/// Capacity for the first chunk of a buffer.
pub(crate) fn initial(options: &ChunkOptions) -> usize {
    options
        .initial_capacity
        .min(options.chunk_limit())
        .min(options.max_capacity)
}
