/// Smallest backing array handed out to a chunk.
pub const MIN_CHUNK_CAPACITY: usize = 16;

/// Default upper bound on a single chunk's backing array, in characters.
///
/// 16 384 `char`s is 64 KiB, comfortably below the size at which allocators
/// switch to dedicated large-allocation paths.
pub const DEFAULT_MAX_CHUNK_LEN: usize = 16 * 1024;

/// Configuration for a [`ChunkString`](crate::ChunkString).
///
/// # Examples
///
/// ```rust
/// use chunkstring::{ChunkOptions, ChunkString};
///
/// let options = ChunkOptions {
///     max_capacity: 1024,
///     ..Default::default()
/// };
/// let mut text = ChunkString::with_options(options);
/// text.append("hello").unwrap();
/// assert_eq!(text.max_capacity(), 1024);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ChunkOptions {
    /// Capacity of the first chunk.
    ///
    /// Clamped to `max_chunk_len` and `max_capacity`.
    ///
    /// # Default
    ///
    /// `16`
    pub initial_capacity: usize,

    /// Hard limit on the logical length of the buffer.
    ///
    /// Appends and insertions that would grow the buffer past this limit are
    /// rejected as a whole with
    /// [`ChunkError::CapacityExceeded`](crate::ChunkError::CapacityExceeded).
    ///
    /// # Default
    ///
    /// `usize::MAX`
    pub max_capacity: usize,

    /// Largest backing array of a single chunk, in characters.
    ///
    /// Content beyond this size spills into additional chunks. Small values
    /// are useful in tests to force many chunk boundaries.
    ///
    /// # Default
    ///
    /// [`DEFAULT_MAX_CHUNK_LEN`]
    pub max_chunk_len: usize,
}

impl Default for ChunkOptions {
    fn default() -> Self {
        Self {
            initial_capacity: MIN_CHUNK_CAPACITY,
            max_capacity: usize::MAX,
            max_chunk_len: DEFAULT_MAX_CHUNK_LEN,
        }
    }
}

impl ChunkOptions {
    /// Options with the given per-chunk limit and otherwise default values.
    #[must_use]
    pub fn with_max_chunk_len(max_chunk_len: usize) -> Self {
        Self {
            max_chunk_len,
            ..Self::default()
        }
    }

    /// Chunk limit actually used; never zero.
    pub(crate) fn chunk_limit(&self) -> usize {
        self.max_chunk_len.max(1)
    }
}

/// How characters are compared by the search family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Comparison {
    /// Exact `char` equality.
    #[default]
    Ordinal,
    /// Equality after simple per-character lowercase folding.
    OrdinalIgnoreCase,
}

impl Comparison {
    #[inline]
    pub(crate) fn ignore_case(self) -> bool {
        matches!(self, Comparison::OrdinalIgnoreCase)
    }
}

/// Which match a marker-driven operation anchors on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Occurrence {
    /// The lowest-index match.
    #[default]
    First,
    /// The highest-index match.
    Last,
}

/// Whether [`split`](crate::ChunkString::split) keeps empty segments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SplitMode {
    /// Emit a segment for every gap, including empty ones.
    #[default]
    KeepEmpty,
    /// Skip zero-length gaps.
    OmitEmpty,
}

/// Options for [`split`](crate::ChunkString::split).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SplitOptions {
    /// Empty segment handling.
    ///
    /// # Default
    ///
    /// [`SplitMode::KeepEmpty`]
    pub mode: SplitMode,

    /// Maximum number of segments returned. The last segment holds the
    /// unsplit remainder.
    ///
    /// # Default
    ///
    /// `usize::MAX`
    pub max_segments: usize,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            mode: SplitMode::KeepEmpty,
            max_segments: usize::MAX,
        }
    }
}

impl SplitOptions {
    /// Keep empty segments, no segment limit.
    #[must_use]
    pub fn keep_empty() -> Self {
        Self::default()
    }

    /// Omit empty segments, no segment limit.
    #[must_use]
    pub fn omit_empty() -> Self {
        Self {
            mode: SplitMode::OmitEmpty,
            ..Self::default()
        }
    }

    /// Same mode with a segment limit.
    #[must_use]
    pub fn max_segments(self, max_segments: usize) -> Self {
        Self {
            max_segments,
            ..self
        }
    }
}
