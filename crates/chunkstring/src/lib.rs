//! A growable text buffer for editing very large strings in place.
//!
//! [`ChunkString`] stores its characters in a chain of bounded chunks
//! instead of one contiguous allocation. Appends fill the last chunk and
//! spill into new ones; insertions and removals shift characters across
//! chunk boundaries without reallocating the whole text. On top of the
//! chunk engine sit chunk-crossing search, in-place composite formatting
//! (`{0}`, `{name}`, `{{`/`}}` escapes) and delimiter splitting.
//!
//! ```rust
//! use chunkstring::{ChunkString, Delimiters, Occurrence, SplitOptions};
//!
//! let mut text = ChunkString::new();
//! text.append_format("name: {0}, id: {1}", &["ada", "7"]).unwrap();
//! assert_eq!(text, "name: ada, id: 7");
//!
//! text.substring_after(": ", Occurrence::First).unwrap();
//! assert_eq!(text, "ada, id: 7");
//!
//! let parts = text.split(&Delimiters::Chars(&[',']), SplitOptions::omit_empty());
//! assert_eq!(parts, ["ada", " id: 7"]);
//! ```
//!
//! Search-driven edits such as [`ChunkString::replace`] or
//! [`ChunkString::substring_before`] do not treat a missing target as an
//! error. They leave the buffer unchanged and set a flag that
//! [`ChunkString::fail`] and [`ChunkString::succeed`] branch on.

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod capacity;
mod chunk;
mod error;
mod fluent;
mod format;
mod iter;
mod mutate;
mod options;
mod search;
mod shape;
mod split;
mod string;

#[cfg(test)]
mod tests;

pub use error::{ChunkError, FormatError, FormatErrorKind, ResolveError};
pub use format::{ResolverFn, ValueResolver};
pub use iter::{Chars, Lines};
pub use options::{
    ChunkOptions, Comparison, DEFAULT_MAX_CHUNK_LEN, MIN_CHUNK_CAPACITY, Occurrence, SplitMode,
    SplitOptions,
};
pub use search::{Needle, is_whitespace};
pub use split::{Delimiter, Delimiters};
pub use string::ChunkString;
