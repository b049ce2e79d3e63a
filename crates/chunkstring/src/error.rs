use alloc::string::String;

use thiserror::Error;

/// Hard failures reported by [`ChunkString`](crate::ChunkString) operations.
///
/// "Not found" outcomes of the search-driven `replace_*`/`substring_*`
/// family are not errors; they set the buffer's failed flag instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChunkError {
    /// An index past the end of the buffer.
    #[error("index {index} is out of range for length {len}")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Buffer length at the time of the call.
        len: usize,
    },
    /// A range that does not fit inside the buffer.
    #[error("range {index}..{index}+{length} is out of bounds for length {len}")]
    RangeOutOfBounds {
        /// Start of the range.
        index: usize,
        /// Characters in the range.
        length: usize,
        /// Buffer length at the time of the call.
        len: usize,
    },
    /// A required argument was empty.
    #[error("argument `{0}` must not be empty")]
    EmptyArgument(&'static str),
    /// Growth would exceed the configured maximum capacity.
    #[error("cannot grow by {requested} characters, only {available} available")]
    CapacityExceeded {
        /// Characters the call needed to add.
        requested: usize,
        /// Characters left before `max_capacity`.
        available: usize,
    },
    /// Construction from bytes that are not UTF-8.
    #[error("invalid UTF-8 sequence at byte {valid_up_to}")]
    InvalidUtf8 {
        /// Length of the valid prefix, in bytes.
        valid_up_to: usize,
    },
    /// A malformed format template.
    #[error("format error: {0}")]
    Format(#[from] FormatError),
}

/// A malformed composite format template.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at index {index}")]
pub struct FormatError {
    /// What went wrong.
    pub kind: FormatErrorKind,
    /// Character index into the template where the problem was detected.
    pub index: usize,
}

/// Kinds of [`FormatError`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatErrorKind {
    /// `{` inside a format item that is not part of `{{`.
    #[error("unexpected '{{' inside a format item")]
    UnexpectedOpenBrace,
    /// A `}` outside any format item that is not part of `}}`.
    #[error("unexpected '}}' outside a format item")]
    UnexpectedCloseBrace,
    /// `{}` with nothing between the braces.
    #[error("empty format item")]
    EmptyExpression,
    /// The template ended inside a format item.
    #[error("unterminated format item")]
    Unterminated,
    /// The resolver rejected an item.
    #[error("cannot resolve `{expression}`: {source}")]
    Resolve {
        /// Item text between the braces.
        expression: String,
        /// Resolver failure.
        source: ResolveError,
    },
}

/// Failure of a [`ValueResolver`](crate::ValueResolver).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// A positional item past the end of the argument list.
    #[error("argument index {index} is out of range for {count} arguments")]
    IndexOutOfRange {
        /// Requested argument.
        index: usize,
        /// Arguments available.
        count: usize,
    },
    /// A named item with no matching value.
    #[error("unknown name `{0}`")]
    UnknownName(String),
    /// Item text the resolver cannot parse.
    #[error("malformed expression")]
    Malformed,
    /// A `:spec` suffix, which no built-in resolver understands.
    #[error("unsupported format specifier `{0}`")]
    UnsupportedFormat(String),
}
