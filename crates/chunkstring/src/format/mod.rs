//! Composite formatting performed in place.
//!
//! A template is first copied into the buffer, then scanned by a four-state
//! machine that deletes structural braces as it consumes them, collapses
//! `{{` and `}}` to literal braces, and splices each resolved item over its
//! expression text. The scan region shrinks and grows with those edits, so
//! the scanner tracks the region end live.
//!
//! ```rust
//! use chunkstring::ChunkString;
//!
//! let mut text = ChunkString::from("total: ");
//! text.append_format("{0} of {1} ({{approx}})", &[3, 7]).unwrap();
//! assert_eq!(text, "total: 3 of 7 ({approx})");
//! ```

mod resolver;

use alloc::string::String;

pub use self::resolver::{ResolverFn, ValueResolver};
use crate::{
    error::{ChunkError, FormatError, FormatErrorKind},
    string::ChunkString,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Outside,
    OpenBrace,
    Inside,
    CloseBrace,
}

/// Scanner over one template region `[cursor, end)` of a buffer.
#[derive(Debug)]
struct FormatScanner {
    state: State,
    /// Buffer index of the next character to examine.
    cursor: usize,
    /// Exclusive end of the region; moves with every deletion and splice.
    end: usize,
    in_expression: bool,
    expression: String,
    /// Buffer index of the first expression character.
    expression_start: usize,
    /// Template index of the opening brace of the current item.
    expression_index: usize,
    /// Template characters consumed so far; used to locate errors.
    consumed: usize,
}

impl FormatScanner {
    fn new(start: usize, end: usize) -> Self {
        Self {
            state: State::Outside,
            cursor: start,
            end,
            in_expression: false,
            expression: String::new(),
            expression_start: start,
            expression_index: 0,
            consumed: 0,
        }
    }

    fn error(&self, kind: FormatErrorKind, index: usize) -> ChunkError {
        let error = FormatError { kind, index };
        log::debug!("format failed: {error}");
        ChunkError::Format(error)
    }

    /// Deletes the brace under the cursor.
    fn consume_brace(&mut self, buffer: &mut ChunkString) {
        buffer.shrink(self.cursor, 1);
        self.end -= 1;
        self.consumed += 1;
    }

    /// Keeps the character under the cursor.
    fn keep(&mut self) {
        self.cursor += 1;
        self.consumed += 1;
    }

    fn run<R>(&mut self, buffer: &mut ChunkString, resolver: &R) -> Result<(), ChunkError>
    where
        R: ValueResolver + ?Sized,
    {
        loop {
            let ch = if self.cursor < self.end {
                buffer.char_at(self.cursor)
            } else {
                None
            };
            match (self.state, ch) {
                (State::Outside, None) => return Ok(()),
                (State::Outside, Some('{')) => {
                    self.expression_index = self.consumed;
                    self.consume_brace(buffer);
                    self.expression_start = self.cursor;
                    self.state = State::OpenBrace;
                }
                (State::Outside, Some('}')) => {
                    self.consume_brace(buffer);
                    self.state = State::CloseBrace;
                }
                (State::Outside, Some(_)) => self.keep(),

                (State::OpenBrace | State::Inside, None) => {
                    return Err(self.error(FormatErrorKind::Unterminated, self.consumed));
                }
                (State::OpenBrace, Some('{')) => {
                    self.keep();
                    if self.in_expression {
                        self.expression.push('{');
                        self.state = State::Inside;
                    } else {
                        self.state = State::Outside;
                    }
                }
                (State::OpenBrace, Some(_)) if self.in_expression => {
                    return Err(self.error(FormatErrorKind::UnexpectedOpenBrace, self.consumed - 1));
                }
                (State::OpenBrace, Some('}')) => {
                    return Err(self.error(FormatErrorKind::EmptyExpression, self.consumed));
                }
                (State::OpenBrace, Some(_)) => {
                    self.in_expression = true;
                    self.expression.clear();
                    self.state = State::Inside;
                }

                (State::Inside, Some('{')) => {
                    self.consume_brace(buffer);
                    self.state = State::OpenBrace;
                }
                (State::Inside, Some('}')) => {
                    self.consume_brace(buffer);
                    self.state = State::CloseBrace;
                }
                (State::Inside, Some(other)) => {
                    self.expression.push(other);
                    self.keep();
                }

                (State::CloseBrace, Some('}')) => {
                    self.keep();
                    if self.in_expression {
                        self.expression.push('}');
                        self.state = State::Inside;
                    } else {
                        self.state = State::Outside;
                    }
                }
                (State::CloseBrace, _) if self.in_expression => {
                    self.commit(buffer, resolver)?;
                    self.state = State::Outside;
                }
                (State::CloseBrace, _) => {
                    return Err(self.error(FormatErrorKind::UnexpectedCloseBrace, self.consumed - 1));
                }
            }
        }
    }

    /// Resolves the pending expression and splices the value over it.
    fn commit<R>(&mut self, buffer: &mut ChunkString, resolver: &R) -> Result<(), ChunkError>
    where
        R: ValueResolver + ?Sized,
    {
        let value = resolver.resolve(&self.expression).map_err(|source| {
            self.error(
                FormatErrorKind::Resolve {
                    expression: self.expression.clone(),
                    source,
                },
                self.expression_index,
            )
        })?;
        let old_len = self.cursor - self.expression_start;
        let new_len = value.chars().count();
        buffer.replace_in_place(self.expression_start, old_len, new_len, value.chars())?;
        self.end = self.end - old_len + new_len;
        self.cursor = self.expression_start + new_len;
        self.in_expression = false;
        self.expression.clear();
        Ok(())
    }
}

impl ChunkString {
    /// Formats `[start, start + len)` in place; on error the region is
    /// removed again so the buffer reads as before the template was copied
    /// in.
    fn format_region<R>(&mut self, start: usize, len: usize, resolver: &R) -> Result<(), ChunkError>
    where
        R: ValueResolver + ?Sized,
    {
        let mut scanner = FormatScanner::new(start, start + len);
        let result = scanner.run(self, resolver);
        if result.is_err() {
            self.shrink(start, scanner.end - start);
        }
        result
    }

    /// Appends `template` with every `{expression}` replaced by its
    /// resolved value.
    ///
    /// `{{` and `}}` produce literal braces. Inside an item they are kept
    /// in the expression text, so `{{{a}}}` yields a literal `{` followed
    /// by the value of `a}`, not the value of `a` wrapped in braces.
    ///
    /// # Errors
    ///
    /// [`ChunkError::Format`] for a malformed template or an item the
    /// resolver rejects, or [`ChunkError::CapacityExceeded`]. The buffer is
    /// unchanged on error.
    pub fn append_format<R>(&mut self, template: &str, resolver: &R) -> Result<&mut Self, ChunkError>
    where
        R: ValueResolver + ?Sized,
    {
        self.failed = false;
        let start = self.len();
        let count = template.chars().count();
        self.append_iter(count, template.chars())?;
        self.format_region(start, count, resolver)?;
        Ok(self)
    }

    /// Like [`append_format`](Self::append_format), followed by `\n`.
    ///
    /// # Errors
    ///
    /// As [`append_format`](Self::append_format).
    pub fn append_line_format<R>(
        &mut self,
        template: &str,
        resolver: &R,
    ) -> Result<&mut Self, ChunkError>
    where
        R: ValueResolver + ?Sized,
    {
        let start = self.len();
        self.append_format(template, resolver)?;
        if let Err(err) = self.append_iter(1, core::iter::once('\n')) {
            self.shrink(start, self.len() - start);
            return Err(err);
        }
        Ok(self)
    }

    /// Inserts the formatted `template` at the front.
    ///
    /// # Errors
    ///
    /// As [`append_format`](Self::append_format).
    pub fn prepend_format<R>(&mut self, template: &str, resolver: &R) -> Result<&mut Self, ChunkError>
    where
        R: ValueResolver + ?Sized,
    {
        self.insert_format(0, template, resolver)
    }

    /// Inserts the formatted `template` before the character at `index`.
    ///
    /// # Errors
    ///
    /// [`ChunkError::IndexOutOfRange`] if `index > len`, otherwise as
    /// [`append_format`](Self::append_format).
    pub fn insert_format<R>(
        &mut self,
        index: usize,
        template: &str,
        resolver: &R,
    ) -> Result<&mut Self, ChunkError>
    where
        R: ValueResolver + ?Sized,
    {
        self.insert(index, template)?;
        self.format_region(index, template.chars().count(), resolver)?;
        Ok(self)
    }
}
