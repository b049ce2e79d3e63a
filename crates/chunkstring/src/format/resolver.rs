use alloc::{
    collections::BTreeMap,
    format,
    string::{String, ToString},
    vec::Vec,
};
use core::{borrow::Borrow, fmt::Display};

use crate::error::ResolveError;

/// Turns the text of a format item into its substitution.
///
/// The format engine hands over the expression exactly as written between
/// the braces, with escaped braces already collapsed.
pub trait ValueResolver {
    /// Resolves `expression` to the text spliced into the buffer.
    ///
    /// # Errors
    ///
    /// Any [`ResolveError`]; the format call reports it with the position of
    /// the offending item and leaves the buffer unchanged.
    fn resolve(&self, expression: &str) -> Result<String, ResolveError>;
}

/// Splits `expression` into the part before `:` and a format specifier,
/// rejecting non-empty specifiers.
fn strip_spec(expression: &str) -> Result<&str, ResolveError> {
    match expression.split_once(':') {
        Some((_, spec)) if !spec.is_empty() => Err(ResolveError::UnsupportedFormat(spec.into())),
        Some((head, _)) => Ok(head),
        None => Ok(expression),
    }
}

/// `N[,alignment]`
fn parse_positional(head: &str) -> Result<(usize, Option<isize>), ResolveError> {
    let (index, alignment) = match head.split_once(',') {
        Some((index, alignment)) => (index, Some(alignment)),
        None => (head, None),
    };
    let index = index
        .trim()
        .parse::<usize>()
        .map_err(|_| ResolveError::Malformed)?;
    let alignment = alignment
        .map(|a| a.trim().parse::<isize>().map_err(|_| ResolveError::Malformed))
        .transpose()?;
    Ok((index, alignment))
}

/// Pads to the alignment width: positive right-aligns, negative left-aligns.
fn align(value: String, alignment: Option<isize>) -> String {
    let Some(alignment) = alignment else {
        return value;
    };
    let width = alignment.unsigned_abs();
    let len = value.chars().count();
    if len >= width {
        return value;
    }
    let padding = " ".repeat(width - len);
    if alignment > 0 {
        padding + &value
    } else {
        value + &padding
    }
}

/// `name(.name)*([key])?`
fn is_value_path(path: &str) -> bool {
    let names = match path.split_once('[') {
        Some((names, key)) => {
            let Some(key) = key.strip_suffix(']') else {
                return false;
            };
            if key.is_empty() || key.contains(['[', ']']) {
                return false;
            }
            names
        }
        None => path,
    };
    names.split('.').all(|name| {
        !name.is_empty() && name.chars().all(|ch| ch.is_alphanumeric() || ch == '_')
    })
}

/// Positional arguments: `{0}`, `{1,8}`, `{2,-8}`.
impl<T: Display> ValueResolver for [T] {
    fn resolve(&self, expression: &str) -> Result<String, ResolveError> {
        let (index, alignment) = parse_positional(strip_spec(expression)?)?;
        let value = self.get(index).ok_or(ResolveError::IndexOutOfRange {
            index,
            count: self.len(),
        })?;
        Ok(align(value.to_string(), alignment))
    }
}

impl<T: Display, const N: usize> ValueResolver for [T; N] {
    fn resolve(&self, expression: &str) -> Result<String, ResolveError> {
        self.as_slice().resolve(expression)
    }
}

impl<T: Display> ValueResolver for Vec<T> {
    fn resolve(&self, expression: &str) -> Result<String, ResolveError> {
        self.as_slice().resolve(expression)
    }
}

/// Named arguments, looked up by the whole value path: `{user.name}`,
/// `{items[0]}`.
impl<K, V> ValueResolver for BTreeMap<K, V>
where
    K: Borrow<str> + Ord,
    V: Display,
{
    fn resolve(&self, expression: &str) -> Result<String, ResolveError> {
        let path = strip_spec(expression)?.trim();
        if !is_value_path(path) {
            return Err(ResolveError::Malformed);
        }
        self.get(path)
            .map(|value| format!("{value}"))
            .ok_or_else(|| ResolveError::UnknownName(path.into()))
    }
}

/// A closure used as a [`ValueResolver`].
///
/// ```rust
/// use chunkstring::{ChunkString, ResolveError, ResolverFn};
///
/// let upper = ResolverFn(|expr: &str| Ok::<_, ResolveError>(expr.to_uppercase()));
/// let mut text = ChunkString::from("say ");
/// text.append_format("{hello}", &upper).unwrap();
/// assert_eq!(text, "say HELLO");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ResolverFn<F>(pub F);

impl<F> ValueResolver for ResolverFn<F>
where
    F: Fn(&str) -> Result<String, ResolveError>,
{
    fn resolve(&self, expression: &str) -> Result<String, ResolveError> {
        (self.0)(expression)
    }
}
