//! Locations inside a JSON value.

use std::fmt;

/// Where a decoder is currently looking, relative to the root value.
///
/// A `Path` is a linked list living on the stack: each step borrows its
/// parent, so descending into a field or index costs nothing. The string
/// form is only built when a [`DecodeError`](crate::DecodeError) is
/// created.
///
/// ```rust
/// use herald_decode::Path;
///
/// let root = Path::root();
/// let params = root.field("params");
/// let first = params.index(0);
/// assert_eq!(first.to_string(), "$.params[0]");
/// ```
#[derive(Debug, Clone, Copy)]
pub enum Path<'a> {
    /// The value passed to [`decode`](crate::decode), rendered `$`.
    Root,
    /// An object property of the parent, rendered `.key`.
    Field(&'a Path<'a>, &'a str),
    /// An array element of the parent, rendered `[i]`.
    Index(&'a Path<'a>, usize),
}

impl<'a> Path<'a> {
    /// The root path `$`.
    pub const fn root() -> Self {
        Self::Root
    }

    /// The path of property `key` below `self`.
    pub fn field<'b>(&'b self, key: &'b str) -> Path<'b>
    where
        'a: 'b,
    {
        Path::Field(self, key)
    }

    /// The path of element `index` below `self`.
    pub fn index<'b>(&'b self, index: usize) -> Path<'b>
    where
        'a: 'b,
    {
        Path::Index(self, index)
    }
}

impl Default for Path<'_> {
    fn default() -> Self {
        Self::Root
    }
}

impl fmt::Display for Path<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => f.write_str("$"),
            Self::Field(parent, key) => write!(f, "{parent}.{key}"),
            Self::Index(parent, index) => write!(f, "{parent}[{index}]"),
        }
    }
}
