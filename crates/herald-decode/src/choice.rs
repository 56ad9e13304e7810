//! Alternatives: try several decoders at the same location.

use serde_json::Value;

use crate::{BoxDecoder, DecodeError, Decoder, Path};

/// See [`one_of`].
pub struct OneOf<'a, T> {
    alternatives: Vec<BoxDecoder<'a, T>>,
}

/// Tries each alternative in order and returns the first success.
///
/// Order is part of the contract: when two alternatives both accept a
/// value, the earlier one wins. If every alternative fails, the error is
/// an aggregate listing each failure reason in the order tried (see
/// [`DecodeError::alternatives`]).
///
/// The [`one_of!`](crate::one_of!) macro saves writing `.boxed()` on every
/// alternative.
pub fn one_of<T>(alternatives: Vec<BoxDecoder<'_, T>>) -> OneOf<'_, T> {
    OneOf { alternatives }
}

impl<T> Decoder for OneOf<'_, T> {
    type Output = T;

    fn decode_at(&self, value: &Value, path: &Path<'_>) -> Result<T, DecodeError> {
        let mut failures = Vec::with_capacity(self.alternatives.len());
        for alternative in &self.alternatives {
            match alternative.decode_at(value, path) {
                Ok(decoded) => return Ok(decoded),
                Err(err) => failures.push(err),
            }
        }
        Err(DecodeError::aggregate(path, failures))
    }
}

/// Builds a [`OneOf`] from a list of decoders with the same output type.
///
/// ```rust
/// use herald_decode::{decode, number, one_of, string, Decoder};
/// use serde_json::json;
///
/// #[derive(Debug, PartialEq)]
/// enum Key { Name(String), Number(f64) }
///
/// let key = one_of![
///     string().map(Key::Name),
///     number().map(Key::Number),
/// ];
/// assert_eq!(decode(&key, &json!(7)), Ok(Key::Number(7.0)));
///
/// let err = decode(&key, &json!(true)).unwrap_err();
/// assert_eq!(
///     err.reason(),
///     "Expected one of these to succeed:\n - Expected $ to be a string.\n - Expected $ to be a number."
/// );
/// ```
#[macro_export]
macro_rules! one_of {
    ($($decoder:expr),+ $(,)?) => {
        $crate::one_of(::std::vec![$($crate::Decoder::boxed($decoder)),+])
    };
}

/// Accepts `null` as `None`, otherwise decodes with `inner`.
///
/// Absent properties are handled by
/// [`optional_field`](crate::optional_field); `option` is about explicit
/// `null` values.
pub fn option<'a, D>(inner: D) -> OneOf<'a, Option<D::Output>>
where
    D: Decoder + Send + Sync + 'a,
    D::Output: 'a,
{
    crate::one_of![
        crate::null().map(|()| None),
        inner.map(Some),
    ]
}
