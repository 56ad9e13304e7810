//! Structural combinators: descend into objects and arrays.
//!
//! Each combinator first checks the container type, then extends the path
//! (`.key` or `[i]`) before handing the child value to its inner decoder.
//! That is what makes errors point at the exact malformed location.

use std::borrow::Cow;

use serde_json::{Map, Value};

use crate::{DecodeError, Decoder, Path};

/// An ordered key→value mapping produced by [`dictionary`].
///
/// Entries keep the insertion order of the source object.
pub type Dictionary<T> = Vec<(String, T)>;

fn as_object<'v>(value: &'v Value, path: &Path<'_>) -> Result<&'v Map<String, Value>, DecodeError> {
    match value {
        Value::Object(object) => Ok(object),
        _ => Err(DecodeError::new(
            path,
            format!("Expected {path} to be an object."),
        )),
    }
}

fn as_array<'v>(value: &'v Value, path: &Path<'_>) -> Result<&'v [Value], DecodeError> {
    match value {
        Value::Array(array) => Ok(array.as_slice()),
        _ => Err(DecodeError::new(
            path,
            format!("Expected {path} to be an array."),
        )),
    }
}

// ---------------------------------------------------------------------------
// Object fields
// ---------------------------------------------------------------------------

/// See [`field`].
#[derive(Debug, Clone)]
pub struct Field<'k, D> {
    key: Cow<'k, str>,
    inner: D,
}

/// Decodes property `key` of an object with `inner`.
///
/// Fails if the value is not an object (arrays and `null` included) or if
/// the property is missing. A missing property is reported at the path of
/// the property itself, e.g. `$.result`.
pub fn field<'k, D: Decoder>(key: impl Into<Cow<'k, str>>, inner: D) -> Field<'k, D> {
    Field {
        key: key.into(),
        inner,
    }
}

impl<D: Decoder> Decoder for Field<'_, D> {
    type Output = D::Output;

    fn decode_at(&self, value: &Value, path: &Path<'_>) -> Result<D::Output, DecodeError> {
        let object = as_object(value, path)?;
        let child = path.field(&self.key);
        match object.get(self.key.as_ref()) {
            Some(inner) => self.inner.decode_at(inner, &child),
            None => Err(DecodeError::new(
                &child,
                format!("Expected {path} to have a property \"{}\".", self.key),
            )),
        }
    }
}

/// See [`optional_field`].
#[derive(Debug, Clone)]
pub struct OptionalField<'k, D> {
    key: Cow<'k, str>,
    inner: D,
}

/// Like [`field`], but a missing property decodes to `None`.
///
/// A property that is present with value `null` is still handed to
/// `inner`; combine with [`option`](crate::option) to also accept `null`.
pub fn optional_field<'k, D: Decoder>(
    key: impl Into<Cow<'k, str>>,
    inner: D,
) -> OptionalField<'k, D> {
    OptionalField {
        key: key.into(),
        inner,
    }
}

impl<D: Decoder> Decoder for OptionalField<'_, D> {
    type Output = Option<D::Output>;

    fn decode_at(&self, value: &Value, path: &Path<'_>) -> Result<Self::Output, DecodeError> {
        let object = as_object(value, path)?;
        match object.get(self.key.as_ref()) {
            Some(inner) => self.inner.decode_at(inner, &path.field(&self.key)).map(Some),
            None => Ok(None),
        }
    }
}

/// Returns the keys of an object, in source order.
pub fn keys() -> impl Decoder<Output = Vec<String>> + Copy {
    crate::from_fn(|value: &Value, path: &Path<'_>| {
        Ok(as_object(value, path)?.keys().cloned().collect())
    })
}

/// See [`dictionary`].
#[derive(Debug, Clone)]
pub struct DictionaryOf<D>(D);

/// Decodes every property value of an object with `inner`.
///
/// The result keeps the object's key order. Decoding stops at the first
/// value that fails.
pub fn dictionary<D: Decoder>(inner: D) -> DictionaryOf<D> {
    DictionaryOf(inner)
}

impl<D: Decoder> Decoder for DictionaryOf<D> {
    type Output = Dictionary<D::Output>;

    fn decode_at(&self, value: &Value, path: &Path<'_>) -> Result<Self::Output, DecodeError> {
        as_object(value, path)?
            .iter()
            .map(|(key, entry)| {
                self.0
                    .decode_at(entry, &path.field(key))
                    .map(|decoded| (key.clone(), decoded))
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Array elements
// ---------------------------------------------------------------------------

/// See [`index`].
#[derive(Debug, Clone)]
pub struct Index<D> {
    index: usize,
    inner: D,
}

/// Decodes element `index` of an array with `inner`.
///
/// Fails if the value is not an array or is too short.
pub fn index<D: Decoder>(index: usize, inner: D) -> Index<D> {
    Index { index, inner }
}

impl<D: Decoder> Decoder for Index<D> {
    type Output = D::Output;

    fn decode_at(&self, value: &Value, path: &Path<'_>) -> Result<D::Output, DecodeError> {
        let array = as_array(value, path)?;
        let child = path.index(self.index);
        match array.get(self.index) {
            Some(element) => self.inner.decode_at(element, &child),
            None => Err(DecodeError::new(
                &child,
                format!("Expected {path} to have an index {}.", self.index),
            )),
        }
    }
}

/// See [`optional_index`].
#[derive(Debug, Clone)]
pub struct OptionalIndex<D> {
    index: usize,
    inner: D,
}

/// Like [`index`], but an array that is too short decodes to `None`.
pub fn optional_index<D: Decoder>(index: usize, inner: D) -> OptionalIndex<D> {
    OptionalIndex { index, inner }
}

impl<D: Decoder> Decoder for OptionalIndex<D> {
    type Output = Option<D::Output>;

    fn decode_at(&self, value: &Value, path: &Path<'_>) -> Result<Self::Output, DecodeError> {
        let array = as_array(value, path)?;
        match array.get(self.index) {
            Some(element) => self
                .inner
                .decode_at(element, &path.index(self.index))
                .map(Some),
            None => Ok(None),
        }
    }
}

/// Returns the length of an array.
pub fn length() -> impl Decoder<Output = usize> + Copy {
    crate::from_fn(|value: &Value, path: &Path<'_>| Ok(as_array(value, path)?.len()))
}

/// See [`array`].
#[derive(Debug, Clone)]
pub struct ArrayOf<D>(D);

/// Decodes every element of an array with `inner`, preserving order.
///
/// Fail-fast: the first element that fails is the error of the whole
/// array, and later elements are not looked at.
pub fn array<D: Decoder>(inner: D) -> ArrayOf<D> {
    ArrayOf(inner)
}

impl<D: Decoder> Decoder for ArrayOf<D> {
    type Output = Vec<D::Output>;

    fn decode_at(&self, value: &Value, path: &Path<'_>) -> Result<Self::Output, DecodeError> {
        as_array(value, path)?
            .iter()
            .enumerate()
            .map(|(i, element)| self.0.decode_at(element, &path.index(i)))
            .collect()
    }
}
