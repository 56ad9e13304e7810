//! The [`Decoder`] trait, its adapters, and the `compose`/`decode` entry
//! points.
//!
//! A decoder is a pure function from `(value, path)` to either a typed
//! value or a [`DecodeError`]. Everything else in this crate is built from
//! three ideas:
//!
//! - **Primitives** check one JSON type (`string()`, `number()`, ...).
//! - **Structural combinators** descend into the input (`field`, `index`,
//!   `array`, ...) and extend the path as they go.
//! - **Sequencing** with [`compose`] runs several decoders against the same
//!   value and threads the first failure out with `?`.

use std::sync::Arc;

use serde_json::Value;

use crate::{DecodeError, Path};

/// A boxed decoder, used wherever decoders of different concrete types
/// have to sit side by side (for example the alternatives of `one_of`).
pub type BoxDecoder<'a, T> = Box<dyn Decoder<Output = T> + Send + Sync + 'a>;

/// A reference-counted decoder that can be shared by several combinators.
pub type SharedDecoder<T> = Arc<dyn Decoder<Output = T> + Send + Sync>;

/// Validates an untyped JSON value into a typed [`Output`](Self::Output).
///
/// ## Why a trait and not just closures?
///
/// Combinators need to *store* the decoders they wrap (a `field` holds its
/// inner decoder, a `one_of` holds a list of them). A trait with an
/// associated output type lets every combinator be a plain generic struct,
/// fully inlined by the compiler, while [`BoxDecoder`] and
/// [`SharedDecoder`] cover the cases where dynamic dispatch is needed.
///
/// Implementations must be pure: the same input always produces the same
/// result, and no decoder keeps state between calls.
pub trait Decoder {
    /// The typed value produced on success.
    type Output;

    /// Decodes `value`, which lives at `path` inside the root input.
    ///
    /// # Errors
    /// Returns a [`DecodeError`] naming the first malformed location.
    fn decode_at(&self, value: &Value, path: &Path<'_>) -> Result<Self::Output, DecodeError>;

    /// Transforms the decoded value with `f`.
    fn map<U, F>(self, f: F) -> Map<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Output) -> U,
    {
        Map { inner: self, f }
    }

    /// Runs a fallible check or conversion on the decoded value. The
    /// closure receives the path so it can build a precise error.
    fn and_then<U, F>(self, f: F) -> AndThen<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Output, &Path<'_>) -> Result<U, DecodeError>,
    {
        AndThen { inner: self, f }
    }

    /// Erases the concrete type behind a [`BoxDecoder`].
    fn boxed<'a>(self) -> BoxDecoder<'a, Self::Output>
    where
        Self: Sized + Send + Sync + 'a,
    {
        Box::new(self)
    }

    /// Erases the concrete type behind a [`SharedDecoder`].
    fn shared(self) -> SharedDecoder<Self::Output>
    where
        Self: Sized + Send + Sync + 'static,
    {
        Arc::new(self)
    }
}

// Forwarding impls let callers pass `&decoder`, `Box<D>` or `Arc<D>`
// anywhere a decoder is expected without cloning it.

impl<D: Decoder + ?Sized> Decoder for &D {
    type Output = D::Output;

    fn decode_at(&self, value: &Value, path: &Path<'_>) -> Result<Self::Output, DecodeError> {
        (**self).decode_at(value, path)
    }
}

impl<D: Decoder + ?Sized> Decoder for Box<D> {
    type Output = D::Output;

    fn decode_at(&self, value: &Value, path: &Path<'_>) -> Result<Self::Output, DecodeError> {
        (**self).decode_at(value, path)
    }
}

impl<D: Decoder + ?Sized> Decoder for Arc<D> {
    type Output = D::Output;

    fn decode_at(&self, value: &Value, path: &Path<'_>) -> Result<Self::Output, DecodeError> {
        (**self).decode_at(value, path)
    }
}

// ---------------------------------------------------------------------------
// Adapters
// ---------------------------------------------------------------------------

/// A decoder built from a closure. See [`from_fn`].
#[derive(Clone, Copy)]
pub struct FromFn<F>(F);

/// Turns a closure into a [`Decoder`].
///
/// This is how custom primitives are written:
///
/// ```rust
/// use herald_decode::{decode, from_fn, DecodeError};
/// use serde_json::{json, Value};
///
/// let even = from_fn(|value: &Value, path| match value.as_u64() {
///     Some(n) if n % 2 == 0 => Ok(n),
///     _ => Err(DecodeError::new(path, format!("Expected {path} to be even."))),
/// });
///
/// assert_eq!(decode(&even, &json!(4)), Ok(4));
/// assert!(decode(&even, &json!(3)).is_err());
/// ```
pub fn from_fn<T, F>(f: F) -> FromFn<F>
where
    F: Fn(&Value, &Path<'_>) -> Result<T, DecodeError>,
{
    FromFn(f)
}

impl<T, F> Decoder for FromFn<F>
where
    F: Fn(&Value, &Path<'_>) -> Result<T, DecodeError>,
{
    type Output = T;

    fn decode_at(&self, value: &Value, path: &Path<'_>) -> Result<T, DecodeError> {
        (self.0)(value, path)
    }
}

/// See [`Decoder::map`].
#[derive(Clone, Copy)]
pub struct Map<D, F> {
    inner: D,
    f: F,
}

impl<D, F, U> Decoder for Map<D, F>
where
    D: Decoder,
    F: Fn(D::Output) -> U,
{
    type Output = U;

    fn decode_at(&self, value: &Value, path: &Path<'_>) -> Result<U, DecodeError> {
        self.inner.decode_at(value, path).map(&self.f)
    }
}

/// See [`Decoder::and_then`].
#[derive(Clone, Copy)]
pub struct AndThen<D, F> {
    inner: D,
    f: F,
}

impl<D, F, U> Decoder for AndThen<D, F>
where
    D: Decoder,
    F: Fn(D::Output, &Path<'_>) -> Result<U, DecodeError>,
{
    type Output = U;

    fn decode_at(&self, value: &Value, path: &Path<'_>) -> Result<U, DecodeError> {
        let decoded = self.inner.decode_at(value, path)?;
        (self.f)(decoded, path)
    }
}

// ---------------------------------------------------------------------------
// Sequencing
// ---------------------------------------------------------------------------

/// The handle a [`compose`] body uses to run decoders.
///
/// Every decoder passed to [`run`](Self::run) sees the same value and path
/// as the composed decoder itself.
pub struct Scope<'s> {
    value: &'s Value,
    path: &'s Path<'s>,
}

impl<'s> Scope<'s> {
    /// Runs `decoder` against the scope's value.
    ///
    /// # Errors
    /// Returns the decoder's failure unchanged, ready for `?`.
    pub fn run<D: Decoder>(&self, decoder: D) -> Result<D::Output, DecodeError> {
        decoder.decode_at(self.value, self.path)
    }

    /// The raw value being decoded.
    pub fn value(&self) -> &'s Value {
        self.value
    }

    /// Where the value lives in the root input.
    pub fn path(&self) -> &'s Path<'s> {
        self.path
    }
}

/// A decoder built by [`compose`].
#[derive(Clone, Copy)]
pub struct Compose<F>(F);

/// Builds a decoder out of several decoders that all look at the same
/// value, typically to assemble a struct field by field.
///
/// The body returns a `Result`, so the first failing field short-circuits
/// with `?` and becomes the failure of the whole decoder.
///
/// ```rust
/// use herald_decode::{compose, decode, field, number, string};
/// use serde_json::json;
///
/// #[derive(Debug, PartialEq)]
/// struct Point { label: String, x: f64 }
///
/// let point = compose(|s| {
///     Ok(Point {
///         label: s.run(field("label", string()))?,
///         x: s.run(field("x", number()))?,
///     })
/// });
///
/// let decoded = decode(&point, &json!({ "label": "a", "x": 1.5 }));
/// assert_eq!(decoded, Ok(Point { label: "a".into(), x: 1.5 }));
///
/// let err = decode(&point, &json!({ "label": "a", "x": "1.5" })).unwrap_err();
/// assert_eq!(err.path(), "$.x");
/// ```
pub fn compose<T, F>(body: F) -> Compose<F>
where
    F: Fn(&Scope<'_>) -> Result<T, DecodeError>,
{
    Compose(body)
}

impl<T, F> Decoder for Compose<F>
where
    F: Fn(&Scope<'_>) -> Result<T, DecodeError>,
{
    type Output = T;

    fn decode_at(&self, value: &Value, path: &Path<'_>) -> Result<T, DecodeError> {
        let scope = Scope { value, path };
        (self.0)(&scope)
    }
}

/// Decodes `value` from the root path `$`.
///
/// # Errors
/// Returns the first failure encountered.
pub fn decode<D: Decoder>(decoder: D, value: &Value) -> Result<D::Output, DecodeError> {
    decoder.decode_at(value, &Path::root())
}
