//! Leaf decoders: one JSON type check each.

use std::fmt;

use serde_json::Value;

use crate::{from_fn, DecodeError, Decoder, Path};

/// Returns a clone of whatever value it is given. Never fails.
pub fn any() -> impl Decoder<Output = Value> + Copy {
    from_fn(|value: &Value, _: &Path<'_>| Ok(value.clone()))
}

/// Accepts a JSON string.
pub fn string() -> impl Decoder<Output = String> + Copy {
    from_fn(|value: &Value, path: &Path<'_>| match value {
        Value::String(s) => Ok(s.clone()),
        _ => Err(expected(path, "a string")),
    })
}

/// Accepts any JSON number, as an `f64`.
pub fn number() -> impl Decoder<Output = f64> + Copy {
    from_fn(|value: &Value, path: &Path<'_>| match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| expected(path, "a number")),
        _ => Err(expected(path, "a number")),
    })
}

/// Accepts a JSON number with no fractional part that fits in an `i64`.
///
/// Integral floats such as `-32000.0` are accepted; `1.5` is not.
pub fn integer() -> impl Decoder<Output = i64> + Copy {
    from_fn(|value: &Value, path: &Path<'_>| {
        let Value::Number(n) = value else {
            return Err(expected(path, "an integer"));
        };
        n.as_i64()
            .or_else(|| integral(n.as_f64(), -I64_BOUND, I64_BOUND).map(|f| f as i64))
            .ok_or_else(|| expected(path, "an integer"))
    })
}

/// Accepts a JSON number with no fractional part that fits in a `u64`.
///
/// Integral floats such as `10.0` are accepted.
pub fn unsigned() -> impl Decoder<Output = u64> + Copy {
    from_fn(|value: &Value, path: &Path<'_>| {
        let Value::Number(n) = value else {
            return Err(expected(path, "a non-negative integer"));
        };
        n.as_u64()
            .or_else(|| integral(n.as_f64(), 0.0, U64_BOUND).map(|f| f as u64))
            .ok_or_else(|| expected(path, "a non-negative integer"))
    })
}

// 2^63 and 2^64, the first values out of range.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;
const U64_BOUND: f64 = 18_446_744_073_709_551_616.0;

/// `f` if it has no fractional part and lies in `[min, max)`.
fn integral(f: Option<f64>, min: f64, max: f64) -> Option<f64> {
    f.filter(|x| x.fract() == 0.0 && *x >= min && *x < max)
}

/// Accepts `true` or `false`.
pub fn boolean() -> impl Decoder<Output = bool> + Copy {
    from_fn(|value: &Value, path: &Path<'_>| match value {
        Value::Bool(b) => Ok(*b),
        _ => Err(expected(path, "a boolean")),
    })
}

/// A decoder that only accepts one exact value. See [`literal`].
#[derive(Debug, Clone)]
pub struct Literal<T> {
    expected: T,
    json: Value,
}

/// Accepts only a value strictly equal to `expected` and returns it.
///
/// `Value::Null` is a valid literal. Numbers compare by their JSON
/// representation, so `literal(1)` does not accept `1.0`.
///
/// ```rust
/// use herald_decode::{decode, field, literal};
/// use serde_json::json;
///
/// let version = field("jsonrpc", literal("2.0"));
/// assert!(decode(&version, &json!({ "jsonrpc": "2.0" })).is_ok());
///
/// let err = decode(&version, &json!({ "jsonrpc": "1.0" })).unwrap_err();
/// assert_eq!(err.reason(), r#"Expected $.jsonrpc to be "2.0"."#);
/// ```
pub fn literal<T>(expected: T) -> Literal<T>
where
    T: Clone + Into<Value>,
{
    let json = expected.clone().into();
    Literal { expected, json }
}

impl<T: Clone> Decoder for Literal<T> {
    type Output = T;

    fn decode_at(&self, value: &Value, path: &Path<'_>) -> Result<T, DecodeError> {
        if *value == self.json {
            Ok(self.expected.clone())
        } else {
            Err(DecodeError::new(
                path,
                format!("Expected {path} to be {}.", self.json),
            ))
        }
    }
}

/// Accepts only `null`.
pub fn null() -> impl Decoder<Output = ()> + Clone {
    literal(Value::Null).map(|_| ())
}

/// Always fails with `reason`.
///
/// Inside [`optional_field`](crate::optional_field) this asserts that a
/// property is absent: the inner decoder only runs when the key exists.
pub fn fail<T>(reason: impl fmt::Display) -> impl Decoder<Output = T> + Clone {
    let reason = reason.to_string();
    from_fn(move |_: &Value, path: &Path<'_>| {
        Err(DecodeError::new(
            path,
            format!("Expectation failed at {path}: {reason}"),
        ))
    })
}

/// Always succeeds with a clone of `value`.
pub fn succeed<T: Clone>(value: T) -> impl Decoder<Output = T> + Clone {
    from_fn(move |_: &Value, _: &Path<'_>| Ok(value.clone()))
}

fn expected(path: &Path<'_>, kind: &str) -> DecodeError {
    DecodeError::new(path, format!("Expected {path} to be {kind}."))
}
