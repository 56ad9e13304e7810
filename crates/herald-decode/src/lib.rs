//! Decoder combinators for untyped JSON.
//!
//! This crate turns a `serde_json::Value` of unknown shape into typed Rust
//! values, and when the shape is wrong it says exactly *where*:
//!
//! ```text
//! Expected $.params.battleResult.end to be a number.
//! ```
//!
//! - **[`Decoder`]**: the trait every decoder implements.
//! - **Primitives**: [`any`], [`string`], [`number`], [`integer`],
//!   [`unsigned`], [`boolean`], [`literal`], [`null`], [`fail`],
//!   [`succeed`].
//! - **Structure**: [`field`], [`optional_field`], [`index`],
//!   [`optional_index`], [`array`], [`dictionary`], [`keys`], [`length`].
//! - **Alternatives**: [`one_of`] (and the [`one_of!`] macro), [`option`].
//! - **Sequencing**: [`compose`], which builds structs out of several
//!   field decodes with `?` short-circuiting.
//!
//! # Why not just `serde::Deserialize`?
//!
//! Serde is great when the schema is fixed at compile time. JSON-RPC
//! envelopes are distinguished by which properties are *present* (`result`
//! vs `error`, `id` vs no `id`), alternatives must be tried in a fixed
//! order, and failures must carry a path. Writing those rules as small
//! decoders keeps each one visible and testable.
//!
//! # Example
//!
//! ```rust
//! use herald_decode::{array, compose, decode, field, number};
//! use serde_json::json;
//!
//! let range = compose(|s| {
//!     Ok((
//!         s.run(field("start", number()))?,
//!         s.run(field("end", number()))?,
//!     ))
//! });
//! let ranges = array(&range);
//!
//! let err = decode(&ranges, &json!([{ "start": 0, "end": 1 }, { "start": 2 }])).unwrap_err();
//! assert_eq!(err.path(), "$[1].end");
//! ```

mod choice;
mod decoder;
mod error;
mod path;
mod primitives;
mod structure;

pub use choice::{one_of, option, OneOf};
pub use decoder::{
    compose, decode, from_fn, AndThen, BoxDecoder, Compose, Decoder, FromFn, Map, Scope,
    SharedDecoder,
};
pub use error::DecodeError;
pub use path::Path;
pub use primitives::{
    any, boolean, fail, integer, literal, null, number, string, succeed, unsigned, Literal,
};
pub use structure::{
    array, dictionary, field, index, keys, length, optional_field, optional_index, ArrayOf,
    Dictionary, DictionaryOf, Field, Index, OptionalField, OptionalIndex,
};
