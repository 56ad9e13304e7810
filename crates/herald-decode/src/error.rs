//! The single error type of the decoder engine.
//!
//! Decoding is fail-fast: the first malformed location wins, so a
//! [`DecodeError`] always names exactly one place in the input. The only
//! exception is [`one_of`](crate::one_of), which tries several
//! alternatives at the same location and has to report all of them.

use crate::Path;

/// A decode failure at a specific location in the input.
///
/// The `path` is rendered JSON-pointer style: `$` is the root, `.key`
/// descends into an object field and `[i]` into an array element, e.g.
/// `$.params.battleResults[3]`.
///
/// The `reason` is a complete, human-readable sentence that already
/// mentions the path (`"Expected $.id to be a string."`), so printing the
/// error with `{}` is enough for logs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason}")]
pub struct DecodeError {
    path: String,
    reason: String,
    alternatives: Vec<DecodeError>,
}

impl DecodeError {
    /// Creates a failure at `path` with the given reason.
    pub fn new(path: &Path<'_>, reason: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            reason: reason.into(),
            alternatives: Vec::new(),
        }
    }

    /// Creates the aggregate failure reported when every alternative of a
    /// `one_of` failed. Each attempt is listed on its own line, in the
    /// order the alternatives were tried.
    pub fn aggregate(path: &Path<'_>, attempts: Vec<DecodeError>) -> Self {
        let mut reason = String::from("Expected one of these to succeed:");
        for attempt in &attempts {
            reason.push_str("\n - ");
            reason.push_str(&attempt.reason);
        }
        Self {
            path: path.to_string(),
            reason,
            alternatives: attempts,
        }
    }

    /// The rendered location of the failure (`$`, `$.result`, `$[0].id`, ...).
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The human-readable reason.
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// The failures of each attempted alternative, if this error came from
    /// `one_of`. Empty for every other decoder.
    pub fn alternatives(&self) -> &[DecodeError] {
        &self.alternatives
    }

    /// Returns `true` if this failure aggregates several alternatives.
    pub fn is_aggregate(&self) -> bool {
        !self.alternatives.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_the_reason() {
        let root = Path::root();
        let err = DecodeError::new(&root.field("id"), "Expected $.id to be a string.");
        assert_eq!(err.to_string(), "Expected $.id to be a string.");
        assert_eq!(err.path(), "$.id");
        assert!(!err.is_aggregate());
    }

    #[test]
    fn test_aggregate_lists_every_attempt_in_order() {
        let root = Path::root();
        let first = DecodeError::new(&root, "first");
        let second = DecodeError::new(&root, "second");
        let err = DecodeError::aggregate(&root, vec![first.clone(), second.clone()]);

        assert_eq!(
            err.reason(),
            "Expected one of these to succeed:\n - first\n - second"
        );
        assert_eq!(err.alternatives(), &[first, second]);
        assert!(err.is_aggregate());
    }
}
