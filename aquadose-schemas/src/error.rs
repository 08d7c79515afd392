use thiserror::Error;

/// Raised when a string does not name any variant of a closed enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unrecognized {kind} '{value}' (expected one of: {expected})")]
pub struct ParseVariantError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}

impl ParseVariantError {
    pub fn new(kind: &'static str, value: &str, expected: &'static str) -> Self {
        Self {
            kind,
            value: value.to_string(),
            expected,
        }
    }
}
