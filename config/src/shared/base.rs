use thiserror::Error;

/// Errors raised when a loaded configuration violates a constraint.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required string field is empty.
    #[error("`{0}` cannot be empty")]
    EmptyField(String),
    /// A field holds a value outside its allowed range.
    #[error("invalid value for `{field}`: {constraint}")]
    InvalidFieldValue { field: String, constraint: String },
    /// Two entities or two streams share a topic name.
    #[error("topic `{topic}` is configured more than once (`{first}` and `{second}`)")]
    DuplicateTopic {
        topic: String,
        first: String,
        second: String,
    },
}

/// Returns [`ValidationError::EmptyField`] when `value` is blank.
pub(crate) fn require_non_empty(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(field.to_string()));
    }

    Ok(())
}
