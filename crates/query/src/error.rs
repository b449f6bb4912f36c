use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// The operator does not exist, or cannot take this kind of value
    /// (e.g. `>` with a non-integer).
    #[error("unsupported operator '{operator}' for value {value}")]
    UnsupportedOperator { operator: String, value: String },

    /// The value cannot be rendered for the field's type.
    #[error("invalid value {value} for field '{field}': {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    /// Neither free text nor any clause was given.
    #[error("no search terms were specified")]
    NoClauses,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid field type '{0}'")]
pub struct UnknownFieldType(pub String);
