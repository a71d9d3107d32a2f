//! Error types for function domain validation and decoding.

use thiserror::Error;

/// Errors returned while constructing function registry domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FunctionDomainError {
    /// The function name is empty after trimming.
    #[error("function name must not be empty")]
    EmptyFunctionName,

    /// The function name contains whitespace or path separators.
    #[error("function name '{0}' must not contain whitespace or '/'")]
    InvalidFunctionName(String),

    /// The function name exceeds the 100-character storage limit.
    #[error("function name exceeds 100 character limit: {0}")]
    FunctionNameTooLong(String),

    /// A JSON-encoded field does not contain well-formed JSON.
    #[error("invalid JSON in {field}: {reason}")]
    InvalidJson {
        /// Field name (`input_schema` or `implementation_config`).
        field: &'static str,
        /// Parser failure message.
        reason: String,
    },
}

/// Error returned while parsing an implementation tag.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown implementation type: {0}")]
pub struct ParseImplementationKindError(pub String);

/// Errors returned while decoding a stored implementation configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ImplementationDecodeError {
    /// The stored configuration text is not well-formed JSON.
    #[error("invalid JSON in function implementation config: {0}")]
    MalformedJson(String),

    /// The implementation tag does not name a known strategy.
    #[error("unknown implementation type: {0}")]
    UnknownKind(String),

    /// The JSON does not match the shape the implementation type requires.
    #[error("implementation config does not match '{kind}' shape: {reason}")]
    InvalidShape {
        /// Implementation tag being decoded.
        kind: String,
        /// Decoder failure message.
        reason: String,
    },
}
