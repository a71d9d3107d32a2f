//! Identifier and validated-name types for function configurations.

use super::FunctionDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Maximum length for a function name, matching `VARCHAR(100)`.
const MAX_FUNCTION_NAME_LENGTH: usize = 100;

/// Unique identifier for a function configuration record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FunctionId(Uuid);

impl FunctionId {
    /// Creates a new random function identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a function identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for FunctionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FunctionId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Validated function name.
///
/// Names are the lookup key of the execution route, so they are trimmed and
/// must not contain whitespace or `/`. Case is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FunctionName(String);

impl FunctionName {
    /// Creates a validated function name.
    ///
    /// # Errors
    ///
    /// Returns [`FunctionDomainError`] when validation fails.
    pub fn new(value: impl Into<String>) -> Result<Self, FunctionDomainError> {
        let normalized = value.into().trim().to_owned();

        if normalized.is_empty() {
            return Err(FunctionDomainError::EmptyFunctionName);
        }

        let is_valid = normalized
            .chars()
            .all(|character| !character.is_whitespace() && character != '/');
        if !is_valid {
            return Err(FunctionDomainError::InvalidFunctionName(normalized));
        }

        if normalized.chars().count() > MAX_FUNCTION_NAME_LENGTH {
            return Err(FunctionDomainError::FunctionNameTooLong(normalized));
        }

        Ok(Self(normalized))
    }

    /// Returns the function name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for FunctionName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for FunctionName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
