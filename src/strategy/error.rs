//! Errors raised by execution strategies.

use crate::dispatch::TemplateError;
use crate::function::domain::Provider;
use thiserror::Error;

/// Result type for strategy operations.
pub type StrategyResult<T> = Result<T, StrategyError>;

/// Failures raised while a strategy executes a function.
#[derive(Debug, Clone, Error)]
pub enum StrategyError {
    /// Template expansion failed.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// No credential was supplied for a provider that requires one.
    #[error("{provider} API key not provided in request and not found in environment")]
    CredentialMissing {
        /// Provider that was called.
        provider: Provider,
    },

    /// The provider call failed in transport, status, or decoding.
    #[error("{provider} API error: {message}")]
    Provider {
        /// Provider that was called.
        provider: Provider,
        /// Failure description.
        message: String,
    },

    /// Connecting to the database or executing the statement failed.
    #[error("database query error: {0}")]
    Query(String),

    /// The dynamic code configuration names neither a file nor inline code.
    #[error("dynamic code config error: {0}")]
    CodeConfig(String),

    /// Loading, compiling, or calling dynamic code failed.
    #[error("dynamic code execution error: {0}")]
    CodeExecution(String),
}

impl StrategyError {
    /// Wraps a provider failure.
    pub fn provider(provider: Provider, err: impl ToString) -> Self {
        Self::Provider {
            provider,
            message: err.to_string(),
        }
    }

    /// Wraps a database failure.
    pub fn query(err: impl ToString) -> Self {
        Self::Query(err.to_string())
    }

    /// Wraps a dynamic code failure.
    pub fn code_execution(err: impl ToString) -> Self {
        Self::CodeExecution(err.to_string())
    }
}
