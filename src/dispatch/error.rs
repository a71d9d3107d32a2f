//! Errors surfaced by the dispatcher.

use crate::function::domain::{FunctionName, ImplementationDecodeError};
use crate::strategy::StrategyError;
use std::error::Error as StdError;
use thiserror::Error;

/// Failures returned by [`super::Dispatcher::execute`].
#[derive(Debug, Clone, Error)]
pub enum DispatchError {
    /// The stored configuration is malformed or does not fit its type.
    #[error("{0}")]
    ConfigParse(String),

    /// The implementation tag names no known strategy.
    #[error("unknown implementation type: {0}")]
    UnknownImplementationType(String),

    /// The selected strategy failed.
    #[error("function execution error: {source}")]
    Execution {
        /// Function that was executing.
        function: FunctionName,
        /// Original strategy failure.
        source: StrategyError,
        /// Messages of the failure and each of its causes, outermost first.
        trace: Vec<String>,
    },
}

impl DispatchError {
    /// Wraps a strategy failure, capturing its error chain.
    #[must_use]
    pub fn execution(function: FunctionName, source: StrategyError) -> Self {
        let mut trace = vec![source.to_string()];
        let mut cause = source.source();
        while let Some(err) = cause {
            trace.push(err.to_string());
            cause = err.source();
        }
        Self::Execution {
            function,
            source,
            trace,
        }
    }

    /// Returns the strategy failure behind an execution error.
    #[must_use]
    pub const fn strategy_error(&self) -> Option<&StrategyError> {
        match self {
            Self::Execution { source, .. } => Some(source),
            Self::ConfigParse(_) | Self::UnknownImplementationType(_) => None,
        }
    }
}

impl From<ImplementationDecodeError> for DispatchError {
    fn from(err: ImplementationDecodeError) -> Self {
        match err {
            ImplementationDecodeError::UnknownKind(tag) => Self::UnknownImplementationType(tag),
            ImplementationDecodeError::MalformedJson(_)
            | ImplementationDecodeError::InvalidShape { .. } => Self::ConfigParse(err.to_string()),
        }
    }
}
