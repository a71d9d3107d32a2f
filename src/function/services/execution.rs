//! Service layer for executing functions by name.

use crate::dispatch::{DispatchError, Dispatcher};
use crate::function::{
    domain::{FunctionName, first_missing_required_field},
    ports::{FunctionRepository, FunctionRepositoryError},
};
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Service-level errors for function execution.
#[derive(Debug, Error)]
pub enum FunctionExecutionServiceError {
    /// No active function has the requested name.
    #[error("function '{0}' not found or inactive")]
    NotFound(String),
    /// The inputs lack a field the input schema requires.
    #[error("missing required field: {0}")]
    MissingRequiredField(String),
    /// Dispatch failed.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    /// Repository lookup failed.
    #[error(transparent)]
    Repository(#[from] FunctionRepositoryError),
}

/// Result type for function execution service operations.
pub type FunctionExecutionServiceResult<T> = Result<T, FunctionExecutionServiceError>;

/// Looks up active functions, checks their inputs, and dispatches them.
pub struct FunctionExecutionService<R>
where
    R: FunctionRepository + ?Sized,
{
    repository: Arc<R>,
    dispatcher: Dispatcher,
}

impl<R> Clone for FunctionExecutionService<R>
where
    R: FunctionRepository + ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            dispatcher: self.dispatcher.clone(),
        }
    }
}

impl<R> FunctionExecutionService<R>
where
    R: FunctionRepository + ?Sized,
{
    /// Creates a new execution service.
    #[must_use]
    pub const fn new(repository: Arc<R>, dispatcher: Dispatcher) -> Self {
        Self {
            repository,
            dispatcher,
        }
    }

    /// Executes the active function called `name` with `inputs`.
    ///
    /// The configuration is read once; concurrent administrative changes do
    /// not affect a call already past lookup.
    ///
    /// # Errors
    ///
    /// Returns [`FunctionExecutionServiceError::NotFound`] when no active
    /// function has the name,
    /// [`FunctionExecutionServiceError::MissingRequiredField`] when the inputs
    /// are incomplete, and [`FunctionExecutionServiceError::Dispatch`] when
    /// dispatch fails.
    pub async fn execute(
        &self,
        name: &str,
        inputs: &Map<String, Value>,
    ) -> FunctionExecutionServiceResult<Value> {
        info!(function = name, inputs = inputs.len(), "function call received");

        let not_found = || FunctionExecutionServiceError::NotFound(name.to_owned());
        let Ok(function_name) = FunctionName::new(name) else {
            warn!(function = name, "function not found or inactive");
            return Err(not_found());
        };
        let Some(record) = self
            .repository
            .find_active_by_name(&function_name)
            .await?
        else {
            warn!(function = name, "function not found or inactive");
            return Err(not_found());
        };

        let schema = record.input_schema_value();
        if let Some(field) = first_missing_required_field(&schema, inputs) {
            warn!(function = name, field, "missing required field");
            return Err(FunctionExecutionServiceError::MissingRequiredField(
                field.to_owned(),
            ));
        }

        let result = self.dispatcher.execute(&record, inputs).await?;
        info!(function = name, "function executed successfully");
        Ok(result)
    }
}
