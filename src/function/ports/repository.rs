//! Repository port for function configuration persistence and lookup.

use crate::function::domain::{FunctionId, FunctionName, FunctionRecord};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for function repository operations.
pub type FunctionRepositoryResult<T> = Result<T, FunctionRepositoryError>;

/// Function configuration persistence contract.
#[async_trait]
pub trait FunctionRepository: Send + Sync {
    /// Stores a new function record.
    ///
    /// # Errors
    ///
    /// Returns [`FunctionRepositoryError::DuplicateName`] when another record
    /// already uses the name.
    async fn insert(&self, record: &FunctionRecord) -> FunctionRepositoryResult<()>;

    /// Replaces the stored state of an existing record.
    ///
    /// # Errors
    ///
    /// Returns [`FunctionRepositoryError::NotFound`] when the record does not
    /// exist or [`FunctionRepositoryError::DuplicateName`] when the new name
    /// belongs to another record.
    async fn update(&self, record: &FunctionRecord) -> FunctionRepositoryResult<()>;

    /// Removes a record.
    ///
    /// # Errors
    ///
    /// Returns [`FunctionRepositoryError::NotFound`] when the record does not
    /// exist.
    async fn delete(&self, id: FunctionId) -> FunctionRepositoryResult<()>;

    /// Finds a record by identifier, regardless of its active flag.
    async fn find_by_id(&self, id: FunctionId) -> FunctionRepositoryResult<Option<FunctionRecord>>;

    /// Finds a record by unique name, regardless of its active flag.
    async fn find_by_name(
        &self,
        name: &FunctionName,
    ) -> FunctionRepositoryResult<Option<FunctionRecord>>;

    /// Finds an active record by unique name.
    ///
    /// Returns `None` when the record is absent or inactive.
    async fn find_active_by_name(
        &self,
        name: &FunctionName,
    ) -> FunctionRepositoryResult<Option<FunctionRecord>>;

    /// Returns every record ordered by name.
    async fn list_all(&self) -> FunctionRepositoryResult<Vec<FunctionRecord>>;
}

/// Errors returned by function repository implementations.
#[derive(Debug, Clone, Error)]
pub enum FunctionRepositoryError {
    /// A record with the same name already exists.
    #[error("function with name '{0}' already exists")]
    DuplicateName(FunctionName),

    /// The record was not found.
    #[error("function not found: {0}")]
    NotFound(FunctionId),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl FunctionRepositoryError {
    /// Wraps a data-quality or deserialization error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
