//! Service layer for function administration.
//!
//! Provides [`FunctionRegistryService`], which validates administrator
//! payloads and coordinates create, replace, delete, and lookup operations.

use crate::function::{
    domain::{FunctionDefinition, FunctionDomainError, FunctionId, FunctionName, FunctionRecord},
    ports::{FunctionRepository, FunctionRepositoryError},
};
use mockable::Clock;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Administrator payload for creating or replacing a function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionRequest {
    name: String,
    description: String,
    input_schema: String,
    implementation_type: String,
    implementation_config: String,
    is_active: bool,
}

impl FunctionRequest {
    /// Creates an active request with an empty description and schema.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        implementation_type: impl Into<String>,
        implementation_config: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            input_schema: "{}".to_owned(),
            implementation_type: implementation_type.into(),
            implementation_config: implementation_config.into(),
            is_active: true,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the JSON-encoded input schema.
    #[must_use]
    pub fn with_input_schema(mut self, input_schema: impl Into<String>) -> Self {
        self.input_schema = input_schema.into();
        self
    }

    /// Sets the active flag.
    #[must_use]
    pub const fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    pub(super) fn into_definition(self) -> Result<FunctionDefinition, FunctionDomainError> {
        let Self {
            name,
            description,
            input_schema,
            implementation_type,
            implementation_config,
            is_active,
        } = self;

        let definition = FunctionDefinition {
            name: FunctionName::new(name)?,
            description,
            input_schema,
            implementation_type,
            implementation_config,
            is_active,
        };
        definition.validate()?;
        Ok(definition)
    }
}

/// Serialized function definition, as accepted by the admin API and seed
/// files.
///
/// `input_schema` and `implementation_config` may be JSON text or inline JSON
/// values; text is stored as given.
#[derive(Debug, Clone, Deserialize)]
pub struct FunctionPayload {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    input_schema: Option<Value>,
    implementation_type: String,
    #[serde(default)]
    implementation_config: Option<Value>,
    #[serde(default = "default_active")]
    is_active: bool,
}

const fn default_active() -> bool {
    true
}

impl FunctionPayload {
    /// Returns the requested function name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Converts the payload into a registry request.
    #[must_use]
    pub fn into_request(self) -> FunctionRequest {
        FunctionRequest::new(
            self.name,
            self.implementation_type,
            json_text(self.implementation_config),
        )
        .with_description(self.description)
        .with_input_schema(json_text(self.input_schema))
        .with_active(self.is_active)
    }
}

/// Renders a payload value as stored JSON text; strings are taken as already
/// encoded.
fn json_text(value: Option<Value>) -> String {
    match value {
        Some(Value::String(text)) => text,
        Some(other) => serde_json::to_string_pretty(&other).unwrap_or_else(|_| other.to_string()),
        None => "{}".to_owned(),
    }
}

/// Service-level errors for function administration.
#[derive(Debug, Error)]
pub enum FunctionRegistryServiceError {
    /// Payload validation failed.
    #[error(transparent)]
    Domain(#[from] FunctionDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] FunctionRepositoryError),
}

/// Result type for function registry service operations.
pub type FunctionRegistryServiceResult<T> = Result<T, FunctionRegistryServiceError>;

/// Function administration service.
pub struct FunctionRegistryService<R, C>
where
    R: FunctionRepository + ?Sized,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> Clone for FunctionRegistryService<R, C>
where
    R: FunctionRepository + ?Sized,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R, C> FunctionRegistryService<R, C>
where
    R: FunctionRepository + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a new function registry service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Registers a new function.
    ///
    /// # Errors
    ///
    /// Returns [`FunctionRegistryServiceError::Domain`] when the name or a
    /// JSON field is invalid, or [`FunctionRegistryServiceError::Repository`]
    /// when the name is taken or persistence fails.
    pub async fn create(
        &self,
        request: FunctionRequest,
    ) -> FunctionRegistryServiceResult<FunctionRecord> {
        let record = FunctionRecord::new(request.into_definition()?, &*self.clock);
        self.repository.insert(&record).await?;
        info!(
            function = %record.name(),
            id = %record.id(),
            implementation_type = record.implementation_type(),
            "registered function"
        );
        Ok(record)
    }

    /// Replaces every administrator-supplied field of an existing function.
    ///
    /// # Errors
    ///
    /// Returns [`FunctionRegistryServiceError::Domain`] when the payload is
    /// invalid, or [`FunctionRegistryServiceError::Repository`] when the
    /// function does not exist, the new name is taken, or persistence fails.
    pub async fn update(
        &self,
        id: FunctionId,
        request: FunctionRequest,
    ) -> FunctionRegistryServiceResult<FunctionRecord> {
        let definition = request.into_definition()?;
        let mut record = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(FunctionRepositoryError::NotFound(id))?;

        record.replace(definition, &*self.clock);
        self.repository.update(&record).await?;
        info!(function = %record.name(), id = %id, "replaced function");
        Ok(record)
    }

    /// Deletes a function.
    ///
    /// # Errors
    ///
    /// Returns [`FunctionRegistryServiceError::Repository`] when the function
    /// does not exist or persistence fails.
    pub async fn delete(&self, id: FunctionId) -> FunctionRegistryServiceResult<()> {
        self.repository.delete(id).await?;
        info!(id = %id, "deleted function");
        Ok(())
    }

    /// Finds a function by identifier, whether or not it is active.
    ///
    /// # Errors
    ///
    /// Returns [`FunctionRegistryServiceError::Repository`] when persistence
    /// lookup fails.
    pub async fn get(&self, id: FunctionId) -> FunctionRegistryServiceResult<Option<FunctionRecord>> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// Returns every function ordered by name.
    ///
    /// # Errors
    ///
    /// Returns [`FunctionRegistryServiceError::Repository`] when persistence
    /// lookup fails.
    pub async fn list(&self) -> FunctionRegistryServiceResult<Vec<FunctionRecord>> {
        Ok(self.repository.list_all().await?)
    }
}
