//! Function configuration aggregate root.

use super::{FunctionDomainError, FunctionId, FunctionName};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Administrator-supplied fields of a function configuration.
///
/// Creation and update both take a full definition; updates replace every
/// field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDefinition {
    /// Unique function name.
    pub name: FunctionName,
    /// Free-text description.
    pub description: String,
    /// JSON-encoded input schema.
    pub input_schema: String,
    /// Implementation tag, decoded at dispatch time.
    pub implementation_type: String,
    /// JSON-encoded implementation configuration.
    pub implementation_config: String,
    /// Whether the function can be executed.
    pub is_active: bool,
}

impl FunctionDefinition {
    /// Checks that both JSON-encoded fields contain well-formed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`FunctionDomainError::InvalidJson`] naming the first field
    /// that fails to parse.
    pub fn validate(&self) -> Result<(), FunctionDomainError> {
        ensure_json("input_schema", &self.input_schema)?;
        ensure_json("implementation_config", &self.implementation_config)
    }
}

fn ensure_json(field: &'static str, text: &str) -> Result<(), FunctionDomainError> {
    serde_json::from_str::<Value>(text)
        .map(drop)
        .map_err(|err| FunctionDomainError::InvalidJson {
            field,
            reason: err.to_string(),
        })
}

/// Stored function configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionRecord {
    id: FunctionId,
    name: FunctionName,
    description: String,
    input_schema: String,
    implementation_type: String,
    implementation_config: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing persisted function state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedFunctionData {
    /// Persisted identifier.
    pub id: FunctionId,
    /// Persisted definition fields.
    pub definition: FunctionDefinition,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl FunctionRecord {
    /// Creates a new function record from a definition.
    #[must_use]
    pub fn new(definition: FunctionDefinition, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self::from_persisted(PersistedFunctionData {
            id: FunctionId::new(),
            definition,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a record from persistence.
    ///
    /// No validation is applied; stored configuration is only decoded when
    /// the function is dispatched.
    #[must_use]
    pub fn from_persisted(data: PersistedFunctionData) -> Self {
        let PersistedFunctionData {
            id,
            definition,
            created_at,
            updated_at,
        } = data;
        Self {
            id,
            name: definition.name,
            description: definition.description,
            input_schema: definition.input_schema,
            implementation_type: definition.implementation_type,
            implementation_config: definition.implementation_config,
            is_active: definition.is_active,
            created_at,
            updated_at,
        }
    }

    /// Replaces every administrator-supplied field.
    pub fn replace(&mut self, definition: FunctionDefinition, clock: &impl Clock) {
        self.name = definition.name;
        self.description = definition.description;
        self.input_schema = definition.input_schema;
        self.implementation_type = definition.implementation_type;
        self.implementation_config = definition.implementation_config;
        self.is_active = definition.is_active;
        self.updated_at = clock.utc();
    }

    /// Returns the record identifier.
    #[must_use]
    pub const fn id(&self) -> FunctionId {
        self.id
    }

    /// Returns the function name.
    #[must_use]
    pub const fn name(&self) -> &FunctionName {
        &self.name
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the JSON-encoded input schema.
    #[must_use]
    pub fn input_schema(&self) -> &str {
        &self.input_schema
    }

    /// Returns the input schema as JSON, or `null` when the stored text is
    /// not well-formed.
    #[must_use]
    pub fn input_schema_value(&self) -> Value {
        serde_json::from_str(&self.input_schema).unwrap_or(Value::Null)
    }

    /// Returns the raw implementation tag.
    #[must_use]
    pub fn implementation_type(&self) -> &str {
        &self.implementation_type
    }

    /// Returns the JSON-encoded implementation configuration.
    #[must_use]
    pub fn implementation_config(&self) -> &str {
        &self.implementation_config
    }

    /// Returns whether the function is executable.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
