//! Diesel row models for function configuration persistence.

use super::schema::function_configs;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for function configuration records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = function_configs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct FunctionConfigRow {
    /// Internal function identifier.
    pub id: uuid::Uuid,
    /// Unique function name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// JSON-encoded input schema.
    pub input_schema: String,
    /// Implementation tag.
    pub implementation_type: String,
    /// JSON-encoded implementation configuration.
    pub implementation_config: String,
    /// Whether the function can be executed.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert and full-replacement model for function configuration records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = function_configs)]
pub struct FunctionConfigChanges {
    /// Internal function identifier.
    pub id: uuid::Uuid,
    /// Unique function name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// JSON-encoded input schema.
    pub input_schema: String,
    /// Implementation tag.
    pub implementation_type: String,
    /// JSON-encoded implementation configuration.
    pub implementation_config: String,
    /// Whether the function can be executed.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
