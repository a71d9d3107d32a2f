//! Shared helpers for `PostgreSQL` repository tests.

use ai_factory::function::{
    adapters::postgres::{FunctionPgPool, PostgresFunctionRepository},
    domain::{FunctionDefinition, FunctionName, FunctionRecord},
};
use diesel::pg::PgConnection;
use diesel::r2d2::ConnectionManager;
use mockable::DefaultClock;
use uuid::Uuid;

/// Environment variable naming the test database.
pub const DATABASE_URL_ENV: &str = "AI_FACTORY_TEST_DATABASE_URL";

/// Boxed error type for test helpers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Returns the configured test database URL, if any.
pub fn database_url() -> Option<String> {
    std::env::var(DATABASE_URL_ENV).ok()
}

/// Connects to the test database and ensures the schema exists.
///
/// Returns `Ok(None)` when no test database is configured.
///
/// # Errors
///
/// Returns an error if the pool cannot be built or the schema cannot be
/// created.
pub async fn prepared_repo() -> Result<Option<PostgresFunctionRepository>, BoxError> {
    let Some(url) = database_url() else {
        return Ok(None);
    };
    let manager = ConnectionManager::<PgConnection>::new(url);
    let pool = tokio::task::spawn_blocking(move || {
        FunctionPgPool::builder().max_size(2).build(manager)
    })
    .await??;
    let repo = PostgresFunctionRepository::new(pool);
    repo.ensure_schema().await?;
    Ok(Some(repo))
}

/// Returns a function name that no other test run uses.
pub fn unique_name(prefix: &str) -> String {
    format!("{prefix}_{}", Uuid::new_v4().simple())
}

/// Builds a definition for `name`.
///
/// # Panics
///
/// Panics if `name` is not a valid function name.
pub fn definition(name: &str, is_active: bool) -> FunctionDefinition {
    FunctionDefinition {
        name: FunctionName::new(name).expect("valid function name"),
        description: "Postgres test function".to_owned(),
        input_schema: r#"{"properties": {"id": {}}, "required": ["id"]}"#.to_owned(),
        implementation_type: "database_query".to_owned(),
        implementation_config: r#"{"query_template": "SELECT {id}"}"#.to_owned(),
        is_active,
    }
}

/// Builds a fresh record for `name`.
pub fn record(name: &str, is_active: bool) -> FunctionRecord {
    FunctionRecord::new(definition(name, is_active), &DefaultClock)
}
