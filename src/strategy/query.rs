//! Parameterized database query strategy.
//!
//! The statement is produced by textual interpolation of the inputs into
//! `query_template`, so caller-controlled values become part of the SQL
//! that runs. Connections are opened per call: Postgres URLs use the native
//! `sqlx` Postgres driver and everything else the Any driver.

use super::{QueryRunner, StrategyError, StrategyResult};
use crate::dispatch::{log_preview, template};
use crate::function::domain::QueryConfig;
use async_trait::async_trait;
use futures::TryStreamExt;
use serde_json::{Map, Value, json};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use sqlx::any::{AnyRow, install_default_drivers};
use sqlx::postgres::{PgColumn, PgConnection, PgRow};
use sqlx::{AnyConnection, Column, Connection, Database, Either, Row, TypeInfo, ValueRef};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Leading keywords of statements that produce a result set.
const ROW_RETURNING_KEYWORDS: [&str; 6] = ["SELECT", "WITH", "VALUES", "PRAGMA", "SHOW", "EXPLAIN"];

/// Strategy that expands a statement template and runs it once.
#[derive(Clone)]
pub struct QueryStrategy {
    runner: Arc<dyn QueryRunner>,
}

impl QueryStrategy {
    /// Creates a strategy over the given runner.
    #[must_use]
    pub fn new(runner: Arc<dyn QueryRunner>) -> Self {
        Self { runner }
    }

    /// Expands `query_template` and runs the result.
    ///
    /// # Errors
    ///
    /// Returns [`StrategyError::Template`] when expansion fails and
    /// [`StrategyError::Query`] when the database rejects the statement.
    pub async fn run(
        &self,
        config: &QueryConfig,
        inputs: &Map<String, Value>,
    ) -> StrategyResult<Value> {
        let statement = template::format(&config.query_template, inputs)?;
        debug!(statement = log_preview(&statement), "executing database query");
        self.runner
            .run(config.connection_string(), &statement)
            .await
    }
}

/// [`QueryRunner`] backed by a fresh `sqlx` connection per call.
///
/// `postgres:` and `postgresql:` URLs use the native Postgres driver so that
/// temporal, uuid, numeric and json columns decode. Every other URL goes
/// through the Any driver.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlxQueryRunner;

#[async_trait]
impl QueryRunner for SqlxQueryRunner {
    async fn run(&self, connection_string: &str, statement: &str) -> StrategyResult<Value> {
        if is_postgres_url(connection_string) {
            let mut connection = PgConnection::connect(connection_string)
                .await
                .map_err(StrategyError::query)?;
            let outcome = execute_postgres(&mut connection, statement).await;
            let closed = connection.close().await.map_err(StrategyError::query);
            let value = outcome?;
            closed?;
            return Ok(value);
        }

        install_default_drivers();
        let mut connection = AnyConnection::connect(connection_string)
            .await
            .map_err(StrategyError::query)?;
        let outcome = execute_any(&mut connection, statement).await;
        let closed = connection.close().await.map_err(StrategyError::query);
        let value = outcome?;
        closed?;
        Ok(value)
    }
}

fn is_postgres_url(connection_string: &str) -> bool {
    connection_string
        .split_once(':')
        .is_some_and(|(scheme, _)| matches!(scheme, "postgres" | "postgresql"))
}

async fn execute_any(connection: &mut AnyConnection, statement: &str) -> StrategyResult<Value> {
    let mut rows = Vec::new();
    let mut affected_rows: u64 = 0;

    let mut steps = sqlx::raw_sql(statement).fetch_many(&mut *connection);
    while let Some(step) = steps.try_next().await.map_err(StrategyError::query)? {
        match step {
            Either::Left(done) => {
                affected_rows = affected_rows.saturating_add(done.rows_affected());
            }
            Either::Right(row) => rows.push(row_to_json(&row, any_column_value)?),
        }
    }
    Ok(shape_outcome(statement, rows, affected_rows))
}

async fn execute_postgres(connection: &mut PgConnection, statement: &str) -> StrategyResult<Value> {
    let mut rows = Vec::new();
    let mut affected_rows: u64 = 0;

    let mut steps = sqlx::raw_sql(statement).fetch_many(&mut *connection);
    while let Some(step) = steps.try_next().await.map_err(StrategyError::query)? {
        match step {
            Either::Left(done) => {
                affected_rows = affected_rows.saturating_add(done.rows_affected());
            }
            Either::Right(row) => rows.push(row_to_json(&row, postgres_column_value)?),
        }
    }
    Ok(shape_outcome(statement, rows, affected_rows))
}

fn shape_outcome(statement: &str, rows: Vec<Value>, affected_rows: u64) -> Value {
    if rows.is_empty() && !returns_rows(statement) {
        return json!({ "success": true, "affected_rows": affected_rows });
    }
    json!({ "results": rows })
}

fn returns_rows(statement: &str) -> bool {
    let normalized = statement.trim_start_matches(|c: char| c.is_whitespace() || c == '(');
    let keyword: String = normalized
        .chars()
        .take_while(char::is_ascii_alphabetic)
        .collect::<String>()
        .to_ascii_uppercase();

    ROW_RETURNING_KEYWORDS.contains(&keyword.as_str())
        || statement.to_ascii_uppercase().contains("RETURNING")
}

fn row_to_json<R>(
    row: &R,
    decode: fn(&R, &<R::Database as Database>::Column) -> StrategyResult<Value>,
) -> StrategyResult<Value>
where
    R: Row,
{
    let mut record = Map::new();
    for column in row.columns() {
        record.insert(column.name().to_owned(), decode(row, column)?);
    }
    Ok(Value::Object(record))
}

fn any_column_value(row: &AnyRow, column: &<sqlx::Any as Database>::Column) -> StrategyResult<Value> {
    let ordinal = column.ordinal();
    let raw = row.try_get_raw(ordinal).map_err(StrategyError::query)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }

    if let Ok(value) = row.try_get::<i64, _>(ordinal) {
        return Ok(json!(value));
    }
    if let Ok(value) = row.try_get::<i32, _>(ordinal) {
        return Ok(json!(value));
    }
    if let Ok(value) = row.try_get::<i16, _>(ordinal) {
        return Ok(json!(value));
    }
    if let Ok(value) = row.try_get::<f64, _>(ordinal) {
        return Ok(json!(value));
    }
    if let Ok(value) = row.try_get::<f32, _>(ordinal) {
        return Ok(json!(value));
    }
    if let Ok(value) = row.try_get::<bool, _>(ordinal) {
        return Ok(json!(value));
    }
    if let Ok(value) = row.try_get::<String, _>(ordinal) {
        return Ok(json!(value));
    }
    if let Ok(value) = row.try_get::<Vec<u8>, _>(ordinal) {
        return Ok(json!(value));
    }

    Err(StrategyError::Query(format!(
        "unsupported value type in column {ordinal}"
    )))
}

/// Decodes a Postgres column by its declared type.
///
/// Types without a dedicated mapping (numeric, money, intervals, enums and
/// the like) are rendered as their Postgres text form, which the simple
/// query protocol delivers for every column.
fn postgres_column_value(row: &PgRow, column: &PgColumn) -> StrategyResult<Value> {
    let ordinal = column.ordinal();
    let raw = row.try_get_raw(ordinal).map_err(StrategyError::query)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }

    let value = match column.type_info().name() {
        "BOOL" => json!(row.try_get::<bool, _>(ordinal).map_err(StrategyError::query)?),
        "INT2" => json!(row.try_get::<i16, _>(ordinal).map_err(StrategyError::query)?),
        "INT4" => json!(row.try_get::<i32, _>(ordinal).map_err(StrategyError::query)?),
        "INT8" => json!(row.try_get::<i64, _>(ordinal).map_err(StrategyError::query)?),
        "FLOAT4" => json!(row.try_get::<f32, _>(ordinal).map_err(StrategyError::query)?),
        "FLOAT8" => json!(row.try_get::<f64, _>(ordinal).map_err(StrategyError::query)?),
        "UUID" => json!(row.try_get::<Uuid, _>(ordinal).map_err(StrategyError::query)?),
        "TIMESTAMPTZ" => json!(
            row.try_get::<DateTime<Utc>, _>(ordinal)
                .map_err(StrategyError::query)?
        ),
        "TIMESTAMP" => json!(
            row.try_get::<NaiveDateTime, _>(ordinal)
                .map_err(StrategyError::query)?
        ),
        "DATE" => json!(row.try_get::<NaiveDate, _>(ordinal).map_err(StrategyError::query)?),
        "TIME" => json!(row.try_get::<NaiveTime, _>(ordinal).map_err(StrategyError::query)?),
        "JSON" | "JSONB" => row.try_get::<Value, _>(ordinal).map_err(StrategyError::query)?,
        "BYTEA" => json!(row.try_get::<Vec<u8>, _>(ordinal).map_err(StrategyError::query)?),
        _ => json!(
            row.try_get_unchecked::<String, _>(ordinal)
                .map_err(StrategyError::query)?
        ),
    };
    Ok(value)
}
