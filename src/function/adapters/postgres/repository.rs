//! `PostgreSQL` repository implementation for function configurations.

use super::{
    models::{FunctionConfigChanges, FunctionConfigRow},
    schema::function_configs,
};
use crate::function::{
    domain::{FunctionDefinition, FunctionId, FunctionName, FunctionRecord, PersistedFunctionData},
    ports::{FunctionRepository, FunctionRepositoryError, FunctionRepositoryResult},
};
use async_trait::async_trait;
use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by the function repository.
pub type FunctionPgPool = Pool<ConnectionManager<PgConnection>>;

const CREATE_FUNCTION_CONFIGS_SQL: &str =
    include_str!("../../../../migrations/2026-10-01-000000_create_function_configs/up.sql");

/// `PostgreSQL`-backed function repository.
#[derive(Debug, Clone)]
pub struct PostgresFunctionRepository {
    pool: FunctionPgPool,
}

impl PostgresFunctionRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: FunctionPgPool) -> Self {
        Self { pool }
    }

    /// Creates the `function_configs` table and its name index when absent.
    ///
    /// # Errors
    ///
    /// Returns [`FunctionRepositoryError::Persistence`] when the statements
    /// fail.
    pub async fn ensure_schema(&self) -> FunctionRepositoryResult<()> {
        self.run_blocking(|connection| {
            connection
                .batch_execute(CREATE_FUNCTION_CONFIGS_SQL)
                .map_err(FunctionRepositoryError::persistence)
        })
        .await
    }

    async fn run_blocking<F, T>(&self, f: F) -> FunctionRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> FunctionRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(FunctionRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(FunctionRepositoryError::persistence)?
    }
}

#[async_trait]
impl FunctionRepository for PostgresFunctionRepository {
    async fn insert(&self, record: &FunctionRecord) -> FunctionRepositoryResult<()> {
        let name = record.name().clone();
        let row = to_changes(record);

        self.run_blocking(move |connection| {
            diesel::insert_into(function_configs::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| map_write_error(err, &name))?;
            Ok(())
        })
        .await
    }

    async fn update(&self, record: &FunctionRecord) -> FunctionRepositoryResult<()> {
        let id = record.id();
        let name = record.name().clone();
        let row = to_changes(record);

        self.run_blocking(move |connection| {
            let updated_count = diesel::update(
                function_configs::table.filter(function_configs::id.eq(id.into_inner())),
            )
            .set(&row)
            .execute(connection)
            .map_err(|err| map_write_error(err, &name))?;

            if updated_count == 0 {
                return Err(FunctionRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: FunctionId) -> FunctionRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted_count = diesel::delete(
                function_configs::table.filter(function_configs::id.eq(id.into_inner())),
            )
            .execute(connection)
            .map_err(FunctionRepositoryError::persistence)?;

            if deleted_count == 0 {
                return Err(FunctionRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: FunctionId) -> FunctionRepositoryResult<Option<FunctionRecord>> {
        self.run_blocking(move |connection| {
            let row = function_configs::table
                .filter(function_configs::id.eq(id.into_inner()))
                .select(FunctionConfigRow::as_select())
                .first::<FunctionConfigRow>(connection)
                .optional()
                .map_err(FunctionRepositoryError::persistence)?;
            row.map(row_to_record).transpose()
        })
        .await
    }

    async fn find_by_name(
        &self,
        name: &FunctionName,
    ) -> FunctionRepositoryResult<Option<FunctionRecord>> {
        let name_str = name.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = function_configs::table
                .filter(function_configs::name.eq(&name_str))
                .select(FunctionConfigRow::as_select())
                .first::<FunctionConfigRow>(connection)
                .optional()
                .map_err(FunctionRepositoryError::persistence)?;
            row.map(row_to_record).transpose()
        })
        .await
    }

    async fn find_active_by_name(
        &self,
        name: &FunctionName,
    ) -> FunctionRepositoryResult<Option<FunctionRecord>> {
        let name_str = name.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = function_configs::table
                .filter(function_configs::name.eq(&name_str))
                .filter(function_configs::is_active.eq(true))
                .select(FunctionConfigRow::as_select())
                .first::<FunctionConfigRow>(connection)
                .optional()
                .map_err(FunctionRepositoryError::persistence)?;
            row.map(row_to_record).transpose()
        })
        .await
    }

    async fn list_all(&self) -> FunctionRepositoryResult<Vec<FunctionRecord>> {
        self.run_blocking(move |connection| {
            let rows = function_configs::table
                .order(function_configs::name.asc())
                .select(FunctionConfigRow::as_select())
                .load::<FunctionConfigRow>(connection)
                .map_err(FunctionRepositoryError::persistence)?;
            rows.into_iter().map(row_to_record).collect()
        })
        .await
    }
}

fn to_changes(record: &FunctionRecord) -> FunctionConfigChanges {
    FunctionConfigChanges {
        id: record.id().into_inner(),
        name: record.name().as_str().to_owned(),
        description: record.description().to_owned(),
        input_schema: record.input_schema().to_owned(),
        implementation_type: record.implementation_type().to_owned(),
        implementation_config: record.implementation_config().to_owned(),
        is_active: record.is_active(),
        created_at: record.created_at(),
        updated_at: record.updated_at(),
    }
}

fn row_to_record(row: FunctionConfigRow) -> FunctionRepositoryResult<FunctionRecord> {
    let FunctionConfigRow {
        id,
        name,
        description,
        input_schema,
        implementation_type,
        implementation_config,
        is_active,
        created_at,
        updated_at,
    } = row;

    let parsed_name =
        FunctionName::new(name).map_err(FunctionRepositoryError::invalid_persisted_data)?;

    Ok(FunctionRecord::from_persisted(PersistedFunctionData {
        id: FunctionId::from_uuid(id),
        definition: FunctionDefinition {
            name: parsed_name,
            description,
            input_schema,
            implementation_type,
            implementation_config,
            is_active,
        },
        created_at,
        updated_at,
    }))
}

fn map_write_error(err: DieselError, name: &FunctionName) -> FunctionRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
            if is_name_unique_violation(info.as_ref()) =>
        {
            FunctionRepositoryError::DuplicateName(name.clone())
        }
        _ => FunctionRepositoryError::persistence(err),
    }
}

fn is_name_unique_violation(info: &dyn diesel::result::DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|constraint| constraint == "idx_function_configs_name")
}
