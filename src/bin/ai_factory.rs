//! AI Factory HTTP server.
//!
//! Loads configuration, selects the registry backend, seeds an empty
//! registry, and serves the API until interrupted.

use ai_factory::{
    api::{self, AppState},
    config::{Args, ServerConfig},
    dispatch::Dispatcher,
    function::{
        adapters::{
            memory::InMemoryFunctionRepository,
            postgres::{FunctionPgPool, PostgresFunctionRepository},
        },
        ports::FunctionRepository,
        services::seed::{SeedOutcome, seed_from_file},
    },
    telemetry,
};
use clap::Parser;
use diesel::pg::PgConnection;
use diesel::r2d2::ConnectionManager;
use std::error::Error;
use std::sync::Arc;
use tracing::info;

type BoxError = Box<dyn Error + Send + Sync>;

async fn open_repository(config: &ServerConfig) -> Result<Arc<dyn FunctionRepository>, BoxError> {
    let Some(url) = config.database_url.as_deref() else {
        info!("using in-memory function registry");
        return Ok(Arc::new(InMemoryFunctionRepository::new()));
    };

    let manager = ConnectionManager::<PgConnection>::new(url);
    let pool: FunctionPgPool =
        tokio::task::spawn_blocking(move || FunctionPgPool::builder().build(manager)).await??;
    let repository = PostgresFunctionRepository::new(pool);
    repository.ensure_schema().await?;
    info!("using PostgreSQL function registry");
    Ok(Arc::new(repository))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "cannot listen for shutdown signal");
    }
    info!("shutting down");
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = ServerConfig::from_args(Args::parse())?;
    telemetry::init(config.log_format)?;
    let addr = config.socket_addr()?;

    let repository = open_repository(&config).await?;
    let state = AppState::new(
        repository,
        Dispatcher::with_defaults(config.providers.to_defaults()),
    );

    match seed_from_file(state.registry(), &config.seed_file).await? {
        SeedOutcome::Seeded { count } => info!(count, "registry seeded"),
        SeedOutcome::Skipped { .. } | SeedOutcome::MissingFile => {}
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "AI Factory API listening");
    axum::serve(listener, api::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
