//! HTTP surface: function execution and administration routes.
//!
//! Every failure is rendered as `{"success": false, "error": <message>}`
//! with a status chosen by [`ApiError`].

mod admin;
mod functions;

use crate::dispatch::{DispatchError, Dispatcher};
use crate::function::{
    domain::FunctionId,
    ports::{FunctionRepository, FunctionRepositoryError},
    services::{
        FunctionExecutionService, FunctionExecutionServiceError, FunctionRegistryService,
        FunctionRegistryServiceError,
    },
};
use crate::strategy::StrategyError;
use axum::{
    Json, Router,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use mockable::DefaultClock;
use serde_json::{Value, json};
use std::sync::Arc;
use thiserror::Error;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    registry: FunctionRegistryService<dyn FunctionRepository, DefaultClock>,
    execution: FunctionExecutionService<dyn FunctionRepository>,
}

impl AppState {
    /// Builds the services over one repository handle.
    #[must_use]
    pub fn new(repository: Arc<dyn FunctionRepository>, dispatcher: Dispatcher) -> Self {
        Self {
            registry: FunctionRegistryService::new(Arc::clone(&repository), Arc::new(DefaultClock)),
            execution: FunctionExecutionService::new(repository, dispatcher),
        }
    }

    /// Returns the administration service.
    #[must_use]
    pub const fn registry(&self) -> &FunctionRegistryService<dyn FunctionRepository, DefaultClock> {
        &self.registry
    }
}

/// Builds the application router.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/functions/:name", post(functions::execute))
        .route(
            "/api/admin/functions",
            get(admin::list_functions).post(admin::create_function),
        )
        .route(
            "/api/admin/functions/:id",
            get(admin::get_function)
                .put(admin::update_function)
                .delete(admin::delete_function),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[expect(clippy::unused_async, reason = "axum handlers are async")]
async fn root() -> Json<Value> {
    Json(json!({
        "message": "AI Factory API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Handler failure with its HTTP status class.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request or the function configuration is invalid.
    #[error("{0}")]
    BadRequest(String),
    /// No matching function exists.
    #[error("{0}")]
    NotFound(String),
    /// A provider, database, code, or persistence fault.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn function_not_found() -> Self {
        Self::NotFound("function not found".to_owned())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({"success": false, "error": self.to_string()}));
        (status, body).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<DispatchError> for ApiError {
    fn from(err: DispatchError) -> Self {
        let message = err.to_string();
        match err.strategy_error() {
            None
            | Some(
                StrategyError::Template(_)
                | StrategyError::CredentialMissing { .. }
                | StrategyError::CodeConfig(_),
            ) => Self::BadRequest(message),
            Some(
                StrategyError::Provider { .. }
                | StrategyError::Query(_)
                | StrategyError::CodeExecution(_),
            ) => Self::Internal(message),
        }
    }
}

impl From<FunctionRepositoryError> for ApiError {
    fn from(err: FunctionRepositoryError) -> Self {
        match err {
            FunctionRepositoryError::DuplicateName(_) => Self::BadRequest(err.to_string()),
            FunctionRepositoryError::NotFound(_) => Self::function_not_found(),
            FunctionRepositoryError::InvalidPersistedData(_)
            | FunctionRepositoryError::Persistence(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<FunctionRegistryServiceError> for ApiError {
    fn from(err: FunctionRegistryServiceError) -> Self {
        match err {
            FunctionRegistryServiceError::Domain(domain) => Self::BadRequest(domain.to_string()),
            FunctionRegistryServiceError::Repository(repository) => repository.into(),
        }
    }
}

impl From<FunctionExecutionServiceError> for ApiError {
    fn from(err: FunctionExecutionServiceError) -> Self {
        match err {
            FunctionExecutionServiceError::NotFound(_) => Self::NotFound(err.to_string()),
            FunctionExecutionServiceError::MissingRequiredField(_) => {
                Self::BadRequest(err.to_string())
            }
            FunctionExecutionServiceError::Dispatch(dispatch) => dispatch.into(),
            FunctionExecutionServiceError::Repository(repository) => repository.into(),
        }
    }
}

/// Parses a path identifier; anything that is not a UUID names no function.
fn parse_function_id(raw: &str) -> Result<FunctionId, ApiError> {
    Uuid::parse_str(raw)
        .map(FunctionId::from_uuid)
        .map_err(|_| ApiError::function_not_found())
}
