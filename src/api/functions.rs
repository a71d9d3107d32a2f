//! Function execution route.

use super::{ApiError, AppState};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use serde::Deserialize;
use serde_json::{Map, Value, json};

#[derive(Debug, Deserialize)]
pub(super) struct ExecuteRequest {
    inputs: Map<String, Value>,
}

/// `POST /api/functions/:name`
pub(super) async fn execute(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Result<Json<ExecuteRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = body?;
    let result = state.execution.execute(&name, &request.inputs).await?;
    Ok(Json(json!({"success": true, "result": result})))
}
