//! Function administration routes.

use super::{ApiError, AppState, parse_function_id};
use crate::function::{domain::FunctionRecord, services::FunctionPayload};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use serde_json::{Value, json};

fn summary(record: &FunctionRecord) -> Value {
    json!({
        "id": record.id(),
        "name": record.name(),
        "description": record.description(),
        "implementation_type": record.implementation_type(),
        "is_active": record.is_active(),
        "created_at": record.created_at(),
        "updated_at": record.updated_at(),
    })
}

fn detail(record: &FunctionRecord) -> Value {
    let config =
        serde_json::from_str::<Value>(record.implementation_config()).unwrap_or(Value::Null);
    json!({
        "id": record.id(),
        "name": record.name(),
        "description": record.description(),
        "input_schema": record.input_schema_value(),
        "implementation_type": record.implementation_type(),
        "implementation_config": config,
        "is_active": record.is_active(),
        "created_at": record.created_at(),
        "updated_at": record.updated_at(),
    })
}

/// `GET /api/admin/functions`
pub(super) async fn list_functions(
    State(state): State<AppState>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let records = state.registry.list().await?;
    Ok(Json(records.iter().map(summary).collect()))
}

/// `GET /api/admin/functions/:id`
pub(super) async fn get_function(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_function_id(&raw_id)?;
    let record = state
        .registry
        .get(id)
        .await?
        .ok_or_else(ApiError::function_not_found)?;
    Ok(Json(detail(&record)))
}

/// `POST /api/admin/functions`
pub(super) async fn create_function(
    State(state): State<AppState>,
    body: Result<Json<FunctionPayload>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(payload) = body?;
    let record = state.registry.create(payload.into_request()).await?;
    Ok(Json(json!({"success": true, "function_id": record.id()})))
}

/// `PUT /api/admin/functions/:id`
pub(super) async fn update_function(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Result<Json<FunctionPayload>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_function_id(&raw_id)?;
    let Json(payload) = body?;
    let record = state.registry.update(id, payload.into_request()).await?;
    Ok(Json(json!({"success": true, "function_id": record.id()})))
}

/// `DELETE /api/admin/functions/:id`
pub(super) async fn delete_function(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_function_id(&raw_id)?;
    state.registry.delete(id).await?;
    Ok(Json(json!({"success": true})))
}
