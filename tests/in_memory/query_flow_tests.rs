//! `database_query` functions executed end to end against SQLite.

use super::helpers::{Services, inputs, services};
use ai_factory::dispatch::DispatchError;
use ai_factory::function::services::{FunctionExecutionServiceError, FunctionRequest};
use ai_factory::strategy::StrategyError;
use rstest::rstest;
use serde_json::json;
use tempfile::TempDir;

async fn register_query(services: &Services, name: &str, url: &str, template: &str) {
    services
        .registry
        .create(FunctionRequest::new(
            name,
            "database_query",
            json!({"connection_string": url, "query_template": template}).to_string(),
        ))
        .await
        .expect("create should succeed");
}

async fn prepared_database(services: &Services) -> (TempDir, String) {
    let dir = TempDir::new().expect("temp dir should be created");
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("shop.db").display());
    register_query(
        services,
        "setup",
        &url,
        "CREATE TABLE products (id INTEGER PRIMARY KEY, title TEXT NOT NULL);
         INSERT INTO products VALUES (5, 'lamp'), (6, 'desk');",
    )
    .await;
    services
        .execution
        .execute("setup", &inputs(json!({})))
        .await
        .expect("setup should succeed");
    (dir, url)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn select_expands_inputs_into_statement(services: Services) {
    let (_dir, url) = prepared_database(&services).await;
    register_query(
        &services,
        "product",
        &url,
        "SELECT id, title FROM products WHERE id = {id}",
    )
    .await;

    let result = services
        .execution
        .execute("product", &inputs(json!({"id": 5})))
        .await
        .expect("query should succeed");

    assert_eq!(result, json!({"results": [{"id": 5, "title": "lamp"}]}));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn write_reports_affected_rows(services: Services) {
    let (_dir, url) = prepared_database(&services).await;
    register_query(
        &services,
        "rename",
        &url,
        "UPDATE products SET title = '{title}' WHERE id >= {min_id}",
    )
    .await;

    let result = services
        .execution
        .execute("rename", &inputs(json!({"title": "chair", "min_id": 5})))
        .await
        .expect("update should succeed");

    assert_eq!(result, json!({"success": true, "affected_rows": 2}));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_placeholder_is_reported_before_connecting(services: Services) {
    register_query(
        &services,
        "product",
        "sqlite:///nonexistent/dir/never.db",
        "SELECT * FROM products WHERE id = {id}",
    )
    .await;

    let result = services
        .execution
        .execute("product", &inputs(json!({"sku": 5})))
        .await;

    let Err(FunctionExecutionServiceError::Dispatch(err)) = result else {
        panic!("expected a dispatch error, got {result:?}");
    };
    assert!(matches!(
        err.strategy_error(),
        Some(StrategyError::Template(_))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn database_failure_is_a_query_error(services: Services) {
    let (_dir, url) = prepared_database(&services).await;
    register_query(&services, "broken", &url, "SELECT * FROM missing_table").await;

    let result = services.execution.execute("broken", &inputs(json!({}))).await;

    assert!(matches!(
        result,
        Err(FunctionExecutionServiceError::Dispatch(DispatchError::Execution {
            source: StrategyError::Query(_),
            ..
        }))
    ));
}
