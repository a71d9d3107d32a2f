//! Query runner row decoding against `PostgreSQL`.

use super::helpers::{database_url, prepared_repo, record, unique_name};
use ai_factory::function::ports::FunctionRepository;
use ai_factory::strategy::{QueryRunner, SqlxQueryRunner};
use serde_json::json;

#[tokio::test(flavor = "multi_thread")]
async fn typed_columns_decode_to_json() {
    let Some(url) = database_url() else {
        return;
    };

    let result = SqlxQueryRunner
        .run(
            &url,
            "SELECT now() AS ts,
                    '6f1c2a9e-3b4d-4c5e-8f70-1a2b3c4d5e6f'::uuid AS id,
                    1.5::numeric AS amount,
                    '{\"a\": 1}'::jsonb AS doc,
                    DATE '2026-10-01' AS day,
                    true AS flag,
                    5 AS n,
                    NULL::text AS nothing",
        )
        .await
        .expect("query should succeed");

    let row = &result["results"][0];
    assert!(row["ts"].is_string(), "unexpected timestamp: {}", row["ts"]);
    assert_eq!(row["id"], json!("6f1c2a9e-3b4d-4c5e-8f70-1a2b3c4d5e6f"));
    assert_eq!(row["amount"], json!("1.5"));
    assert_eq!(row["doc"], json!({"a": 1}));
    assert_eq!(row["day"], json!("2026-10-01"));
    assert_eq!(row["flag"], json!(true));
    assert_eq!(row["n"], json!(5));
    assert_eq!(row["nothing"], json!(null));
}

#[tokio::test(flavor = "multi_thread")]
async fn registry_table_rows_are_returned() {
    let Some(repo) = prepared_repo().await.expect("repository setup should succeed") else {
        return;
    };
    let Some(url) = database_url() else {
        return;
    };
    let name = unique_name("rows");
    let stored = record(&name, true);
    repo.insert(&stored).await.expect("insert should succeed");

    let result = SqlxQueryRunner
        .run(&url, &format!("SELECT * FROM function_configs WHERE name = '{name}'"))
        .await;

    repo.delete(stored.id()).await.expect("cleanup should succeed");
    let value = result.expect("query should succeed");
    let row = &value["results"][0];
    assert_eq!(row["id"], json!(stored.id().to_string()));
    assert_eq!(row["name"], json!(name));
    assert_eq!(row["is_active"], json!(true));
    assert!(row["created_at"].is_string());
}

#[tokio::test(flavor = "multi_thread")]
async fn update_reports_affected_rows() {
    let Some(url) = database_url() else {
        return;
    };

    let result = SqlxQueryRunner
        .run(&url, "CREATE TEMP TABLE scratch (v int); INSERT INTO scratch VALUES (1), (2)")
        .await
        .expect("statement should succeed");

    assert_eq!(result, json!({"success": true, "affected_rows": 2}));
}
