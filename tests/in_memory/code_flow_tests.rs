//! `dynamic_code` functions loaded from module files.

use super::helpers::{Services, inputs, services};
use ai_factory::dispatch::DispatchError;
use ai_factory::function::services::{FunctionExecutionServiceError, FunctionRequest};
use ai_factory::strategy::StrategyError;
use rstest::rstest;
use serde_json::json;
use std::io::Write;
use tempfile::NamedTempFile;

/// Module whose `greet` export returns a fixed JSON document.
const GREETER_WAT: &str = r#"(module
  (memory (export "memory") 1)
  (data (i32.const 64) "{\"greeting\":\"hello\"}")
  (func (export "alloc") (param i32) (result i32) i32.const 4096)
  (func (export "greet") (param i32 i32) (result i64)
    i64.const 274877906964)
  (func (export "crash") (param i32 i32) (result i64)
    unreachable))"#;

fn module_file() -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".wat")
        .tempfile()
        .expect("temp file should be created");
    file.write_all(GREETER_WAT.as_bytes())
        .expect("module should be written");
    file
}

async fn register_export(services: &Services, file: &NamedTempFile, export: &str) {
    services
        .registry
        .create(FunctionRequest::new(
            export,
            "dynamic_code",
            json!({"file_path": file.path(), "function_name": export}).to_string(),
        ))
        .await
        .expect("create should succeed");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn file_module_result_is_returned_verbatim(services: Services) {
    let file = module_file();
    register_export(&services, &file, "greet").await;

    let result = services
        .execution
        .execute("greet", &inputs(json!({"name": "Ada"})))
        .await
        .expect("execution should succeed");

    assert_eq!(result, json!({"greeting": "hello"}));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn trapping_function_is_an_execution_error(services: Services) {
    let file = module_file();
    register_export(&services, &file, "crash").await;

    let result = services.execution.execute("crash", &inputs(json!({}))).await;

    assert!(matches!(
        result,
        Err(FunctionExecutionServiceError::Dispatch(DispatchError::Execution {
            source: StrategyError::CodeExecution(_),
            ..
        }))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_export_is_an_execution_error(services: Services) {
    let file = module_file();
    services
        .registry
        .create(FunctionRequest::new(
            "absent",
            "dynamic_code",
            json!({"file_path": file.path(), "function_name": "absent"}).to_string(),
        ))
        .await
        .expect("create should succeed");

    let result = services.execution.execute("absent", &inputs(json!({}))).await;

    assert!(matches!(
        result,
        Err(FunctionExecutionServiceError::Dispatch(DispatchError::Execution {
            source: StrategyError::CodeExecution(_),
            ..
        }))
    ));
}
