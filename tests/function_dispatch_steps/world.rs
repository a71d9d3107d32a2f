//! Shared world state for function dispatch BDD scenarios.

use std::sync::Arc;

use ai_factory::{
    dispatch::Dispatcher,
    function::{
        adapters::memory::InMemoryFunctionRepository,
        domain::FunctionRecord,
        services::{
            FunctionExecutionService, FunctionExecutionServiceError, FunctionRegistryService,
            FunctionRequest,
        },
    },
    strategy::ProviderDefaults,
};
use mockable::DefaultClock;
use rstest::fixture;
use serde_json::{Value, json};

/// Module whose `check` export returns `{"ok":true}`.
pub const OK_MODULE: &str = r#"(module
  (memory (export "memory") 1)
  (data (i32.const 16) "{\"ok\":true}")
  (func (export "alloc") (param i32) (result i32) i32.const 1024)
  (func (export "check") (param i32 i32) (result i64) i64.const 68719476747))"#;

/// Scenario world for function dispatch behaviour tests.
pub struct DispatchWorld {
    /// Administration service.
    pub registry: FunctionRegistryService<InMemoryFunctionRepository, DefaultClock>,
    /// Execution service sharing the registry's repository.
    pub execution: FunctionExecutionService<InMemoryFunctionRepository>,
    /// Last registered function.
    pub last_created: Option<FunctionRecord>,
    /// Result of the last execution.
    pub last_result: Option<Result<Value, FunctionExecutionServiceError>>,
}

impl DispatchWorld {
    /// Creates a world over an empty registry.
    #[must_use]
    pub fn new() -> Self {
        let repository = Arc::new(InMemoryFunctionRepository::new());
        Self {
            registry: FunctionRegistryService::new(
                Arc::clone(&repository),
                Arc::new(DefaultClock),
            ),
            execution: FunctionExecutionService::new(
                repository,
                Dispatcher::with_defaults(ProviderDefaults::new()),
            ),
            last_created: None,
            last_result: None,
        }
    }
}

impl Default for DispatchWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> DispatchWorld {
    DispatchWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Builds a `dynamic_code` request for the inline module.
pub fn code_request(name: &str) -> FunctionRequest {
    FunctionRequest::new(
        name,
        "dynamic_code",
        json!({"code": OK_MODULE, "function_name": "check"}).to_string(),
    )
}
