//! Shared fixtures for in-memory registry integration tests.

use std::sync::Arc;

use ai_factory::{
    dispatch::Dispatcher,
    function::{
        adapters::memory::InMemoryFunctionRepository,
        services::{FunctionExecutionService, FunctionRegistryService},
    },
    strategy::ProviderDefaults,
};
use mockable::DefaultClock;
use rstest::fixture;
use serde_json::{Map, Value};

/// Registry service over the in-memory repository.
pub type TestRegistry = FunctionRegistryService<InMemoryFunctionRepository, DefaultClock>;

/// Execution service over the in-memory repository.
pub type TestExecution = FunctionExecutionService<InMemoryFunctionRepository>;

/// Registry and execution services sharing one repository.
pub struct Services {
    /// Administration service.
    pub registry: TestRegistry,
    /// Execution service.
    pub execution: TestExecution,
}

/// Provides services over a fresh repository with the production strategies.
#[fixture]
pub fn services() -> Services {
    let repository = Arc::new(InMemoryFunctionRepository::new());
    Services {
        registry: FunctionRegistryService::new(Arc::clone(&repository), Arc::new(DefaultClock)),
        execution: FunctionExecutionService::new(
            repository,
            Dispatcher::with_defaults(ProviderDefaults::new()),
        ),
    }
}

/// Converts a JSON object literal into an input map.
pub fn inputs(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
