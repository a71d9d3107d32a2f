//! Application services for function administration and execution.

mod execution;
mod registry;
pub mod seed;

pub use execution::{
    FunctionExecutionService, FunctionExecutionServiceError, FunctionExecutionServiceResult,
};
pub use registry::{
    FunctionPayload, FunctionRegistryService, FunctionRegistryServiceError,
    FunctionRegistryServiceResult, FunctionRequest,
};
