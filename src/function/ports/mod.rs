//! Port contracts for function configuration persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by the registry and
//! execution services.

pub mod repository;

pub use repository::{FunctionRepository, FunctionRepositoryError, FunctionRepositoryResult};
