//! `PostgreSQL` adapters for function configuration persistence.

mod models;
mod repository;
mod schema;

pub use repository::{FunctionPgPool, PostgresFunctionRepository};
