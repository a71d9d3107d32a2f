//! In-memory adapters for function configuration persistence.

mod repository;

pub use repository::InMemoryFunctionRepository;
