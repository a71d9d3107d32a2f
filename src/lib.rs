//! AI Factory: configuration-driven function dispatcher.
//!
//! Functions are stored as configuration records and executed by name. Each
//! record names an implementation type, and the dispatcher routes the call to
//! the matching strategy: remote text generation, a templated database
//! statement, or a dynamically loaded WebAssembly module.
//!
//! # Architecture
//!
//! The registry follows hexagonal architecture principles:
//!
//! - **Domain**: Function records and the decoded implementation configuration
//! - **Ports**: The [`function::ports::FunctionRepository`] trait and the
//!   strategy ports in [`strategy`]
//! - **Adapters**: In-memory and `PostgreSQL` repositories, HTTP provider
//!   clients, the `sqlx` query runner, and the `wasmtime` code invoker
//!
//! # Modules
//!
//! - [`function`]: Function registry domain, repositories, and services
//! - [`dispatch`]: Template expansion and strategy dispatch
//! - [`strategy`]: Execution strategies and their external adapters
//! - [`api`]: HTTP routes
//! - [`config`]: Server configuration
//! - [`telemetry`]: Tracing subscriber setup

pub mod api;
pub mod config;
pub mod dispatch;
pub mod function;
pub mod strategy;
pub mod telemetry;
