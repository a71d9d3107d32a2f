//! Step definitions for function dispatch scenarios.

mod given;
mod then;
mod when;
pub mod world;
