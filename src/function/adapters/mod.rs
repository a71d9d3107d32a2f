//! Adapter implementations for the function repository port.

pub mod memory;
pub mod postgres;
