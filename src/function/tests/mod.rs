//! Unit tests for function registry adapters and services.
