//! Port contracts for the side-effecting half of each strategy.
//!
//! Strategies own template expansion and result shaping; the ports perform
//! the network call, database round trip, or module invocation.

use super::StrategyResult;
use crate::function::domain::CodeSource;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Fully resolved request for a single text-generation call.
///
/// Built fresh for every call; nothing about the endpoint or credential is
/// held in process-wide client state.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Base URL of the provider API.
    pub endpoint: String,
    /// API credential, absent for providers that need none.
    pub credential: Option<String>,
    /// Model name.
    pub model: String,
    /// Optional system prompt.
    pub system_prompt: Option<String>,
    /// Expanded user prompt.
    pub prompt: String,
    /// Sampling temperature.
    pub temperature: Option<f64>,
    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,
    /// Nucleus sampling parameter.
    pub top_p: Option<f64>,
    /// Provider tool declarations.
    pub tools: Vec<Value>,
}

/// Provider reply reduced to the parts the strategy consumes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReply {
    /// First text content of the reply.
    pub text: Option<String>,
    /// Arguments of the first structured tool invocation.
    pub tool_arguments: Option<Value>,
}

/// Client for one remote text-generation provider.
#[async_trait]
pub trait TextGenerationClient: Send + Sync {
    /// Performs one request/response round trip.
    ///
    /// # Errors
    ///
    /// Returns [`super::StrategyError::Provider`] for transport, status, or
    /// decoding failures.
    async fn generate(&self, request: &GenerationRequest) -> StrategyResult<GenerationReply>;
}

/// Executes one formatted statement against a database.
#[async_trait]
pub trait QueryRunner: Send + Sync {
    /// Opens a connection, runs `statement` once, and closes the connection.
    ///
    /// Returns `{"results": [...]}` for row-returning statements and
    /// `{"success": true, "affected_rows": n}` otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`super::StrategyError::Query`] for connection or execution
    /// failures.
    async fn run(&self, connection_string: &str, statement: &str) -> StrategyResult<Value>;
}

/// Loads a code module and calls one of its exported functions.
#[async_trait]
pub trait CodeInvoker: Send + Sync {
    /// Calls `function_name` in a fresh instance of the module with the
    /// inputs as its keyword arguments.
    ///
    /// # Errors
    ///
    /// Returns [`super::StrategyError::CodeExecution`] for load, compile,
    /// lookup, call, or result-decoding failures.
    async fn invoke(
        &self,
        source: &CodeSource,
        function_name: &str,
        inputs: &Map<String, Value>,
    ) -> StrategyResult<Value>;
}
