//! Strategy selection and failure wrapping for a single function call.

use super::DispatchError;
use crate::function::domain::{FunctionRecord, Implementation};
use crate::strategy::{
    CodeStrategy, ProviderClients, ProviderDefaults, QueryStrategy, RemoteGenerationStrategy,
    SqlxQueryRunner, StrategyResult, WasmCodeInvoker,
};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{error, info};

/// Resolves a function's strategy and invokes it.
///
/// The dispatcher holds no per-call state; the configuration is decoded
/// afresh on every call.
#[derive(Clone)]
pub struct Dispatcher {
    remote: RemoteGenerationStrategy,
    query: QueryStrategy,
    code: CodeStrategy,
}

impl Dispatcher {
    /// Creates a dispatcher from explicit strategies.
    #[must_use]
    pub const fn new(
        remote: RemoteGenerationStrategy,
        query: QueryStrategy,
        code: CodeStrategy,
    ) -> Self {
        Self {
            remote,
            query,
            code,
        }
    }

    /// Creates a dispatcher over the HTTP provider clients, the `sqlx` query
    /// runner, and the WebAssembly code invoker.
    #[must_use]
    pub fn with_defaults(defaults: ProviderDefaults) -> Self {
        Self::new(
            RemoteGenerationStrategy::new(ProviderClients::http(), defaults),
            QueryStrategy::new(Arc::new(SqlxQueryRunner)),
            CodeStrategy::new(Arc::new(WasmCodeInvoker)),
        )
    }

    /// Executes `record` with `inputs`.
    ///
    /// The configuration is decoded before any strategy runs, so a malformed
    /// or unknown configuration never causes a side effect.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::ConfigParse`] or
    /// [`DispatchError::UnknownImplementationType`] when decoding fails and
    /// [`DispatchError::Execution`] when the strategy fails.
    pub async fn execute(
        &self,
        record: &FunctionRecord,
        inputs: &Map<String, Value>,
    ) -> Result<Value, DispatchError> {
        let name = record.name();
        let implementation =
            Implementation::decode(record.implementation_type(), record.implementation_config())
                .inspect_err(|err| {
                    error!(function = %name, error = %err, "cannot decode function configuration");
                })?;

        info!(
            function = %name,
            implementation_type = %implementation.kind(),
            "executing function"
        );

        self.invoke(&implementation, inputs).await.map_err(|source| {
            let err = DispatchError::execution(name.clone(), source);
            if let DispatchError::Execution { trace, .. } = &err {
                error!(function = %name, error = %err, trace = ?trace, "function execution failed");
            }
            err
        })
    }

    async fn invoke(
        &self,
        implementation: &Implementation,
        inputs: &Map<String, Value>,
    ) -> StrategyResult<Value> {
        match implementation {
            Implementation::RemoteGeneration { provider, config } => {
                self.remote.call(*provider, config, inputs).await
            }
            Implementation::DatabaseQuery(config) => self.query.run(config, inputs).await,
            Implementation::DynamicCode(config) => self.code.invoke(config, inputs).await,
        }
    }
}
