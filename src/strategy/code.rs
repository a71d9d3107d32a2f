//! Dynamic code strategy backed by WebAssembly modules.
//!
//! A module is loaded from a `.wasm`/`.wat` file or compiled from inline WAT
//! text into a fresh instance for every call. The calling convention:
//!
//! - the module exports `memory` and `alloc(len: i32) -> i32`;
//! - the named function takes `(ptr: i32, len: i32)` addressing the inputs
//!   serialized as a JSON object, and returns an `i64` packing
//!   `ptr << 32 | len` of a JSON result, or `0` for `null`;
//! - `dealloc(ptr: i32, len: i32)` is called for both buffers when exported,
//!   after the result has been copied out; a result that reuses the input
//!   buffer is released once.
//!
//! Modules run without fuel, memory, or capability limits.

use super::{CodeInvoker, StrategyError, StrategyResult};
use crate::function::domain::{CodeConfig, CodeSource};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;
use wasmtime::{Engine, Instance, Memory, Module, Store, TypedFunc};

/// Strategy that resolves the module source and delegates the call.
#[derive(Clone)]
pub struct CodeStrategy {
    invoker: Arc<dyn CodeInvoker>,
}

impl CodeStrategy {
    /// Creates a strategy over the given invoker.
    #[must_use]
    pub fn new(invoker: Arc<dyn CodeInvoker>) -> Self {
        Self { invoker }
    }

    /// Calls the configured function with `inputs` as its keyword arguments
    /// and returns its result unmodified.
    ///
    /// # Errors
    ///
    /// Returns [`StrategyError::CodeConfig`] when the configuration names no
    /// module source or function, and [`StrategyError::CodeExecution`] when
    /// the call fails.
    pub async fn invoke(
        &self,
        config: &CodeConfig,
        inputs: &Map<String, Value>,
    ) -> StrategyResult<Value> {
        let source = config.source().ok_or_else(|| {
            StrategyError::CodeConfig(
                "dynamic code config must contain either 'file_path' or 'code'".to_owned(),
            )
        })?;
        let function_name = config.function_name().ok_or_else(|| {
            StrategyError::CodeConfig("dynamic code config must contain 'function_name'".to_owned())
        })?;

        match &source {
            CodeSource::File(path) => {
                debug!(path = %path.display(), function = function_name, "invoking code from file");
            }
            CodeSource::Inline(_) => {
                debug!(function = function_name, "invoking inline code");
            }
        }
        self.invoker.invoke(&source, function_name, inputs).await
    }
}

/// [`CodeInvoker`] that instantiates WebAssembly modules with `wasmtime`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WasmCodeInvoker;

#[async_trait]
impl CodeInvoker for WasmCodeInvoker {
    async fn invoke(
        &self,
        source: &CodeSource,
        function_name: &str,
        inputs: &Map<String, Value>,
    ) -> StrategyResult<Value> {
        let payload = serde_json::to_vec(inputs).map_err(StrategyError::code_execution)?;
        let owned_source = source.clone();
        let owned_name = function_name.to_owned();

        tokio::task::spawn_blocking(move || call_module(&owned_source, &owned_name, &payload))
            .await
            .map_err(StrategyError::code_execution)?
    }
}

struct Guest {
    store: Store<()>,
    instance: Instance,
    memory: Memory,
}

impl Guest {
    fn load(source: &CodeSource) -> StrategyResult<Self> {
        let engine = Engine::default();
        let module = match source {
            CodeSource::File(path) => Module::from_file(&engine, path),
            CodeSource::Inline(text) => Module::new(&engine, text),
        }
        .map_err(StrategyError::code_execution)?;

        let mut store = Store::new(&engine, ());
        let instance =
            Instance::new(&mut store, &module, &[]).map_err(StrategyError::code_execution)?;
        let memory = instance.get_memory(&mut store, "memory").ok_or_else(|| {
            StrategyError::CodeExecution("module does not export 'memory'".to_owned())
        })?;

        Ok(Self {
            store,
            instance,
            memory,
        })
    }

    fn function<Params, Results>(&mut self, name: &str) -> StrategyResult<TypedFunc<Params, Results>>
    where
        Params: wasmtime::WasmParams,
        Results: wasmtime::WasmResults,
    {
        self.instance
            .get_typed_func::<Params, Results>(&mut self.store, name)
            .map_err(|err| StrategyError::CodeExecution(format!("export '{name}': {err}")))
    }

    fn write(&mut self, bytes: &[u8]) -> StrategyResult<(i32, i32)> {
        let length = i32::try_from(bytes.len()).map_err(StrategyError::code_execution)?;
        let alloc = self.function::<i32, i32>("alloc")?;
        let pointer = alloc
            .call(&mut self.store, length)
            .map_err(StrategyError::code_execution)?;
        let offset = usize::try_from(pointer).map_err(StrategyError::code_execution)?;
        self.memory
            .write(&mut self.store, offset, bytes)
            .map_err(StrategyError::code_execution)?;
        Ok((pointer, length))
    }

    fn read(&self, packed: i64) -> StrategyResult<(i32, i32, Vec<u8>)> {
        let bits = u64::try_from(packed).map_err(|_| {
            StrategyError::CodeExecution(format!("invalid result location: {packed}"))
        })?;
        let pointer = i32::try_from(bits >> 32).map_err(StrategyError::code_execution)?;
        let length = i32::try_from(bits & 0xFFFF_FFFF).map_err(StrategyError::code_execution)?;
        let offset = usize::try_from(pointer).map_err(StrategyError::code_execution)?;
        let size = usize::try_from(length).map_err(StrategyError::code_execution)?;

        let bytes = offset
            .checked_add(size)
            .and_then(|end| self.memory.data(&self.store).get(offset..end))
            .ok_or_else(|| {
                StrategyError::CodeExecution(format!(
                    "result location {offset}+{size} is outside guest memory"
                ))
            })?
            .to_vec();
        Ok((pointer, length, bytes))
    }

    fn release(&mut self, pointer: i32, length: i32) -> StrategyResult<()> {
        if let Ok(dealloc) = self.function::<(i32, i32), ()>("dealloc") {
            dealloc
                .call(&mut self.store, (pointer, length))
                .map_err(StrategyError::code_execution)?;
        }
        Ok(())
    }
}

fn call_module(source: &CodeSource, function_name: &str, payload: &[u8]) -> StrategyResult<Value> {
    let mut guest = Guest::load(source)?;
    let entry = guest.function::<(i32, i32), i64>(function_name)?;

    let (pointer, length) = guest.write(payload)?;
    let packed = entry
        .call(&mut guest.store, (pointer, length))
        .map_err(StrategyError::code_execution)?;

    if packed == 0 {
        guest.release(pointer, length)?;
        return Ok(Value::Null);
    }
    let (result_pointer, result_length, result) = guest.read(packed)?;
    guest.release(pointer, length)?;
    if result_pointer != pointer {
        guest.release(result_pointer, result_length)?;
    }
    serde_json::from_slice(&result)
        .map_err(|err| StrategyError::CodeExecution(format!("result is not valid JSON: {err}")))
}
