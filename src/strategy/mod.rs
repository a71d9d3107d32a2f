//! Execution strategies, one per implementation kind.
//!
//! Each strategy expands its templates from the call inputs and delegates the
//! side effect to a port: [`TextGenerationClient`] for the remote providers,
//! [`QueryRunner`] for database statements, and [`CodeInvoker`] for dynamic
//! code.

pub mod code;
mod error;
mod ports;
pub mod query;
pub mod remote;

pub use code::{CodeStrategy, WasmCodeInvoker};
pub use error::{StrategyError, StrategyResult};
pub use ports::{CodeInvoker, GenerationReply, GenerationRequest, QueryRunner, TextGenerationClient};
pub use query::{QueryStrategy, SqlxQueryRunner};
pub use remote::{ProviderClients, ProviderDefaults, RemoteGenerationStrategy};
