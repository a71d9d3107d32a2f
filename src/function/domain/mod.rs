//! Domain model for configured functions.
//!
//! A function record pairs a unique name with an implementation tag and a
//! JSON configuration whose shape depends on that tag. Decoding the
//! configuration into [`Implementation`] happens per call, so records with
//! malformed or unknown configuration can still be stored and administered.

mod error;
mod ids;
mod implementation;
mod record;
mod schema;

pub use error::{FunctionDomainError, ImplementationDecodeError, ParseImplementationKindError};
pub use ids::{FunctionId, FunctionName};
pub use implementation::{
    CodeConfig, CodeSource, DEFAULT_CONNECTION_STRING, GenerationConfig, Implementation,
    ImplementationKind, Provider, QueryConfig,
};
pub use record::{FunctionDefinition, FunctionRecord, PersistedFunctionData};
pub use schema::first_missing_required_field;
