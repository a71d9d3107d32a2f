//! One-time bootstrap of the registry from a JSON seed file.
//!
//! The file holds an array of function objects. `input_schema` and
//! `implementation_config` may be given either as JSON text or as inline
//! JSON values. Seeding only happens while the registry is empty, and either
//! every function in the file is registered or none is.

use super::{FunctionPayload, FunctionRegistryService, FunctionRegistryServiceError, FunctionRequest};
use crate::function::domain::FunctionId;
use crate::function::ports::FunctionRepository;
use mockable::Clock;
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Result of a seeding attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The registry already held functions; nothing was loaded.
    Skipped {
        /// Number of functions already registered.
        existing: usize,
    },
    /// The seed file does not exist.
    MissingFile,
    /// Functions were registered from the file.
    Seeded {
        /// Number of functions registered.
        count: usize,
    },
}

/// Errors returned while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    /// The seed file could not be read.
    #[error("cannot read seed file {path}: {source}")]
    Read {
        /// Seed file path.
        path: PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },

    /// The seed file is not a JSON array of function objects.
    #[error("invalid seed file {path}: {source}")]
    Parse {
        /// Seed file path.
        path: PathBuf,
        /// Underlying decode failure.
        source: serde_json::Error,
    },

    /// A seeded function could not be registered.
    #[error("cannot seed function '{name}': {source}")]
    Register {
        /// Name of the rejected function.
        name: String,
        /// Registry failure.
        source: FunctionRegistryServiceError,
    },

    /// The seed file names the same function more than once.
    #[error("function '{name}' appears more than once in the seed file")]
    DuplicateEntry {
        /// Repeated function name.
        name: String,
    },

    /// The registry could not be inspected.
    #[error(transparent)]
    Registry(#[from] FunctionRegistryServiceError),
}

/// Registers every function in `path` when the registry is empty.
///
/// # Errors
///
/// Returns [`SeedError`] when the file cannot be read or decoded, when a name
/// repeats, or when a function is rejected by the registry. Functions
/// registered before a rejection are removed again.
pub async fn seed_from_file<R, C>(
    registry: &FunctionRegistryService<R, C>,
    path: &Path,
) -> Result<SeedOutcome, SeedError>
where
    R: FunctionRepository + ?Sized,
    C: Clock + Send + Sync,
{
    let existing = registry.list().await?.len();
    if existing > 0 {
        info!(existing, "registry already populated, skipping seed");
        return Ok(SeedOutcome::Skipped { existing });
    }

    let contents = match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "seed file not found");
            return Ok(SeedOutcome::MissingFile);
        }
        Err(source) => {
            return Err(SeedError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let functions: Vec<FunctionPayload> =
        serde_json::from_str(&contents).map_err(|source| SeedError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let requests = validated_requests(functions)?;
    let count = requests.len();
    let mut created = Vec::with_capacity(count);
    for (name, request) in requests {
        match registry.create(request).await {
            Ok(record) => {
                info!(function = %name, "seeded function");
                created.push(record.id());
            }
            Err(source) => {
                roll_back(registry, created).await;
                return Err(SeedError::Register { name, source });
            }
        }
    }

    info!(count, path = %path.display(), "seeded functions");
    Ok(SeedOutcome::Seeded { count })
}

fn validated_requests(
    functions: Vec<FunctionPayload>,
) -> Result<Vec<(String, FunctionRequest)>, SeedError> {
    let mut seen = HashSet::with_capacity(functions.len());
    let mut requests = Vec::with_capacity(functions.len());
    for function in functions {
        let name = function.name().to_owned();
        let request = function.into_request();
        let definition = request
            .clone()
            .into_definition()
            .map_err(|err| SeedError::Register {
                name: name.clone(),
                source: err.into(),
            })?;
        if !seen.insert(definition.name) {
            return Err(SeedError::DuplicateEntry { name });
        }
        requests.push((name, request));
    }
    Ok(requests)
}

async fn roll_back<R, C>(registry: &FunctionRegistryService<R, C>, created: Vec<FunctionId>)
where
    R: FunctionRepository + ?Sized,
    C: Clock + Send + Sync,
{
    for id in created {
        if let Err(err) = registry.delete(id).await {
            warn!(id = %id, error = %err, "cannot roll back seeded function");
        }
    }
}
