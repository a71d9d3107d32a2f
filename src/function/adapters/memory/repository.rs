//! In-memory repository for function configurations.

use crate::function::{
    domain::{FunctionId, FunctionName, FunctionRecord},
    ports::{FunctionRepository, FunctionRepositoryError, FunctionRepositoryResult},
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread-safe in-memory function repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFunctionRepository {
    state: Arc<RwLock<InMemoryRepositoryState>>,
}

#[derive(Debug, Default)]
struct InMemoryRepositoryState {
    functions: HashMap<FunctionId, FunctionRecord>,
    name_index: HashMap<FunctionName, FunctionId>,
}

impl InMemoryFunctionRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> FunctionRepositoryResult<RwLockReadGuard<'_, InMemoryRepositoryState>> {
        self.state.read().map_err(|err| {
            FunctionRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> FunctionRepositoryResult<RwLockWriteGuard<'_, InMemoryRepositoryState>> {
        self.state.write().map_err(|err| {
            FunctionRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl FunctionRepository for InMemoryFunctionRepository {
    async fn insert(&self, record: &FunctionRecord) -> FunctionRepositoryResult<()> {
        let mut state = self.write()?;

        if state.name_index.contains_key(record.name()) {
            return Err(FunctionRepositoryError::DuplicateName(record.name().clone()));
        }

        state.name_index.insert(record.name().clone(), record.id());
        state.functions.insert(record.id(), record.clone());
        Ok(())
    }

    async fn update(&self, record: &FunctionRecord) -> FunctionRepositoryResult<()> {
        let mut state = self.write()?;

        let old_name = state
            .functions
            .get(&record.id())
            .ok_or(FunctionRepositoryError::NotFound(record.id()))?
            .name()
            .clone();

        if *record.name() != old_name {
            if let Some(&indexed_id) = state.name_index.get(record.name())
                && indexed_id != record.id()
            {
                return Err(FunctionRepositoryError::DuplicateName(record.name().clone()));
            }
            state.name_index.remove(&old_name);
            state.name_index.insert(record.name().clone(), record.id());
        }

        state.functions.insert(record.id(), record.clone());
        Ok(())
    }

    async fn delete(&self, id: FunctionId) -> FunctionRepositoryResult<()> {
        let mut state = self.write()?;
        let removed = state
            .functions
            .remove(&id)
            .ok_or(FunctionRepositoryError::NotFound(id))?;
        state.name_index.remove(removed.name());
        Ok(())
    }

    async fn find_by_id(&self, id: FunctionId) -> FunctionRepositoryResult<Option<FunctionRecord>> {
        Ok(self.read()?.functions.get(&id).cloned())
    }

    async fn find_by_name(
        &self,
        name: &FunctionName,
    ) -> FunctionRepositoryResult<Option<FunctionRecord>> {
        let state = self.read()?;
        let record = state
            .name_index
            .get(name)
            .and_then(|id| state.functions.get(id))
            .cloned();
        Ok(record)
    }

    async fn find_active_by_name(
        &self,
        name: &FunctionName,
    ) -> FunctionRepositoryResult<Option<FunctionRecord>> {
        let record = self.find_by_name(name).await?;
        Ok(record.filter(FunctionRecord::is_active))
    }

    async fn list_all(&self) -> FunctionRepositoryResult<Vec<FunctionRecord>> {
        let state = self.read()?;
        let mut records: Vec<_> = state.functions.values().cloned().collect();
        records.sort_by(|left, right| left.name().as_str().cmp(right.name().as_str()));
        Ok(records)
    }
}
