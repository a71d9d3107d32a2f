//! Name uniqueness enforcement in `PostgreSQL`.

use super::helpers::{definition, prepared_repo, record, unique_name};
use mockable::DefaultClock;
use ai_factory::function::ports::{FunctionRepository, FunctionRepositoryError};

#[tokio::test(flavor = "multi_thread")]
async fn duplicate_insert_is_rejected() {
    let Some(repo) = prepared_repo().await.expect("repository setup should succeed") else {
        return;
    };
    let name = unique_name("dup");
    let first = record(&name, true);
    repo.insert(&first).await.expect("insert should succeed");

    let result = repo.insert(&record(&name, true)).await;

    assert!(matches!(
        result,
        Err(FunctionRepositoryError::DuplicateName(ref taken)) if taken.as_str() == name
    ));
    repo.delete(first.id()).await.expect("cleanup should succeed");
}

#[tokio::test(flavor = "multi_thread")]
async fn rename_onto_existing_name_is_rejected() {
    let Some(repo) = prepared_repo().await.expect("repository setup should succeed") else {
        return;
    };
    let taken_name = unique_name("taken");
    let taken = record(&taken_name, true);
    let mut renamed = record(&unique_name("renamed"), true);
    repo.insert(&taken).await.expect("insert should succeed");
    repo.insert(&renamed).await.expect("insert should succeed");

    renamed.replace(definition(&taken_name, true), &DefaultClock);
    let result = repo.update(&renamed).await;

    assert!(matches!(
        result,
        Err(FunctionRepositoryError::DuplicateName(ref taken)) if taken.as_str() == taken_name
    ));
    repo.delete(taken.id()).await.expect("cleanup should succeed");
    repo.delete(renamed.id()).await.expect("cleanup should succeed");
}
