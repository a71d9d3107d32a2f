//! Basic CRUD operations against `PostgreSQL`.

use super::helpers::{definition, prepared_repo, record, unique_name};
use ai_factory::function::ports::{FunctionRepository, FunctionRepositoryError};
use mockable::DefaultClock;

#[tokio::test(flavor = "multi_thread")]
async fn insert_then_find_round_trips_fields() {
    let Some(repo) = prepared_repo().await.expect("repository setup should succeed") else {
        return;
    };
    let stored = record(&unique_name("roundtrip"), true);

    repo.insert(&stored).await.expect("insert should succeed");

    let by_id = repo
        .find_by_id(stored.id())
        .await
        .expect("lookup should succeed")
        .expect("record should exist");
    assert_eq!(by_id.name(), stored.name());
    assert_eq!(by_id.input_schema(), stored.input_schema());
    assert_eq!(by_id.implementation_config(), stored.implementation_config());
    assert!(by_id.is_active());

    let by_name = repo
        .find_active_by_name(stored.name())
        .await
        .expect("lookup should succeed");
    assert_eq!(by_name.map(|found| found.id()), Some(stored.id()));

    repo.delete(stored.id()).await.expect("cleanup should succeed");
}

#[tokio::test(flavor = "multi_thread")]
async fn inactive_records_are_hidden_from_active_lookup() {
    let Some(repo) = prepared_repo().await.expect("repository setup should succeed") else {
        return;
    };
    let stored = record(&unique_name("inactive"), false);
    repo.insert(&stored).await.expect("insert should succeed");

    let active = repo
        .find_active_by_name(stored.name())
        .await
        .expect("lookup should succeed");
    let any = repo
        .find_by_name(stored.name())
        .await
        .expect("lookup should succeed");

    assert!(active.is_none());
    assert!(any.is_some());
    repo.delete(stored.id()).await.expect("cleanup should succeed");
}

#[tokio::test(flavor = "multi_thread")]
async fn update_replaces_fields() {
    let Some(repo) = prepared_repo().await.expect("repository setup should succeed") else {
        return;
    };
    let mut stored = record(&unique_name("before"), true);
    repo.insert(&stored).await.expect("insert should succeed");

    let renamed = unique_name("after");
    stored.replace(definition(&renamed, false), &DefaultClock);
    repo.update(&stored).await.expect("update should succeed");

    let found = repo
        .find_by_id(stored.id())
        .await
        .expect("lookup should succeed")
        .expect("record should exist");
    assert_eq!(found.name().as_str(), renamed);
    assert!(!found.is_active());
    repo.delete(stored.id()).await.expect("cleanup should succeed");
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_unknown_id_is_not_found() {
    let Some(repo) = prepared_repo().await.expect("repository setup should succeed") else {
        return;
    };
    let missing = record(&unique_name("missing"), true);

    let result = repo.delete(missing.id()).await;

    assert!(matches!(result, Err(FunctionRepositoryError::NotFound(_))));
}
