//! Registry administration flows.

use super::helpers::{Services, inputs, services};
use ai_factory::function::{
    ports::FunctionRepositoryError,
    services::{
        FunctionExecutionServiceError, FunctionRegistryServiceError, FunctionRequest,
        seed::{SeedOutcome, seed_from_file},
    },
};
use rstest::rstest;
use serde_json::json;

fn generation_request(name: &str) -> FunctionRequest {
    FunctionRequest::new(
        name,
        "anthropic",
        json!({"prompt_template": "Summarize: {text}"}).to_string(),
    )
    .with_description("Summarize text")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_returns_functions_ordered_by_name(services: Services) {
    for name in ["translate", "classify", "summarize"] {
        services
            .registry
            .create(generation_request(name))
            .await
            .expect("create should succeed");
    }

    let names: Vec<String> = services
        .registry
        .list()
        .await
        .expect("list should succeed")
        .iter()
        .map(|record| record.name().as_str().to_owned())
        .collect();

    assert_eq!(names, ["classify", "summarize", "translate"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rename_frees_old_name(services: Services) {
    let created = services
        .registry
        .create(generation_request("summarize"))
        .await
        .expect("create should succeed");

    services
        .registry
        .update(created.id(), generation_request("digest"))
        .await
        .expect("update should succeed");

    services
        .registry
        .create(generation_request("summarize"))
        .await
        .expect("old name should be free after rename");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rename_onto_existing_name_is_rejected(services: Services) {
    services
        .registry
        .create(generation_request("summarize"))
        .await
        .expect("create should succeed");
    let other = services
        .registry
        .create(generation_request("digest"))
        .await
        .expect("create should succeed");

    let result = services
        .registry
        .update(other.id(), generation_request("summarize"))
        .await;

    assert!(matches!(
        result,
        Err(FunctionRegistryServiceError::Repository(
            FunctionRepositoryError::DuplicateName(_)
        ))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deactivated_function_stops_executing(services: Services) {
    let created = services
        .registry
        .create(generation_request("summarize"))
        .await
        .expect("create should succeed");

    services
        .registry
        .update(created.id(), generation_request("summarize").with_active(false))
        .await
        .expect("update should succeed");

    let result = services
        .execution
        .execute("summarize", &inputs(json!({"text": "hi"})))
        .await;
    assert!(matches!(
        result,
        Err(FunctionExecutionServiceError::NotFound(_))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleted_function_is_gone(services: Services) {
    let created = services
        .registry
        .create(generation_request("summarize"))
        .await
        .expect("create should succeed");

    services
        .registry
        .delete(created.id())
        .await
        .expect("delete should succeed");

    let result = services.registry.delete(created.id()).await;
    assert!(matches!(
        result,
        Err(FunctionRegistryServiceError::Repository(
            FunctionRepositoryError::NotFound(_)
        ))
    ));
    assert!(
        services
            .registry
            .list()
            .await
            .expect("list should succeed")
            .is_empty()
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn bundled_seed_file_loads(services: Services) {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data/seed/functions.json");

    let outcome = seed_from_file(&services.registry, &path)
        .await
        .expect("bundled seed should load");

    assert_eq!(outcome, SeedOutcome::Seeded { count: 5 });
}
