//! Then steps for function dispatch BDD scenarios.

use super::world::{DispatchWorld, run_async};
use ai_factory::{dispatch::DispatchError, function::services::FunctionExecutionServiceError};
use rstest_bdd_macros::then;
use serde_json::{Value, json};

fn last_result(
    world: &DispatchWorld,
) -> Result<&Result<Value, FunctionExecutionServiceError>, eyre::Report> {
    world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing execution result in scenario world"))
}

#[then("the result is the module output")]
fn result_is_module_output(world: &DispatchWorld) -> Result<(), eyre::Report> {
    match last_result(world)? {
        Ok(value) if *value == json!({"ok": true}) => Ok(()),
        other => Err(eyre::eyre!("expected module output, got {other:?}")),
    }
}

#[then("execution fails because the function was not found")]
fn fails_not_found(world: &DispatchWorld) -> Result<(), eyre::Report> {
    let result = last_result(world)?;
    if !matches!(result, Err(FunctionExecutionServiceError::NotFound(_))) {
        return Err(eyre::eyre!("expected not-found error, got {result:?}"));
    }
    Ok(())
}

#[then("the function is still visible by id")]
fn visible_by_id(world: &DispatchWorld) -> Result<(), eyre::Report> {
    let created = world
        .last_created
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no registered function in scenario world"))?;
    let found = run_async(world.registry.get(created.id()))
        .map_err(|err| eyre::eyre!("lookup failed: {err}"))?;
    if found.is_none() {
        return Err(eyre::eyre!("expected function {} to exist", created.id()));
    }
    Ok(())
}

#[then("execution fails with a configuration parse error")]
fn fails_config_parse(world: &DispatchWorld) -> Result<(), eyre::Report> {
    let result = last_result(world)?;
    if !matches!(
        result,
        Err(FunctionExecutionServiceError::Dispatch(
            DispatchError::ConfigParse(_)
        ))
    ) {
        return Err(eyre::eyre!("expected configuration parse error, got {result:?}"));
    }
    Ok(())
}

#[then(r#"execution fails naming the implementation type "{kind}""#)]
fn fails_unknown_type(world: &DispatchWorld, kind: String) -> Result<(), eyre::Report> {
    let result = last_result(world)?;
    match result {
        Err(FunctionExecutionServiceError::Dispatch(
            DispatchError::UnknownImplementationType(tag),
        )) if *tag == kind => Ok(()),
        other => Err(eyre::eyre!("expected unknown type '{kind}', got {other:?}")),
    }
}
