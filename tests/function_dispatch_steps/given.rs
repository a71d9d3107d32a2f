//! Given steps for function dispatch BDD scenarios.

use super::world::{DispatchWorld, code_request, run_async};
use ai_factory::function::services::FunctionRequest;
use eyre::WrapErr;
use rstest_bdd_macros::given;

fn register(world: &mut DispatchWorld, request: FunctionRequest) -> Result<(), eyre::Report> {
    let created = run_async(world.registry.create(request)).wrap_err("register function")?;
    world.last_created = Some(created);
    Ok(())
}

#[given(r#"an active dynamic code function named "{name}""#)]
fn active_code_function(world: &mut DispatchWorld, name: String) -> Result<(), eyre::Report> {
    register(world, code_request(&name))
}

#[given(r#"an inactive dynamic code function named "{name}""#)]
fn inactive_code_function(world: &mut DispatchWorld, name: String) -> Result<(), eyre::Report> {
    register(world, code_request(&name).with_active(false))
}

#[given(r#"a function named "{name}" with malformed configuration"#)]
fn malformed_function(world: &mut DispatchWorld, name: String) -> Result<(), eyre::Report> {
    // Well-formed JSON that does not fit the dynamic_code shape.
    register(
        world,
        FunctionRequest::new(name, "dynamic_code", r#"{"code": ["not", "text"]}"#),
    )
}

#[given(r#"a function named "{name}" with implementation type "{kind}""#)]
fn typed_function(
    world: &mut DispatchWorld,
    name: String,
    kind: String,
) -> Result<(), eyre::Report> {
    register(world, FunctionRequest::new(name, kind, "{}"))
}
