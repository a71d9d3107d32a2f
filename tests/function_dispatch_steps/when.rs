//! When steps for function dispatch BDD scenarios.

use super::world::{DispatchWorld, run_async};
use rstest_bdd_macros::when;
use serde_json::Map;

#[when(r#"the function "{name}" is executed"#)]
fn execute_function(world: &mut DispatchWorld, name: String) {
    world.last_result = Some(run_async(world.execution.execute(&name, &Map::new())));
}
