//! Given steps for registry lifecycle scenarios.

use super::world::{RegistryWorld, run_async, sdk_config};
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given(r#"an SDK agent named "{name}" is spawned"#)]
fn sdk_agent_spawned(world: &mut RegistryWorld, name: String) -> Result<(), eyre::Report> {
    let config = sdk_config(&name)?;
    run_async(world.registry.spawn(&config)).wrap_err("spawn agent for scenario")?;
    Ok(())
}
