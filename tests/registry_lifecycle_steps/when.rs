//! When steps for registry lifecycle scenarios.

use super::world::{RegistryWorld, agent_name, run_async, sdk_config};
use futures::StreamExt;
use maestro::message::domain::Message;
use mockable::DefaultClock;
use rstest_bdd_macros::when;

#[when(r#""{name}" is asked "{prompt}""#)]
fn agent_is_asked(world: &mut RegistryWorld, name: String, prompt: String) -> Result<(), eyre::Report> {
    let agent = world
        .registry
        .get(&agent_name(&name)?)
        .map_err(|err| eyre::eyre!("lookup failed: {err}"))?;
    let message = Message::builder("human")
        .to(name.as_str())
        .with_content(prompt)
        .build(&DefaultClock)
        .map_err(|err| eyre::eyre!("invalid message: {err}"))?;
    let results: Vec<_> = run_async(agent.handle_message(message).collect());
    world.replies = results
        .into_iter()
        .collect::<Result<_, _>>()
        .map_err(|err| eyre::eyre!("message failed: {err}"))?;
    Ok(())
}

#[when(r#"another agent named "{name}" is spawned"#)]
fn another_agent_spawned(world: &mut RegistryWorld, name: String) -> Result<(), eyre::Report> {
    let config = sdk_config(&name)?;
    world.last_spawn = Some(run_async(world.registry.spawn(&config)));
    Ok(())
}

#[when("all agents are shut down")]
fn all_agents_shut_down(world: &mut RegistryWorld) {
    world.last_report = Some(run_async(world.registry.shutdown_all()));
}
