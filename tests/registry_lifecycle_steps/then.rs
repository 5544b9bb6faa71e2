//! Then steps for registry lifecycle scenarios.

use super::world::RegistryWorld;
use maestro::agent::services::{AgentFilter, RegistryError};
use rstest_bdd_macros::then;

#[then(r#"listing agents returns "{names}""#)]
fn listing_returns(world: &RegistryWorld, names: String) -> Result<(), eyre::Report> {
    let listed: Vec<String> = world
        .registry
        .list_agents(&AgentFilter::new())
        .into_iter()
        .map(|info| info.name.to_string())
        .collect();
    if listed.join(", ") != names {
        return Err(eyre::eyre!("expected agents [{names}], found {listed:?}"));
    }
    Ok(())
}

#[then(r#"a reply from "{sender}" reads "{content}""#)]
fn reply_reads(world: &RegistryWorld, sender: String, content: String) -> Result<(), eyre::Report> {
    let found = world
        .replies
        .iter()
        .any(|reply| reply.sender() == sender && reply.content() == content);
    if !found {
        return Err(eyre::eyre!(
            "expected a reply from '{sender}' reading '{content}', got {:?}",
            world.replies
        ));
    }
    Ok(())
}

#[then("the spawn fails because the name is taken")]
fn spawn_fails_name_taken(world: &RegistryWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_spawn
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing spawn result in scenario world"))?;
    if !matches!(result, Err(RegistryError::AlreadyExists(_))) {
        return Err(eyre::eyre!("expected a duplicate name error, got {result:?}"));
    }
    Ok(())
}

#[then("the shutdown report lists {count:usize} successful agents")]
fn report_lists_successes(world: &RegistryWorld, count: usize) -> Result<(), eyre::Report> {
    let report = world
        .last_report
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing shutdown report in scenario world"))?;
    let succeeded = report.succeeded().count();
    if succeeded != count || !report.all_succeeded() {
        return Err(eyre::eyre!("expected {count} clean shutdowns, got {report:?}"));
    }
    Ok(())
}

#[then("no agents are registered")]
fn no_agents_registered(world: &RegistryWorld) -> Result<(), eyre::Report> {
    let remaining = world.registry.list_agents(&AgentFilter::new());
    if !remaining.is_empty() {
        return Err(eyre::eyre!("expected an empty registry, found {remaining:?}"));
    }
    Ok(())
}
