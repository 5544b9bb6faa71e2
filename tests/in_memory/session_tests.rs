//! Persistent session behaviour through [`AgentRegistry`].

use crate::in_memory::helpers::{TestResult, ask, registry_over, runtime, sdk_config, task, transport};
use maestro::agent::domain::{AgentName, AgentState};
use maestro::sdk::adapters::memory::ScriptedTransport;
use rstest::rstest;
use std::io;
use tokio::runtime::Runtime;

/// A session agent reuses one connection and one backend session id.
#[rstest]
fn session_spans_messages(runtime: io::Result<Runtime>, transport: ScriptedTransport) -> TestResult {
    let rt = runtime?;
    let registry = registry_over(&transport);
    rt.block_on(registry.spawn(&sdk_config("reviewer", true)?))?;
    let reviewer = registry.get(&AgentName::new("reviewer")?)?;

    let mut session_ids = Vec::new();
    for prompt in ["first", "second", "third"] {
        let replies = rt
            .block_on(ask(reviewer.as_ref(), task("reviewer", prompt)?))
            .into_iter()
            .collect::<Result<Vec<_>, _>>()?;
        let session_id = replies
            .last()
            .and_then(|reply| reply.metadata().get_str("session_id"))
            .map(str::to_owned);
        session_ids.push(session_id);
    }

    assert_eq!(transport.connects(), 1);
    assert_eq!(transport.prompts(), ["first", "second", "third"]);
    assert!(session_ids.iter().all(Option::is_some));
    assert!(session_ids.windows(2).all(|pair| pair[0] == pair[1]));
    Ok(())
}

/// Shutting down the registry closes open sessions and empties it.
#[rstest]
fn shutdown_all_closes_sessions(runtime: io::Result<Runtime>, transport: ScriptedTransport) -> TestResult {
    let rt = runtime?;
    let registry = registry_over(&transport);
    rt.block_on(registry.spawn(&sdk_config("reviewer", true)?))?;
    rt.block_on(registry.spawn(&sdk_config("planner", false)?))?;
    let reviewer = registry.get(&AgentName::new("reviewer")?)?;
    rt.block_on(ask(reviewer.as_ref(), task("reviewer", "open")?));

    let report = rt.block_on(registry.shutdown_all());

    assert!(report.all_succeeded());
    assert_eq!(report.len(), 2);
    assert_eq!(transport.disconnects(), 1);
    assert_eq!(reviewer.state(), AgentState::Terminated);
    assert!(!registry.has(&AgentName::new("reviewer")?));
    Ok(())
}
