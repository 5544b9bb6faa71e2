//! Multi-agent messaging through [`AgentRegistry`].

use crate::in_memory::helpers::{
    TestResult, ask, registry_over, runtime, sdk_config, task, transport,
};
use maestro::agent::{
    domain::{AgentConfig, AgentName, AgentState},
    services::{AgentFilter, RegistryError},
};
use maestro::message::domain::{BROADCAST, MessageKind};
use maestro::sdk::adapters::memory::{ScriptStep, ScriptedTransport};
use maestro::sdk::domain::{ContentBlock, SdkEvent};
use rstest::rstest;
use serde_json::json;
use std::io;
use tokio::runtime::Runtime;

/// Replies are broadcast from the agent and arrive in backend order.
#[rstest]
fn replies_are_broadcast_in_order(
    runtime: io::Result<Runtime>,
    transport: ScriptedTransport,
) -> TestResult {
    let rt = runtime?;
    let scripted = transport.with_turn(vec![
        ScriptStep::Event(SdkEvent::assistant(vec![
            ContentBlock::Text {
                text: "Reading the file".to_owned(),
            },
            ContentBlock::ToolUse {
                id: "tool_1".to_owned(),
                name: "Read".to_owned(),
                input: json!({"path": "src/lib.rs"}),
            },
        ])),
        ScriptStep::Event(SdkEvent::success("", "All done")),
    ]);
    let registry = registry_over(&scripted);
    rt.block_on(registry.spawn(&sdk_config("coder", false)?))?;
    let coder = registry.get(&AgentName::new("coder")?)?;

    let replies = rt
        .block_on(ask(coder.as_ref(), task("coder", "inspect lib.rs")?))
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    let kinds: Vec<Option<&str>> = replies
        .iter()
        .map(|reply| reply.metadata().get_str("sdk_type"))
        .collect();
    assert_eq!(kinds, [Some("assistant_text"), Some("tool_use"), Some("result")]);
    assert!(replies.iter().all(|reply| reply.sender() == "coder"));
    assert!(replies.iter().all(|reply| reply.recipients() == [BROADCAST]));
    let message_kinds: Vec<MessageKind> = replies.iter().map(|reply| reply.kind()).collect();
    assert_eq!(
        message_kinds,
        [MessageKind::Chat, MessageKind::System, MessageKind::Chat]
    );
    assert_eq!(coder.state(), AgentState::Idle);
    Ok(())
}

/// Two agents sharing one transport keep their conversations apart.
#[rstest]
fn agents_answer_independently(
    runtime: io::Result<Runtime>,
    transport: ScriptedTransport,
) -> TestResult {
    let rt = runtime?;
    let registry = registry_over(&transport);
    rt.block_on(registry.spawn(&sdk_config("planner", false)?))?;
    rt.block_on(registry.spawn(&sdk_config("coder", false)?))?;

    let planner = registry.get(&AgentName::new("planner")?)?;
    let coder = registry.get(&AgentName::new("coder")?)?;
    let plan_task = task("planner", "plan")?;
    let code_task = task("coder", "code")?;
    let (plan, code) = rt.block_on(async {
        tokio::join!(
            ask(planner.as_ref(), plan_task),
            ask(coder.as_ref(), code_task)
        )
    });

    let first = plan.first().cloned().transpose()?.map(|reply| reply.content().to_owned());
    let second = code.first().cloned().transpose()?.map(|reply| reply.content().to_owned());
    assert_eq!(first.as_deref(), Some("ack: plan"));
    assert_eq!(second.as_deref(), Some("ack: code"));
    assert_eq!(transport.queries(), 2);
    Ok(())
}

/// Unknown providers and duplicate names never disturb registered agents.
#[rstest]
fn spawn_failures_leave_registry_intact(
    runtime: io::Result<Runtime>,
    transport: ScriptedTransport,
) -> TestResult {
    let rt = runtime?;
    let registry = registry_over(&transport);
    rt.block_on(registry.spawn(&sdk_config("planner", false)?))?;

    let unknown = rt.block_on(registry.spawn(&AgentConfig::new(AgentName::new("x")?, "gemini")?));
    let duplicate = rt.block_on(registry.spawn(&sdk_config("planner", true)?));

    assert!(matches!(unknown, Err(RegistryError::UnknownProvider { .. })));
    assert!(matches!(duplicate, Err(RegistryError::AlreadyExists(_))));
    let names: Vec<String> = registry
        .list_agents(&AgentFilter::new())
        .into_iter()
        .map(|info| info.name.to_string())
        .collect();
    assert_eq!(names, ["planner"]);
    Ok(())
}

/// A failed backend call marks the agent failed until the next success.
#[rstest]
fn failure_then_recovery(runtime: io::Result<Runtime>) -> TestResult {
    let rt = runtime?;
    let transport = ScriptedTransport::new().with_turn(vec![ScriptStep::Fail(
        maestro::sdk::ports::TransportError::process("Command failed with exit code 2", Some(2)),
    )]);
    let registry = registry_over(&transport);
    rt.block_on(registry.spawn(&sdk_config("coder", false)?))?;
    let coder = registry.get(&AgentName::new("coder")?)?;

    let failed = rt.block_on(ask(coder.as_ref(), task("coder", "build")?));
    assert!(matches!(failed.last(), Some(Err(error)) if error.status_code() == Some(2)));
    assert_eq!(
        registry.list_agents(&AgentFilter::new().with_state(AgentState::Failed)).len(),
        1
    );

    let retried = rt.block_on(ask(coder.as_ref(), task("coder", "build")?));
    assert!(retried.iter().all(Result::is_ok));
    assert_eq!(coder.state(), AgentState::Idle);
    Ok(())
}
