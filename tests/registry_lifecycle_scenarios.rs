//! Behaviour tests for spawning, messaging and shutting down agents.

mod registry_lifecycle_steps;

use registry_lifecycle_steps::world::{RegistryWorld, world};
use rstest_bdd_macros::scenario;

#[scenario(
    path = "tests/features/registry_lifecycle.feature",
    name = "Spawn agents and talk to one of them"
)]
#[tokio::test(flavor = "multi_thread")]
async fn spawn_and_talk(world: RegistryWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/registry_lifecycle.feature",
    name = "Reject a duplicate agent name"
)]
#[tokio::test(flavor = "multi_thread")]
async fn reject_duplicate_name(world: RegistryWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/registry_lifecycle.feature",
    name = "Shut down every agent"
)]
#[tokio::test(flavor = "multi_thread")]
async fn shut_down_every_agent(world: RegistryWorld) {
    let _ = world;
}
