//! Unit tests for agent registry orchestration.

mod support;
