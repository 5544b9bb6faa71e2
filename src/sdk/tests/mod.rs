//! Unit tests for SDK agent execution strategies.
