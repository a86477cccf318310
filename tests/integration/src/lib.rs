//! Integration test utilities for the chat persistence stack
//!
//! This crate provides helpers for driving the service layer end to end
//! against a fresh in-memory database.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
