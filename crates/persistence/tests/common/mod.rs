//! Shared fixtures for persistence integration tests.

#![allow(dead_code)]

pub mod fixtures;
pub mod server;

pub use fixtures::*;
pub use server::*;
