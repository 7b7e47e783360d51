//! Integration tests for termfolio
//!
//! These drive the shell and the HTTP API through the public library
//! surface, with external services faked by wiremock.

// Test utilities and common setup
mod common;

mod server_tests;
mod shell_tests;

// Re-export common utilities for use by test modules
pub use common::*;
