// Library exports for termfolio
// This allows the modules to be imported in tests and external code

pub mod cache;
pub mod citation;
pub mod commands;
pub mod config;
pub mod games;
pub mod server;
pub mod services;
pub mod shell;
pub mod tui;
