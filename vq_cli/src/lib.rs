//! Internal modules for the volleyball queue CLI.
//!
//! This library provides command parsing, configuration, persistence and
//! the command executor used by the vq_cli binary.

pub mod app;
pub mod commands;
pub mod config;
pub mod store;
