//! Work-time compliance CLI library.
//!
//! This crate provides the CLI interface over `clocker-core`.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, StatsArgs};
pub use config::Config;
