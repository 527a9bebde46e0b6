//! CLI subcommand implementations.

pub mod settings;
pub mod stats;
pub mod util;
pub mod validate;
