use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use clocker_cli::commands::{settings, stats, validate};
use clocker_cli::{Cli, Commands, Config};

/// Load config and reject inconsistent compliance rules before any evaluation.
fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    config
        .compliance
        .validate()
        .context("invalid compliance settings")?;
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let mut stdout = std::io::stdout().lock();

    match &cli.command {
        Some(Commands::Validate { file }) => {
            // Segment rules do not depend on configuration
            let summary = validate::run(&mut stdout, file)?;
            if summary.invalid > 0 {
                anyhow::bail!(
                    "{} of {} entries in {} are invalid",
                    summary.invalid,
                    summary.valid + summary.invalid,
                    file.display()
                );
            }
        }
        Some(Commands::Stats(args)) => {
            let config = load_config(cli.config.as_deref())?;
            stats::run(&mut stdout, args, &config)?;
        }
        Some(Commands::Config) => {
            let config = load_config(cli.config.as_deref())?;
            settings::run(&mut stdout, &config)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
