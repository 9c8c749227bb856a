use std::io::stdout;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use org2cal_cli::commands::{config, export, util};
use org2cal_cli::{Cli, Commands, Config, ConfigAction, StoredConfig};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so stdout carries only command output
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    match &cli.command {
        Some(Commands::Export(args)) => {
            let config = load_config(&cli)?;
            export::run(&mut stdout().lock(), &config, args, util::local_today())?;
        }
        Some(Commands::Config(ConfigAction::Show { json })) => {
            let config = load_config(&cli)?;
            config::show(&mut stdout().lock(), &config, *json)?;
        }
        Some(Commands::Config(ConfigAction::Set {
            source,
            output,
            timezone,
        })) => {
            let update = StoredConfig {
                source_path: source.clone(),
                output_path: output.clone(),
                timezone: timezone.clone(),
            };
            let path = config::set(cli.config.as_deref(), update)?;
            println!("Saved to: {}", path.display());
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

fn load_config(cli: &Cli) -> Result<Config> {
    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}
