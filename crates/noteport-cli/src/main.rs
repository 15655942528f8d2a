use anyhow::{Context, Result};
use clap::Parser;
use noteport_config::ConfigLoader;
use tracing::debug;

use noteport_cli::{
    cli::{Cli, Commands},
    commands, logging,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config =
        ConfigLoader::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Err(err) = logging::init(cli.requested_level(), &config.logging.level) {
        eprintln!("Failed to install logger: {err}");
    }

    // Command-line flags are applied last
    if let Some(format) = cli.format {
        config.import.format = format.into();
    }
    debug!(format = config.import.format.as_str(), "configuration loaded");

    match cli.command {
        Commands::Scan {
            dir,
            name,
            out,
            schema_out,
        } => commands::scan::execute(&config, &dir, &name, out, schema_out).await?,

        Commands::Import {
            dir,
            schema,
            out,
            no_resolve,
        } => commands::import::execute(&config, &dir, &schema, out, no_resolve).await?,

        Commands::Parse { file } => commands::parse::execute(&config, &file).await?,
    }

    Ok(())
}
