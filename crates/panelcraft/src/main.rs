//! Panelcraft command-line entry point.

mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use panelcraft::PanelcraftConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Generate(args) => {
            let config = PanelcraftConfig::load(cli.config.as_deref())?;
            cli::run_generate(config, args).await
        }
        Commands::Genres => {
            cli::list_genres();
            Ok(())
        }
    }
}
