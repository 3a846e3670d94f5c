mod charts;
mod classifier;
mod color;
mod config;
mod data;
mod error;
mod page;
mod server;
mod state;
mod table;

use clap::Parser;

use config::{Cli, DashConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let config = DashConfig::from_cli(&cli)?;
    log::debug!("Configuration: {config:?}");

    server::serve(config).await.inspect_err(|e| log::error!("{e:#}"))
}
