//! quill binary

mod cli;

use clap::Parser;
use cli::Cli;
use quill_config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match cli.config_dir.as_deref() {
        Some(dir) => AppConfig::load_from(dir)?,
        None => AppConfig::load()?,
    };

    quill_config::logging::initialize(&config);
    tracing::debug!(command = ?cli.command, "Starting quill");

    cli::run(cli.command, &config).await
}
