//! TwixT relay server binary.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use twixt_server::cli::{Cli, Command};
use twixt_server::{Registry, ServerConfig, router, spawn_idle_sweeper};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            config,
            host,
            port,
            turn_timeout,
            trust_client_state,
        } => {
            let config = ServerConfig::load(config.as_deref())?.with_overrides(
                host,
                port,
                turn_timeout,
                trust_client_state,
            )?;
            run_server(config).await
        }
        Command::Config { config } => print_config(config),
    }
}

fn print_config(path: Option<PathBuf>) -> Result<()> {
    let config = ServerConfig::load(path.as_deref())?;
    print!("{}", toml::to_string(&config)?);
    Ok(())
}

/// Run the WebSocket relay server
async fn run_server(config: ServerConfig) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_filter())),
        )
        .init();

    let registry = Registry::new(*config.trust_client_state());
    if let Some(timeout) = config.turn_timeout() {
        spawn_idle_sweeper(registry.clone(), timeout, config.sweep_interval());
    }

    let app = router(registry);
    let listener = tokio::net::TcpListener::bind((config.host().as_str(), *config.port())).await?;
    info!("Server ready at ws://{}:{}/ws", config.host(), config.port());

    axum::serve(listener, app).await?;
    Ok(())
}
