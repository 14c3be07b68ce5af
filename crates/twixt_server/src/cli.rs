//! Command-line interface for the twixt server.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// TwixT - turn relay server for two-player TwixT games
#[derive(Parser, Debug)]
#[command(name = "twixt")]
#[command(about = "Session registry and turn relay for TwixT", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the WebSocket relay server
    Serve {
        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,

        /// Forfeit a game after its turn-holder idles this many seconds
        #[arg(long, value_name = "SECS")]
        turn_timeout: Option<u64>,

        /// Adopt peer-computed snapshots instead of recomputing moves
        #[arg(long)]
        trust_client_state: bool,
    },

    /// Print the effective configuration as TOML
    Config {
        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}
