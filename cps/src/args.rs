use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// CPS platform client
#[derive(Debug, Parser)]
#[command(name = "cps", about = "Command-line client for the CPS IoT platform")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "cps.toml", env = "CPS_CONFIG", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve a numeric platform error code to its domain and variant
    Explain {
        #[arg(allow_negative_numbers = true)]
        code: i32,
    },
    /// Show which error a failed HTTP response would produce
    Classify {
        /// HTTP status of the response
        #[arg(long)]
        status: u16,
        /// Raw response body; omit for a response without body
        #[arg(long)]
        body: Option<String>,
    },
    /// Sign in with the configured account
    Login,
    /// List devices of the configured account
    Devices,
}

impl Command {
    /// Whether the command talks to the platform and needs a config file
    pub const fn needs_config(&self) -> bool {
        matches!(self, Self::Login | Self::Devices)
    }
}
