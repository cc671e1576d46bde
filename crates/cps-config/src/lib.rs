#![allow(clippy::must_use_candidate)]

pub mod account;
pub mod api;
mod env;
mod loader;
pub mod telemetry;

use serde::Deserialize;

pub use account::AccountConfig;
pub use api::ApiConfig;
pub use env::ExpandError;
pub use telemetry::{LogFormat, TelemetryConfig};

/// Top-level CPS client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Platform endpoint configuration
    pub api: ApiConfig,
    /// Stored credentials
    #[serde(default)]
    pub account: Option<AccountConfig>,
    /// Logging configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}
