use std::time::Duration;

use serde::Deserialize;
use url::Url;

/// Platform endpoint configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Root URL of the platform REST API
    pub base_url: Url,
    /// Service the client acts on behalf of
    pub service_id: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// `User-Agent` header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl ApiConfig {
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Validate endpoint settings
    ///
    /// # Errors
    ///
    /// Returns an error for non-HTTP base URLs, an empty service id or a
    /// zero timeout
    pub fn validate(&self) -> Result<(), String> {
        if !matches!(self.base_url.scheme(), "http" | "https") {
            return Err(format!(
                "api.base_url must use http or https, got `{}`",
                self.base_url.scheme()
            ));
        }

        if self.service_id.trim().is_empty() {
            return Err("api.service_id must not be empty".to_owned());
        }

        if self.timeout_seconds == 0 {
            return Err("api.timeout_seconds must be greater than 0".to_owned());
        }

        Ok(())
    }
}

const fn default_timeout_seconds() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("cps-sdk/", env!("CARGO_PKG_VERSION")).to_owned()
}
