use std::path::Path;

use anyhow::Context;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or [`Config::parse`]
    /// rejects its contents
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;

        let config = Self::parse(&raw)?;
        tracing::debug!(path = %path.display(), base_url = %config.api.base_url, "configuration loaded");

        Ok(config)
    }

    /// Expand `{{ env.VAR }}` placeholders, deserialize and validate
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, TOML parsing or validation fails
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let expanded = crate::env::expand_env(raw).context("config variable expansion failed")?;

        let config: Self = toml::from_str(&expanded).context("failed to parse config")?;
        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is usable
    ///
    /// # Errors
    ///
    /// Returns the first section that fails validation
    pub fn validate(&self) -> anyhow::Result<()> {
        self.api.validate().map_err(anyhow::Error::msg)?;

        if let Some(ref account) = self.account {
            account.validate().map_err(anyhow::Error::msg)?;
        }

        Ok(())
    }
}
