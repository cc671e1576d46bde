use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// Stored credentials for a user account
///
/// Either a pre-issued session token or an email/password pair.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccountConfig {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<SecretString>,
    /// Session token issued by an earlier sign-in
    #[serde(default)]
    pub token: Option<SecretString>,
}

impl AccountConfig {
    /// Email and password when both are present and non-empty
    pub fn credentials(&self) -> Option<(&str, &SecretString)> {
        let email = self.email.as_deref().filter(|email| !email.is_empty())?;
        let password = self
            .password
            .as_ref()
            .filter(|password| !password.expose_secret().is_empty())?;
        Some((email, password))
    }

    /// Session token when present and non-empty
    pub fn token(&self) -> Option<&SecretString> {
        self.token
            .as_ref()
            .filter(|token| !token.expose_secret().is_empty())
    }

    /// Validate that some usable credential is configured
    ///
    /// # Errors
    ///
    /// Returns an error if neither a token nor a full email/password pair
    /// is present
    pub fn validate(&self) -> Result<(), String> {
        if self.token().is_none() && self.credentials().is_none() {
            return Err("account requires either a token or both email and password".to_owned());
        }
        Ok(())
    }
}
