use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};

use crate::client::CpsClient;
use crate::error::Result;
use crate::types::{AuthData, Role, Session};

impl CpsClient {
    /// Sign in with email and password and keep the issued session token
    ///
    /// POST `/v0/auth/native/sign-in`
    ///
    /// # Errors
    ///
    /// Fails with `WrongRole` when acting as a device, or with the
    /// classified platform error when the credentials are rejected
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<Session> {
        self.require_role(Role::User)?;

        let form = [
            ("email", email),
            ("password", password.expose_secret()),
            ("set_cookie", "true"),
            ("service", self.service_id()),
        ];

        let builder = self
            .request(Method::POST, &["v0", "auth", "native", "sign-in"])?
            .form(&form);
        let auth: AuthData = self.fetch(builder).await?;

        let token = SecretString::from(auth.header);
        self.set_token(Some(token.clone()));
        tracing::info!(user_id = auth.owner_entity_id.as_deref(), "signed in");

        Ok(Session {
            token,
            user_id: auth.owner_entity_id,
        })
    }

    /// Register a new account
    ///
    /// POST `/v0/auth/native/registration`
    ///
    /// # Errors
    ///
    /// Fails with `WrongRole` when acting as a device, or with the
    /// classified platform error such as `EmailAlreadyTaken`
    pub async fn register(&self, email: &str, password: &SecretString) -> Result<()> {
        self.require_role(Role::User)?;

        let form = [
            ("email", email),
            ("password", password.expose_secret()),
            ("service", self.service_id()),
        ];

        let builder = self
            .request(Method::POST, &["v0", "auth", "native", "registration"])?
            .form(&form);
        self.execute(builder).await
    }

    /// End the current session
    ///
    /// Without a session this only clears local state.
    ///
    /// # Errors
    ///
    /// Fails with `WrongRole` when acting as a device, or with the
    /// classified platform error
    pub async fn logout(&self) -> Result<()> {
        self.require_role(Role::User)?;

        if !self.is_authorized() {
            self.set_token(None);
            return Ok(());
        }

        let builder = self.request(Method::POST, &["v0", "auth", "logout"])?;
        self.execute(builder).await?;
        self.set_token(None);

        Ok(())
    }

    /// Ask the platform to send a password recovery email
    ///
    /// PUT `/v0/auth/recovery`
    ///
    /// # Errors
    ///
    /// Fails with `WrongRole` when acting as a device, or with the
    /// classified platform error such as `EmailNotFound`
    pub async fn recover_password(&self, email: &str) -> Result<()> {
        self.require_role(Role::User)?;

        let form = [("email", email), ("service", self.service_id())];
        let builder = self
            .request(Method::PUT, &["v0", "auth", "recovery"])?
            .form(&form);
        self.execute(builder).await
    }
}
