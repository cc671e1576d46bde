use reqwest::Method;

use crate::client::CpsClient;
use crate::error::Result;
use crate::types::{AccessToken, AccessTokenData, Device, RegistrationCode};

impl CpsClient {
    /// Devices bound to the signed-in user
    ///
    /// # Errors
    ///
    /// Returns the classified platform error on failure
    pub async fn list_devices(&self) -> Result<Vec<Device>> {
        let builder = self.request(Method::GET, &["v0", "users", "current", "devices"])?;
        self.fetch(builder).await
    }

    /// # Errors
    ///
    /// Returns the classified platform error on failure
    pub async fn device(&self, device_id: &str) -> Result<Device> {
        let builder = self.request(Method::GET, &["v0", "devices", device_id])?;
        self.fetch(builder).await
    }

    /// Bind the device holding `code` to a user
    ///
    /// # Errors
    ///
    /// Returns the classified platform error, e.g. `RegistrationCodeNotExists`
    pub async fn add_device(&self, user_id: &str, code: &str) -> Result<Device> {
        let builder = self
            .request(Method::POST, &["v0", "users", user_id, "devices"])?
            .query(&[("code", code)]);
        self.fetch(builder).await
    }

    /// Bind a platform device entity to the physical device holding `code`
    ///
    /// # Errors
    ///
    /// Returns the classified platform error, e.g. `RegistrationCodeNotExists`
    pub async fn set_device_code(&self, device_id: &str, code: &str) -> Result<()> {
        let builder = self
            .request(Method::PUT, &["v0", "devices", device_id, "registration-code"])?
            .form(&[("code", code)]);
        self.execute(builder).await
    }

    /// Issue a registration code for a new device of this service
    ///
    /// # Errors
    ///
    /// Returns the classified platform error on failure
    pub async fn generate_registration_code(&self) -> Result<RegistrationCode> {
        let builder = self
            .request(Method::GET, &["v0", "devices", "registration", "code"])?
            .query(&[("service", self.service_id())]);
        self.fetch(builder).await
    }

    /// Trade a registration code for a device access token
    ///
    /// The token becomes the session of this client. Fails with
    /// `CodeNotYetAssigned` until a user has claimed the code.
    ///
    /// # Errors
    ///
    /// Returns the classified platform error on failure
    pub async fn exchange_registration_code(&self, registration: &RegistrationCode) -> Result<AccessToken> {
        let builder = self
            .request(Method::GET, &["v0", "devices", "registration", "credentials"])?
            .query(&[
                ("service", self.service_id()),
                ("code", registration.code.as_str()),
                ("secret", registration.secret.as_str()),
            ]);
        let data: AccessTokenData = self.fetch(builder).await?;

        self.set_token(Some(data.access_token.header.clone()));
        tracing::info!(device_id = data.access_token.owner_entity_id.as_deref(), "device registered");

        Ok(data.access_token)
    }

    /// # Errors
    ///
    /// Returns the classified platform error on failure
    pub async fn device_access_token(&self, device_id: &str) -> Result<AccessToken> {
        let builder = self.request(Method::GET, &["v0", "devices", device_id, "access-token"])?;
        let data: AccessTokenData = self.fetch(builder).await?;
        Ok(data.access_token)
    }

    /// Replace the device access token with a freshly issued one
    ///
    /// # Errors
    ///
    /// Returns the classified platform error on failure
    pub async fn refresh_device_access_token(&self, device_id: &str) -> Result<AccessToken> {
        let builder = self.request(Method::PUT, &["v0", "devices", device_id, "access-token"])?;
        let data: AccessTokenData = self.fetch(builder).await?;
        Ok(data.access_token)
    }

    /// # Errors
    ///
    /// Returns the classified platform error on failure
    pub async fn delete_device_access_token(&self, device_id: &str) -> Result<()> {
        let builder = self.request(Method::DELETE, &["v0", "devices", device_id, "access-token"])?;
        self.execute(builder).await
    }
}
