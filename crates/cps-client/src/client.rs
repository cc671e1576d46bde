use std::sync::{Arc, PoisonError, RwLock};

use cps_config::ApiConfig;
use cps_errors::{CpsError, ErrorBody, Variant, classify_or_generic};
use reqwest::Method;
use reqwest::header::AUTHORIZATION;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::{Url, form_urlencoded};

use crate::error::{ClientError, Result};
use crate::types::{Envelope, Role};

/// Async client for the CPS REST API
///
/// Clones share the session token, so signing in through one clone
/// authorizes all of them.
#[derive(Debug, Clone)]
pub struct CpsClient {
    http: reqwest::Client,
    base_url: Url,
    service_id: String,
    role: Role,
    session: Arc<RwLock<Option<SecretString>>>,
}

impl CpsClient {
    /// Create a client with default transport settings
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot carry a path or the HTTP
    /// client cannot be built
    pub fn new(base_url: Url, service_id: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder().build()?;
        Self::with_http(http, base_url, service_id.into())
    }

    /// Create a client from the `[api]` configuration section
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot carry a path or the HTTP
    /// client cannot be built
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()?;

        Self::with_http(http, config.base_url.clone(), config.service_id.clone())
    }

    fn with_http(http: reqwest::Client, base_url: Url, service_id: String) -> Result<Self> {
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Config(format!("base URL cannot carry a path: {base_url}")));
        }

        Ok(Self {
            http,
            base_url,
            service_id,
            role: Role::default(),
            session: Arc::new(RwLock::new(None)),
        })
    }

    /// Act as the given principal kind
    #[must_use]
    pub const fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Start with a previously issued session token
    #[must_use]
    pub fn with_token(self, token: SecretString) -> Self {
        self.set_token(Some(token));
        self
    }

    pub const fn role(&self) -> Role {
        self.role
    }

    pub fn service_id(&self) -> &str {
        &self.service_id
    }

    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Current session token
    pub fn token(&self) -> Option<SecretString> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether a non-empty session token is held
    pub fn is_authorized(&self) -> bool {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|token| !token.expose_secret().is_empty())
    }

    pub(crate) fn set_token(&self, token: Option<SecretString>) {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = token;
    }

    /// Fail locally unless the client acts as `expected`
    pub(crate) fn require_role(&self, expected: Role) -> Result<()> {
        if self.role == expected {
            return Ok(());
        }

        Err(CpsError::from_variant(
            Variant::WrongRole,
            Some(&format!("expected: {expected}, actual: {}", self.role)),
        )
        .into())
    }

    pub(crate) fn make_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::Config(format!("base URL cannot carry a path: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Build a request carrying the session token, if any
    pub(crate) fn request(&self, method: Method, segments: &[&str]) -> Result<reqwest::RequestBuilder> {
        let url = self.make_url(segments)?;
        Ok(self.request_url(method, url))
    }

    /// Build a ranged `GET` whose whole query string is `range` as JSON
    pub(crate) fn ranged_request<R: Serialize>(
        &self,
        segments: &[&str],
        range: &R,
    ) -> Result<reqwest::RequestBuilder> {
        let range = serde_json::to_string(range)?;
        let mut url = self.make_url(segments)?;
        url.set_query(Some(&form_urlencoded::byte_serialize(range.as_bytes()).collect::<String>()));
        Ok(self.request_url(Method::GET, url))
    }

    fn request_url(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        tracing::debug!(%method, %url, "sending request");

        let mut builder = self.http.request(method, url);
        if let Some(token) = self.token() {
            builder = builder.header(AUTHORIZATION, token.expose_secret());
        }

        builder
    }

    /// Send and unwrap the `data` member of the success envelope
    pub(crate) async fn fetch<T: DeserializeOwned>(&self, builder: reqwest::RequestBuilder) -> Result<T> {
        let response = handle_error(builder.send().await?).await?;
        let text = response.text().await?;

        let envelope: Envelope<T> = serde_json::from_str(&text)
            .map_err(|e| ClientError::Parse(format!("{e}; body: {text}")))?;

        Ok(envelope.data)
    }

    /// Send and discard the success body
    pub(crate) async fn execute(&self, builder: reqwest::RequestBuilder) -> Result<()> {
        handle_error(builder.send().await?).await?;
        Ok(())
    }
}

/// Turn a non-2xx response into a typed platform error
///
/// The body is read exactly once and handed to the classifier.
async fn handle_error(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = ErrorBody::from_result(Some(response.text().await));
    let error = classify_or_generic(status.as_u16(), body);

    tracing::warn!(
        status = status.as_u16(),
        code = error.error_code(),
        kind = %error.kind(),
        "request rejected"
    );

    Err(error.into())
}
