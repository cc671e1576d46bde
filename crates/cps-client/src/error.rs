use cps_errors::{CpsError, Variant};

/// Client-specific result type
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors from the CPS client
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Platform rejected the request, or a local precondition failed
    #[error(transparent)]
    Cps(#[from] CpsError),

    /// Failed to encode a request body or query
    #[error("failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),

    /// Failed to parse a success response
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// Typed platform error, if this is one
    pub const fn cps(&self) -> Option<&CpsError> {
        match self {
            Self::Cps(error) => Some(error),
            _ => None,
        }
    }

    /// Whether this is a platform error of the given variant
    pub fn is(&self, variant: Variant) -> bool {
        self.cps().is_some_and(|error| error.is(variant))
    }
}
