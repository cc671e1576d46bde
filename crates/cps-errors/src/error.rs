use std::fmt;

use crate::client_error::ClientErrorVariant;
use crate::code::ErrorCode;
use crate::domain::{Domain, PREFIX_BASE, Variant};

/// Boxed underlying cause
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Status every error carries until the classifier stamps the real one
pub const DEFAULT_HTTP_STATUS: u16 = 400;

/// Which domain/variant pair an error resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Domain-level fallback for a code with no registered variant
    Generic(Domain),
    /// Registered variant
    Variant(Variant),
    /// HTTP request fault pinned to a status code
    Client(ClientErrorVariant),
}

impl ErrorKind {
    /// Owning domain
    pub const fn domain(self) -> Domain {
        match self {
            Self::Generic(domain) => domain,
            Self::Variant(variant) => variant.domain(),
            Self::Client(_) => Domain::Base,
        }
    }

    /// Canonical code for this kind
    pub const fn expected_error_code(self) -> i32 {
        match self {
            Self::Generic(domain) => domain.expected_error_code(),
            Self::Variant(variant) => variant.expected_error_code(),
            Self::Client(_) => ClientErrorVariant::expected_error_code(),
        }
    }

    /// Whether a server-reported `code` is compatible with this kind
    pub const fn is_error_code_allowed(self, code: i32) -> bool {
        match self {
            Self::Generic(domain) => domain.is_error_code_allowed(code),
            Self::Variant(variant) => variant.is_error_code_allowed(code),
            Self::Client(_) => Domain::Base.is_error_code_allowed(code),
        }
    }

    /// Message used when none was supplied
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::Generic(domain) => domain.generic_message(),
            Self::Variant(variant) => variant.default_message(),
            Self::Client(_) => Variant::ClientError.default_message(),
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generic(domain) => write!(f, "{domain} error"),
            Self::Variant(variant) => write!(f, "{variant}"),
            Self::Client(variant) => write!(f, "{variant}"),
        }
    }
}

/// Typed platform error
///
/// Immutable apart from the HTTP status, which the classifier stamps after
/// construction. `prefix + postfix` reconstructs the platform code as long
/// as the postfix stays below 100.
#[derive(Debug, thiserror::Error)]
#[error("{kind} ({prefix}+{postfix}): {message}")]
pub struct CpsError {
    kind: ErrorKind,
    message: String,
    prefix: i32,
    postfix: i32,
    http_status: u16,
    #[source]
    source: Option<BoxError>,
}

impl CpsError {
    fn new(kind: ErrorKind, message: Option<&str>, prefix: i32, postfix: i32) -> Self {
        let message = match message {
            Some(message) if !message.is_empty() => message.to_owned(),
            _ => kind.default_message().to_owned(),
        };

        Self {
            kind,
            message,
            prefix,
            postfix,
            http_status: DEFAULT_HTTP_STATUS,
            source: None,
        }
    }

    /// Error of a registered variant, falling back to its default message
    pub fn from_variant(variant: Variant, message: Option<&str>) -> Self {
        Self::new(
            ErrorKind::Variant(variant),
            message,
            variant.prefix(),
            variant.postfix(),
        )
    }

    /// Domain-level fallback that keeps the code it was created from
    pub fn generic(domain: Domain, code: ErrorCode, message: Option<&str>) -> Self {
        let (prefix, postfix) = code.decompose();
        Self::new(ErrorKind::Generic(domain), message, prefix, postfix)
    }

    /// HTTP request fault pinned to the variant's status
    pub fn client(variant: ClientErrorVariant, message: Option<&str>) -> Self {
        let mut error = Self::new(
            ErrorKind::Client(variant),
            message,
            PREFIX_BASE,
            Variant::ClientError.postfix(),
        );
        error.http_status = variant.status();
        error
    }

    /// Attach the underlying cause
    #[must_use]
    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Builder form of [`Self::set_http_status`]
    #[must_use]
    pub fn with_http_status(mut self, status: u16) -> Self {
        self.set_http_status(status);
        self
    }

    /// Record the transport status; unrecognized statuses are ignored
    pub fn set_http_status(&mut self, status: u16) {
        if is_recognized_http_status(status) {
            self.http_status = status;
        }
    }

    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub const fn domain(&self) -> Domain {
        self.kind.domain()
    }

    /// Resolved variant, if the error is not a generic or client fault
    pub const fn variant(&self) -> Option<Variant> {
        match self.kind {
            ErrorKind::Variant(variant) => Some(variant),
            _ => None,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn prefix(&self) -> i32 {
        self.prefix
    }

    pub const fn postfix(&self) -> i32 {
        self.postfix
    }

    /// `prefix + postfix`
    pub const fn error_code(&self) -> i32 {
        self.prefix.wrapping_add(self.postfix)
    }

    /// Transport status; client faults always report their pinned status
    pub const fn http_status(&self) -> u16 {
        match self.kind {
            ErrorKind::Client(variant) => variant.status(),
            _ => self.http_status,
        }
    }

    /// Whether this is exactly `variant`
    pub fn is(&self, variant: Variant) -> bool {
        self.kind == ErrorKind::Variant(variant)
    }
}

/// Statuses the platform may legitimately answer with
pub const fn is_recognized_http_status(status: u16) -> bool {
    matches!(
        status,
        100..=102
            | 200..=207
            | 226
            | 300..=307
            | 400..=417
            | 422..=426
            | 428
            | 429
            | 431
            | 444
            | 449
            | 451
            | 500..=511
            | 520..=526
    )
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn empty_message_falls_back_to_template() {
        let error = CpsError::from_variant(Variant::WeakPassword, Some(""));
        assert_eq!(
            error.message(),
            "Password is not strong enough, length 6 or more required"
        );
        let error = CpsError::from_variant(Variant::ImageTooBig, None);
        assert_eq!(error.message(), "Image too big");
    }

    #[test]
    fn generic_keeps_original_code() {
        let error = CpsError::generic(Domain::Authentication, ErrorCode::new(2177), None);
        assert_eq!(error.kind(), ErrorKind::Generic(Domain::Authentication));
        assert_eq!((error.prefix(), error.postfix()), (2100, 77));
        assert_eq!(error.message(), "authentication failed");
    }

    #[test]
    fn base_generic_keeps_empty_message() {
        let error = CpsError::generic(Domain::Base, ErrorCode::new(9999), None);
        assert_eq!(error.message(), "");
        assert_eq!(error.error_code(), 9999);
    }

    #[test]
    fn status_defaults_to_bad_request() {
        let error = CpsError::from_variant(Variant::MissingArgument, None);
        assert_eq!(error.http_status(), 400);
    }

    #[test]
    fn unrecognized_status_is_ignored() {
        let mut error = CpsError::from_variant(Variant::ResourceNotFound, None);
        error.set_http_status(404);
        assert_eq!(error.http_status(), 404);
        error.set_http_status(418);
        assert_eq!(error.http_status(), 404);
        error.set_http_status(599);
        assert_eq!(error.http_status(), 404);
    }

    #[test]
    fn client_faults_pin_their_status() {
        let error = CpsError::client(ClientErrorVariant::Conflict, Some("taken"))
            .with_http_status(500);
        assert_eq!(error.http_status(), 409);
        assert_eq!(error.error_code(), 1071);
        assert_eq!(error.kind().expected_error_code(), 1000);
        assert_eq!(error.message(), "taken");
    }

    #[test]
    fn client_fault_default_message() {
        let error = CpsError::client(ClientErrorVariant::Gone, None);
        assert_eq!(error.message(), "client error");
    }

    #[test]
    fn source_is_exposed() {
        let io = std::io::Error::other("socket closed");
        let error = CpsError::from_variant(Variant::Network, Some("lost")).with_source(io);
        let source = error.source().map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("socket closed"));
    }

    #[test]
    fn display_names_kind_and_code() {
        let error = CpsError::from_variant(Variant::EmailAlreadyTaken, Some("already taken"));
        assert_eq!(error.to_string(), "EmailAlreadyTaken (1100+3): already taken");
    }
}
