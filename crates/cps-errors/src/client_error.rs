use strum::{Display, EnumIter, IntoEnumIterator, IntoStaticStr};

use crate::domain::PREFIX_BASE;

/// HTTP-level request fault, keyed purely by status code
///
/// Each variant pins its own status regardless of what the transport
/// reported, so the status works as a classification key rather than a
/// measured value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
pub enum ClientErrorVariant {
    Unauthorized,
    PaymentRequired,
    MethodNotAllowed,
    NotAcceptable,
    ProxyAuthenticationRequired,
    RequestTimeout,
    Conflict,
    Gone,
    LengthRequired,
    PreconditionFailed,
    RequestEntityTooLarge,
    RequestUrlTooLarge,
    UnsupportedMediaType,
    RequestedRangeNotSatisfiable,
    ExpectationFailed,
    UnprocessableEntity,
    Locked,
    FailedDependency,
    UnorderedCollection,
    UpgradeRequired,
    PreconditionRequired,
    TooManyRequests,
    RequestHeaderFieldsTooLarge,
    NoResponse,
    RetryWith,
    UnavailableForLegalReasons,
}

impl ClientErrorVariant {
    /// Status code this variant stands for
    pub const fn status(self) -> u16 {
        match self {
            Self::Unauthorized => 401,
            Self::PaymentRequired => 402,
            Self::MethodNotAllowed => 405,
            Self::NotAcceptable => 406,
            Self::ProxyAuthenticationRequired => 407,
            Self::RequestTimeout => 408,
            Self::Conflict => 409,
            Self::Gone => 410,
            Self::LengthRequired => 411,
            Self::PreconditionFailed => 412,
            Self::RequestEntityTooLarge => 413,
            Self::RequestUrlTooLarge => 414,
            Self::UnsupportedMediaType => 415,
            Self::RequestedRangeNotSatisfiable => 416,
            Self::ExpectationFailed => 417,
            Self::UnprocessableEntity => 422,
            Self::Locked => 423,
            Self::FailedDependency => 424,
            Self::UnorderedCollection => 425,
            Self::UpgradeRequired => 426,
            Self::PreconditionRequired => 428,
            Self::TooManyRequests => 429,
            Self::RequestHeaderFieldsTooLarge => 431,
            Self::NoResponse => 444,
            Self::RetryWith => 449,
            Self::UnavailableForLegalReasons => 451,
        }
    }

    /// Variant pinned to exactly `status`
    pub fn from_status(status: u16) -> Option<Self> {
        Self::iter().find(|variant| variant.status() == status)
    }

    /// Whether `status` falls in the client-fault status ranges
    pub const fn is_status_allowed(status: u16) -> bool {
        matches!(status, 400..=417 | 422..=426 | 428 | 429 | 431 | 444 | 449 | 451)
    }

    /// Client errors share the base domain code
    pub const fn expected_error_code() -> i32 {
        PREFIX_BASE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_lookup_is_exact() {
        assert_eq!(
            ClientErrorVariant::from_status(405),
            Some(ClientErrorVariant::MethodNotAllowed)
        );
        assert_eq!(
            ClientErrorVariant::from_status(429),
            Some(ClientErrorVariant::TooManyRequests)
        );
        assert_eq!(ClientErrorVariant::from_status(400), None);
        assert_eq!(ClientErrorVariant::from_status(403), None);
        assert_eq!(ClientErrorVariant::from_status(418), None);
    }

    #[test]
    fn every_pinned_status_is_an_allowed_client_status() {
        for variant in ClientErrorVariant::iter() {
            assert!(ClientErrorVariant::is_status_allowed(variant.status()), "{variant}");
            assert_eq!(ClientErrorVariant::from_status(variant.status()), Some(variant));
        }
    }

    #[test]
    fn allowed_status_ranges() {
        assert!(ClientErrorVariant::is_status_allowed(400));
        assert!(ClientErrorVariant::is_status_allowed(417));
        assert!(!ClientErrorVariant::is_status_allowed(418));
        assert!(!ClientErrorVariant::is_status_allowed(427));
        assert!(ClientErrorVariant::is_status_allowed(451));
        assert!(!ClientErrorVariant::is_status_allowed(500));
    }
}
