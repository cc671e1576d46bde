use crate::code::ErrorCode;
use crate::domain::Domain;
use crate::error::{BoxError, CpsError};

/// Build the most specific error for a platform code
///
/// The code is split into prefix and postfix; the prefix selects a domain
/// and the postfix a variant inside it. A domain match without a variant
/// yields that domain's generic error, and an unknown prefix yields the
/// base generic error. Both fallbacks keep the original prefix/postfix.
/// Never fails.
pub fn create_error(message: Option<&str>, code: i32, cause: Option<BoxError>) -> CpsError {
    let code = ErrorCode::new(code);
    let (prefix, postfix) = code.decompose();

    let error = match Domain::for_prefix(prefix) {
        Some(domain) => match domain.variant_for(prefix, postfix) {
            Some(variant) => CpsError::from_variant(variant, message),
            None => CpsError::generic(domain, code, message),
        },
        None => CpsError::generic(Domain::Base, code, message),
    };

    match cause {
        Some(cause) => error.with_source(cause),
        None => error,
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use strum::IntoEnumIterator;

    use super::*;
    use crate::domain::Variant;
    use crate::error::ErrorKind;

    #[test]
    fn every_dispatched_variant_round_trips() {
        for variant in Variant::iter().filter(|v| v.is_code_dispatched()) {
            let code = variant.expected_error_code();
            let error = create_error(None, code, None);
            assert_eq!(error.kind(), ErrorKind::Variant(variant), "code {code}");
            assert_eq!(error.prefix() + error.postfix(), code);
            assert_eq!(error.message(), variant.default_message());
        }
    }

    #[test]
    fn supplied_message_wins() {
        let error = create_error(Some("already taken"), 1103, None);
        assert!(error.is(Variant::EmailAlreadyTaken));
        assert_eq!(error.message(), "already taken");
    }

    #[test]
    fn extended_authentication_prefix() {
        let error = create_error(Some("google"), 2103, None);
        assert!(error.is(Variant::AuthenticationAlreadyTaken));
        assert_eq!(error.domain(), Domain::Authentication);
        assert_eq!(error.kind().expected_error_code(), 2103);
    }

    #[test]
    fn extended_authorization_prefix() {
        let error = create_error(None, 2201, None);
        assert!(error.is(Variant::NotAServiceNumber));
        assert_eq!(error.domain(), Domain::Authorization);
    }

    #[test]
    fn unknown_postfix_gives_domain_generic_with_original_code() {
        let error = create_error(Some("odd"), 1199, None);
        assert_eq!(error.kind(), ErrorKind::Generic(Domain::Authentication));
        assert_eq!((error.prefix(), error.postfix()), (1100, 99));
        assert_eq!(error.message(), "odd");

        let error = create_error(None, 2299, None);
        assert_eq!(error.kind(), ErrorKind::Generic(Domain::Authorization));
        assert_eq!((error.prefix(), error.postfix()), (2200, 99));
        assert_eq!(error.message(), "authorization failed");

        let error = create_error(None, 3105, None);
        assert_eq!(error.kind(), ErrorKind::Generic(Domain::ImageProcessing));
    }

    #[test]
    fn unknown_postfix_in_base_gives_base_generic() {
        let error = create_error(Some("x"), 1050, None);
        assert_eq!(error.kind(), ErrorKind::Generic(Domain::Base));
        assert_eq!((error.prefix(), error.postfix()), (1000, 50));
    }

    #[test]
    fn unknown_prefix_gives_base_generic() {
        for code in [4001, 9999, 0, -5, 123_456] {
            let error = create_error(Some("?"), code, None);
            assert_eq!(error.kind(), ErrorKind::Generic(Domain::Base), "code {code}");
            assert_eq!(error.prefix() + error.postfix(), code);
        }
    }

    #[test]
    fn network_code_is_not_dispatched() {
        let error = create_error(None, 1070, None);
        assert_eq!(error.kind(), ErrorKind::Generic(Domain::Base));
        assert_eq!(error.error_code(), 1070);
    }

    #[test]
    fn wrong_role_code_falls_back_to_authentication_generic() {
        let error = create_error(Some("x"), 1151, None);
        assert_eq!(error.kind(), ErrorKind::Generic(Domain::Authentication));
        assert_eq!((error.prefix(), error.postfix()), (1100, 51));
        assert_eq!(error.message(), "x");
    }

    #[test]
    fn only_status_and_local_variants_skip_dispatch() {
        let skipped: Vec<_> = Variant::iter().filter(|v| !v.is_code_dispatched()).collect();
        assert_eq!(skipped, [Variant::Network, Variant::ClientError, Variant::WrongRole]);
    }

    #[test]
    fn cause_is_attached() {
        let cause: BoxError = "upstream".into();
        let error = create_error(None, 3001, Some(cause));
        assert!(error.is(Variant::RegistrationCodeNotExists));
        assert_eq!(error.source().map(ToString::to_string).as_deref(), Some("upstream"));
    }
}
