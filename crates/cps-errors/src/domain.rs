//! Error domains and the variants each of them owns
//!
//! The taxonomy is static: every domain owns one or two hundreds-prefixes and
//! a closed table of postfixes. Adding a variant means adding one enum entry
//! and one row in [`Variant::entry`].

use strum::{Display, EnumIter, IntoEnumIterator, IntoStaticStr};

use crate::code::ErrorCode;

pub const PREFIX_BASE: i32 = 1000;
pub const PREFIX_AUTHENTICATION: i32 = 1100;
pub const PREFIX_AUTHORIZATION: i32 = 1200;
pub const PREFIX_ONETIME_PASSWORD: i32 = 1300;
pub const PREFIX_AUTHENTICATION_EXTENDED: i32 = 2100;
pub const PREFIX_AUTHORIZATION_EXTENDED: i32 = 2200;
pub const PREFIX_DEVICE_REGISTRATION: i32 = 3000;
pub const PREFIX_IMAGE_PROCESSING: i32 = 3100;

/// Top-level error category sharing a hundreds-prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Domain {
    Base,
    Authentication,
    Authorization,
    OnetimePassword,
    DeviceRegistration,
    ImageProcessing,
}

impl Domain {
    /// Order in which domains are probed when resolving a prefix
    pub const DISPATCH_ORDER: [Self; 6] = [
        Self::Base,
        Self::Authentication,
        Self::Authorization,
        Self::OnetimePassword,
        Self::DeviceRegistration,
        Self::ImageProcessing,
    ];

    /// Primary prefix of the domain
    pub const fn canonical_prefix(self) -> i32 {
        match self {
            Self::Base => PREFIX_BASE,
            Self::Authentication => PREFIX_AUTHENTICATION,
            Self::Authorization => PREFIX_AUTHORIZATION,
            Self::OnetimePassword => PREFIX_ONETIME_PASSWORD,
            Self::DeviceRegistration => PREFIX_DEVICE_REGISTRATION,
            Self::ImageProcessing => PREFIX_IMAGE_PROCESSING,
        }
    }

    /// Secondary prefix for project-specific codes, if the domain has one
    pub const fn extended_prefix(self) -> Option<i32> {
        match self {
            Self::Authentication => Some(PREFIX_AUTHENTICATION_EXTENDED),
            Self::Authorization => Some(PREFIX_AUTHORIZATION_EXTENDED),
            _ => None,
        }
    }

    /// Whether `prefix` routes to this domain
    pub const fn owns(self, prefix: i32) -> bool {
        if prefix == self.canonical_prefix() {
            return true;
        }
        match self.extended_prefix() {
            Some(extended) => prefix == extended,
            None => false,
        }
    }

    /// First domain in dispatch order that owns `prefix`
    pub fn for_prefix(prefix: i32) -> Option<Self> {
        Self::DISPATCH_ORDER.into_iter().find(|domain| domain.owns(prefix))
    }

    /// Concrete variant registered under `prefix` + `postfix` in this domain
    ///
    /// Only variants that the platform reports by code take part; transport
    /// level variants such as [`Variant::Network`] are never resolved here.
    pub fn variant_for(self, prefix: i32, postfix: i32) -> Option<Variant> {
        if !self.owns(prefix) {
            return None;
        }
        Variant::iter().find(|variant| {
            variant.is_code_dispatched()
                && variant.domain() == self
                && variant.prefix() == prefix
                && variant.postfix() == postfix
        })
    }

    /// Message used by the domain-level fallback when none was supplied
    pub const fn generic_message(self) -> &'static str {
        match self {
            Self::Base => "",
            Self::Authentication => "authentication failed",
            Self::Authorization => "authorization failed",
            Self::OnetimePassword => "onetime password error",
            Self::DeviceRegistration => "device registration failed",
            Self::ImageProcessing => "image processing failed",
        }
    }

    /// Code a caller should expect for the domain-level error
    pub const fn expected_error_code(self) -> i32 {
        self.canonical_prefix()
    }

    /// Whether `code` may belong to this domain
    ///
    /// The base domain accepts any four-digit code, the others check the
    /// rounded prefix against the prefixes they own.
    pub const fn is_error_code_allowed(self, code: i32) -> bool {
        let code = ErrorCode::new(code);
        match self {
            Self::Base => code.is_four_digit(),
            _ => self.owns(code.prefix()),
        }
    }
}

/// Concrete, named error condition within a domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
pub enum Variant {
    // base
    ResourceNotFound,
    ObjectNotFound,
    MalformedObjectId,
    ObjectAlreadyExists,
    BadRequest,
    UnexpectedInternalServerError,
    UnforeseenConsequences,
    MissingArgument,
    MalformedJson,
    JsonValidationFailed,
    ServiceDowntime,
    ServiceUnavailable,
    Network,
    ClientError,

    // authentication
    InvalidEmail,
    WeakPassword,
    EmailAlreadyTaken,
    InvalidEmailOrPassword,
    PasswordMismatch,
    EmailNotFound,
    EmailNotConfirmed,
    AccessDeniedByUser,
    TokenNotVerified,
    RetrieveDataError,
    WrongRole,
    NoSuchAuthenticationMethod,
    AuthenticationMethodAlreadyExists,
    AuthenticationAlreadyTaken,

    // authorization
    AuthenticationRequired,
    AuthenticationFailed,
    Forbidden,
    NotAServiceNumber,

    // onetime password
    InvalidOnetimePassword,
    InvalidOnetimeToken,

    // device registration
    RegistrationCodeNotExists,
    BadRegistrationExtraSecret,
    CodeNotYetAssigned,
    CodeAlreadyTaken,

    // image processing
    ImageNotFound,
    ImageTooBig,
}

impl Variant {
    /// Table row: owning domain, prefix, postfix and default message
    const fn entry(self) -> (Domain, i32, i32, &'static str) {
        use Domain::{
            Authentication, Authorization, Base, DeviceRegistration, ImageProcessing,
            OnetimePassword,
        };

        match self {
            Self::ResourceNotFound => (Base, PREFIX_BASE, 1, "Resource or page not found"),
            Self::ObjectNotFound => (Base, PREFIX_BASE, 2, "Unknown {} {}"),
            Self::MalformedObjectId => (Base, PREFIX_BASE, 3, "Malformed {} identifier {}"),
            Self::ObjectAlreadyExists => (Base, PREFIX_BASE, 4, "{} {} already exists"),
            Self::BadRequest => (Base, PREFIX_BASE, 5, "Bad request"),
            Self::UnexpectedInternalServerError => {
                (Base, PREFIX_BASE, 6, "Unexpected internal server error")
            }
            Self::UnforeseenConsequences => (
                Base,
                PREFIX_BASE,
                7,
                "Server cannot perform request because of unforeseen consequences",
            ),
            Self::MissingArgument => (Base, PREFIX_BASE, 8, "Missing required argument"),
            Self::MalformedJson => (Base, PREFIX_BASE, 9, "Malformed json: {}"),
            Self::JsonValidationFailed => {
                (Base, PREFIX_BASE, 10, "Json content validation failed: {}")
            }
            Self::ServiceDowntime => (Base, PREFIX_BASE, 11, "Service unavailable, downtime until {}"),
            Self::ServiceUnavailable => (Base, PREFIX_BASE, 12, "Service unavailable"),
            Self::Network => (Base, PREFIX_BASE, 70, "no network"),
            Self::ClientError => (Base, PREFIX_BASE, 71, "client error"),

            Self::InvalidEmail => (Authentication, PREFIX_AUTHENTICATION, 1, "Invalid format of email {}"),
            Self::WeakPassword => (
                Authentication,
                PREFIX_AUTHENTICATION,
                2,
                "Password is not strong enough, length 6 or more required",
            ),
            Self::EmailAlreadyTaken => (Authentication, PREFIX_AUTHENTICATION, 3, "Email {} already taken"),
            Self::InvalidEmailOrPassword => {
                (Authentication, PREFIX_AUTHENTICATION, 4, "Invalid email or password")
            }
            Self::PasswordMismatch => (Authentication, PREFIX_AUTHENTICATION, 6, "Password mismatch"),
            Self::EmailNotFound => (
                Authentication,
                PREFIX_AUTHENTICATION,
                7,
                "Email {} is not registered in service",
            ),
            Self::EmailNotConfirmed => (
                Authentication,
                PREFIX_AUTHENTICATION,
                8,
                "User should confirm his {} email to perform operation",
            ),
            Self::AccessDeniedByUser => {
                (Authentication, PREFIX_AUTHENTICATION, 31, "OAuth2 access denied by user")
            }
            Self::TokenNotVerified => {
                (Authentication, PREFIX_AUTHENTICATION, 32, "OAuth2 token is not verified: {}")
            }
            Self::RetrieveDataError => {
                (Authentication, PREFIX_AUTHENTICATION, 33, "Cannot retrieve {} via OAuth2: {}")
            }
            Self::WrongRole => (Authentication, PREFIX_AUTHENTICATION, 51, "wrong role"),
            Self::NoSuchAuthenticationMethod => (
                Authentication,
                PREFIX_AUTHENTICATION_EXTENDED,
                1,
                "User does not set up {} authentication method",
            ),
            Self::AuthenticationMethodAlreadyExists => (
                Authentication,
                PREFIX_AUTHENTICATION_EXTENDED,
                2,
                "User already set up {} authentication method",
            ),
            Self::AuthenticationAlreadyTaken => (
                Authentication,
                PREFIX_AUTHENTICATION_EXTENDED,
                3,
                "Authentication via {} already bound to different user",
            ),

            Self::AuthenticationRequired => (
                Authorization,
                PREFIX_AUTHORIZATION,
                1,
                "Authentication required to perform request",
            ),
            Self::AuthenticationFailed => (Authorization, PREFIX_AUTHORIZATION, 2, "Authentication failed: {}"),
            Self::Forbidden => (Authorization, PREFIX_AUTHORIZATION, 3, "Not authorized to perform request"),
            Self::NotAServiceNumber => (
                Authorization,
                PREFIX_AUTHORIZATION_EXTENDED,
                1,
                "User has to be a member of specified service to complete authentication",
            ),

            Self::InvalidOnetimePassword => (
                OnetimePassword,
                PREFIX_ONETIME_PASSWORD,
                1,
                "Invalid, expired or already redeemed onetime password",
            ),
            Self::InvalidOnetimeToken => (
                OnetimePassword,
                PREFIX_ONETIME_PASSWORD,
                2,
                "{} token expired, invalid or already redeemed",
            ),

            Self::RegistrationCodeNotExists => (
                DeviceRegistration,
                PREFIX_DEVICE_REGISTRATION,
                1,
                "This registration code does not exists",
            ),
            Self::BadRegistrationExtraSecret => (
                DeviceRegistration,
                PREFIX_DEVICE_REGISTRATION,
                2,
                "Supplied secret field does not match with real secret",
            ),
            Self::CodeNotYetAssigned => (
                DeviceRegistration,
                PREFIX_DEVICE_REGISTRATION,
                3,
                "Device not yet assigned to this registration code",
            ),
            Self::CodeAlreadyTaken => (
                DeviceRegistration,
                PREFIX_DEVICE_REGISTRATION,
                4,
                "This code already taken by other device",
            ),

            Self::ImageNotFound => (ImageProcessing, PREFIX_IMAGE_PROCESSING, 0, "Image not found"),
            Self::ImageTooBig => (ImageProcessing, PREFIX_IMAGE_PROCESSING, 1, "Image too big"),
        }
    }

    /// Domain this variant belongs to
    pub const fn domain(self) -> Domain {
        self.entry().0
    }

    /// Prefix the variant is registered under
    pub const fn prefix(self) -> i32 {
        self.entry().1
    }

    /// Postfix identifying the variant inside its domain
    pub const fn postfix(self) -> i32 {
        self.entry().2
    }

    /// Message template used when the platform supplied none
    pub const fn default_message(self) -> &'static str {
        self.entry().3
    }

    /// Canonical `prefix + postfix` code of this exact variant
    pub const fn expected_error_code(self) -> i32 {
        self.prefix() + self.postfix()
    }

    /// Whether `code` identifies exactly this variant
    pub const fn is_error_code_allowed(self, code: i32) -> bool {
        code == self.expected_error_code()
    }

    /// Whether the factory resolves this variant from a platform code
    ///
    /// Network and client errors are produced from the HTTP status alone.
    /// A wrong role is only raised locally by the client.
    pub const fn is_code_dispatched(self) -> bool {
        !matches!(self, Self::Network | Self::ClientError | Self::WrongRole)
    }
}
