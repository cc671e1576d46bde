//! Typed error taxonomy of the CPS platform
//!
//! Platform errors are identified by a four-digit code split into a domain
//! prefix (hundreds) and a postfix. [`create_error`] resolves a code to the
//! most specific [`Variant`] known, and [`classify`] turns a failed HTTP
//! exchange into a [`CpsError`].

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod classifier;
mod client_error;
mod code;
mod domain;
mod error;
mod factory;

pub use classifier::{
    ERROR_BODY_IS_NULL, ErrorBody, ResponseCategory, classify, classify_or_generic, classify_reader,
};
pub use client_error::ClientErrorVariant;
pub use code::{ErrorCode, decompose};
pub use domain::*;
pub use error::{BoxError, CpsError, DEFAULT_HTTP_STATUS, ErrorKind, is_recognized_http_status};
pub use factory::create_error;
