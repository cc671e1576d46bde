//! Translation of failed HTTP exchanges into typed platform errors
//!
//! The status code picks a broad category. Only `400 Bad Request` carries a
//! platform code, embedded in a JSON body of the shape
//! `{"code": 1103, "data": {"email": "already taken"}}`; every other
//! category uses the body text verbatim as the message.

use std::fmt;
use std::io::Read;

use serde_json::Value;
use strum::Display;

use crate::client_error::ClientErrorVariant;
use crate::code::ErrorCode;
use crate::domain::{Domain, Variant};
use crate::error::CpsError;
use crate::factory::create_error;

/// Message used when the response carried no body at all
pub const ERROR_BODY_IS_NULL: &str = "Error body is null";

/// Broad category selected from the HTTP status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ResponseCategory {
    /// The platform failed internally
    ServerFault,
    /// Gateway or network path between client and platform failed
    NetworkFault,
    /// The request itself was rejected on HTTP grounds
    ClientRequestFault,
    NotFound,
    Forbidden,
    /// `400` with a platform-assigned error code in the body
    PlatformCoded,
}

impl ResponseCategory {
    /// Category for `status`, or `None` when the status is not handled
    pub const fn of(status: u16) -> Option<Self> {
        match status {
            400 => Some(Self::PlatformCoded),
            403 => Some(Self::Forbidden),
            404 => Some(Self::NotFound),
            401 | 402 | 405..=417 | 422..=426 | 428 | 429 | 431 | 444 | 449 | 451 => {
                Some(Self::ClientRequestFault)
            }
            500 | 501 | 503 | 505..=508 | 511 | 520 => Some(Self::ServerFault),
            502 | 504 | 509 | 524 => Some(Self::NetworkFault),
            _ => None,
        }
    }
}

/// Error body after its single read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorBody {
    /// The response had no body
    Absent,
    /// Body decoded as text
    Text(String),
    /// Reading the body failed with the given reason
    Unreadable(String),
}

impl ErrorBody {
    /// Consume a reader once, capturing I/O failures as [`ErrorBody::Unreadable`]
    pub fn read_from<R: Read>(reader: Option<R>) -> Self {
        let Some(mut reader) = reader else {
            return Self::Absent;
        };

        let mut text = String::new();
        match reader.read_to_string(&mut text) {
            Ok(_) => Self::Text(text),
            Err(e) => Self::Unreadable(e.to_string()),
        }
    }

    /// Adapt the outcome of an already performed read
    pub fn from_result<E: fmt::Display>(result: Option<Result<String, E>>) -> Self {
        match result {
            None => Self::Absent,
            Some(Ok(text)) => Self::Text(text),
            Some(Err(e)) => Self::Unreadable(e.to_string()),
        }
    }

    /// Body text, or the message describing why there is none
    fn into_text(self) -> Result<String, String> {
        match self {
            Self::Absent => Err(ERROR_BODY_IS_NULL.to_owned()),
            Self::Text(text) => Ok(text),
            Self::Unreadable(reason) => {
                Err(format!("Failed to read error ResponseBody as String: {reason}"))
            }
        }
    }
}

/// Classify a failed response
///
/// Returns `None` for statuses outside every handled bucket; the response is
/// then left for the caller to interpret.
pub fn classify(status: u16, body: ErrorBody) -> Option<CpsError> {
    let category = ResponseCategory::of(status)?;
    Some(classify_as(category, status, body))
}

/// Classify a failed response whose body is still an unread stream
///
/// The stream is only consumed when the status falls in a handled bucket.
pub fn classify_reader<R: Read>(status: u16, body: Option<R>) -> Option<CpsError> {
    ResponseCategory::of(status)?;
    classify(status, ErrorBody::read_from(body))
}

/// Like [`classify`], but unhandled statuses become a base generic error
/// stamped with the status instead of being dropped
pub fn classify_or_generic(status: u16, body: ErrorBody) -> CpsError {
    if let Some(category) = ResponseCategory::of(status) {
        return classify_as(category, status, body);
    }

    let detail = match body.into_text() {
        Ok(text) | Err(text) => text,
    };
    tracing::debug!(status, "unhandled error status");

    CpsError::generic(
        Domain::Base,
        ErrorCode::new(0),
        Some(&format!("unhandled HTTP status {status}: {detail}")),
    )
    .with_http_status(status)
}

fn classify_as(category: ResponseCategory, status: u16, body: ErrorBody) -> CpsError {
    let error = match category {
        ResponseCategory::PlatformCoded => platform_coded(body),
        ResponseCategory::ServerFault => {
            from_body(Variant::UnexpectedInternalServerError, body).with_http_status(status)
        }
        ResponseCategory::NetworkFault => from_body(Variant::Network, body).with_http_status(status),
        ResponseCategory::NotFound => from_body(Variant::ResourceNotFound, body).with_http_status(status),
        ResponseCategory::Forbidden => from_body(Variant::Forbidden, body).with_http_status(status),
        ResponseCategory::ClientRequestFault => client_request(status, body),
    };

    tracing::debug!(
        status,
        %category,
        kind = %error.kind(),
        code = error.error_code(),
        "classified error response"
    );

    error
}

fn from_body(variant: Variant, body: ErrorBody) -> CpsError {
    let message = match body.into_text() {
        Ok(text) | Err(text) => text,
    };
    CpsError::from_variant(variant, Some(&message))
}

fn client_request(status: u16, body: ErrorBody) -> CpsError {
    match body.into_text() {
        Ok(text) => match ClientErrorVariant::from_status(status) {
            Some(variant) => CpsError::client(variant, Some(&text)),
            None => CpsError::from_variant(Variant::ClientError, Some(&text)).with_http_status(status),
        },
        Err(message) => CpsError::from_variant(Variant::BadRequest, Some(&message)).with_http_status(status),
    }
}

fn platform_coded(body: ErrorBody) -> CpsError {
    let text = match body.into_text() {
        Ok(text) => text,
        Err(message) => return CpsError::from_variant(Variant::BadRequest, Some(&message)),
    };

    match parse_platform_error(&text) {
        Ok((code, message)) => create_error(Some(&message), code, None),
        Err(reason) => {
            tracing::warn!(%reason, "malformed platform error body");
            CpsError::from_variant(
                Variant::BadRequest,
                Some(&format!("json parser error: {reason}. Response data: {text}")),
            )
        }
    }
}

/// Extract `(code, message)` from a platform error body
///
/// The message is the value of the single key inside `data`, whatever the
/// key is called. An empty `data` object yields an empty message.
fn parse_platform_error(text: &str) -> Result<(i32, String), String> {
    let value: Value = serde_json::from_str(text).map_err(|e| e.to_string())?;
    let object = value
        .as_object()
        .ok_or_else(|| "error body is not a JSON object".to_owned())?;

    let code = object
        .get("code")
        .ok_or_else(|| "missing field `code`".to_owned())?;
    let code = as_code(code).ok_or_else(|| format!("field `code` is not an integer: {code}"))?;

    let data = object
        .get("data")
        .and_then(Value::as_object)
        .ok_or_else(|| "missing object field `data`".to_owned())?;

    let message = match data.iter().next() {
        None => String::new(),
        Some((_, Value::String(message))) => message.clone(),
        Some((key, Value::Null)) => return Err(format!("field `data.{key}` is null")),
        Some((_, other)) => other.to_string(),
    };

    Ok((code, message))
}

fn as_code(value: &Value) -> Option<i32> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .or_else(|| number.as_f64().and_then(integral_code)),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// `1103.0` is accepted as `1103`, `1103.5` is not
fn integral_code(value: f64) -> Option<i32> {
    let in_range = (f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(&value);
    if !in_range || value.fract() != 0.0 {
        return None;
    }

    #[allow(clippy::cast_possible_truncation)]
    let code = value as i32;
    Some(code)
}
