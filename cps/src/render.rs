use std::fmt::Write;

use cps_client::Device;
use cps_errors::{CpsError, ErrorBody, classify, create_error};

/// Describe how the factory resolves `code`
pub fn explain(code: i32) -> String {
    let error = create_error(None, code, None);
    let kind = error.kind();

    let mut out = String::new();
    let _ = writeln!(out, "code:          {code}");
    let _ = writeln!(out, "domain:        {}", error.domain());
    let _ = writeln!(out, "resolved to:   {kind}");
    let _ = writeln!(out, "prefix:        {}", error.prefix());
    let _ = writeln!(out, "postfix:       {}", error.postfix());
    let _ = writeln!(out, "expected code: {}", kind.expected_error_code());
    let _ = writeln!(out, "code allowed:  {}", kind.is_error_code_allowed(code));
    let _ = write!(out, "message:       {}", error.message());
    out
}

/// Describe the error a failed response with `status` and `body` produces
pub fn classify_response(status: u16, body: Option<&str>) -> String {
    let body = body.map_or(ErrorBody::Absent, |body| ErrorBody::Text(body.to_owned()));

    classify(status, body).map_or_else(
        || format!("no error for status {status}"),
        |error| describe(&error),
    )
}

/// One-paragraph summary of a platform error
pub fn describe(error: &CpsError) -> String {
    format!(
        "{error}\ncode: {} (domain {}), http status: {}",
        error.error_code(),
        error.domain(),
        error.http_status()
    )
}

pub fn device_line(device: &Device) -> String {
    let mut line = device.id.clone();
    if let Some(ref owner) = device.owner_id {
        let _ = write!(line, "  owner={owner}");
    }
    if let Some(ref gateway) = device.gateway_id {
        let _ = write!(line, "  gateway={gateway}");
    }
    if let Some(ref created_at) = device.created_at {
        let _ = write!(line, "  created={created_at}");
    }
    line
}
