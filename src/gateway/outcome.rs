//! Dispatch outcomes and the fixed error payloads derived from them.

use axum::http::StatusCode;
use serde_json::{json, Value};

/// Sentinel `params.err` value that the error-remap hook translates.
pub const YOUTUBE_LICENSE_ERROR: &str = "ERR_YOUTUBE_LICENSE_VALIDATION";

const INTERNAL_SERVER_ERROR: &str = "Internal server error";

/// Result of a single forwarding call.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// Downstream answered with a 2xx status.
    Success { status: StatusCode, body: Value },
    /// Downstream answered with a non-2xx status.
    UpstreamError { status: StatusCode, body: Value },
    /// The request left the process but no response came back.
    NoResponseError,
    /// The request was never sent.
    SetupError { message: String },
}

impl DispatchOutcome {
    /// Status and body of a downstream response, if one was received.
    pub fn response(&self) -> Option<(StatusCode, &Value)> {
        match self {
            DispatchOutcome::Success { status, body }
            | DispatchOutcome::UpstreamError { status, body } => Some((*status, body)),
            _ => None,
        }
    }

    /// Value handed back to callers of the multipart path.
    ///
    /// Responses yield their body as-is, a missing response yields the
    /// internal-error payload without `responseCode`, and a setup failure
    /// yields the bare error message.
    pub fn into_multipart_value(self) -> Value {
        match self {
            DispatchOutcome::Success { body, .. } | DispatchOutcome::UpstreamError { body, .. } => {
                body
            }
            DispatchOutcome::NoResponseError => internal_error_payload(false),
            DispatchOutcome::SetupError { message } => Value::String(message),
        }
    }
}

/// Writable target for the JSON path's downstream status and body.
pub trait ResponseSink {
    fn send(&mut self, status: StatusCode, body: Value);
}

/// Fixed payload returned when the downstream never answered.
///
/// The JSON path carries `responseCode: 500`; the multipart path omits it.
pub fn internal_error_payload(with_response_code: bool) -> Value {
    let mut payload = json!({
        "result": {},
        "params": {
            "err": INTERNAL_SERVER_ERROR,
            "errmsg": INTERNAL_SERVER_ERROR,
            "status": "failed",
        },
    });
    if with_response_code {
        payload["responseCode"] = json!(500);
    }
    payload
}

/// Apply the YouTube license compatibility shim to a downstream error.
///
/// Only an error body whose `params.err` equals [`YOUTUBE_LICENSE_ERROR`] is
/// rewritten: the status becomes 200 and `result` is replaced. Every other
/// field of the body is preserved. Anything else is returned unchanged.
pub fn remap_license_error(status: StatusCode, mut body: Value) -> (StatusCode, Value) {
    let is_license_error = body
        .pointer("/params/err")
        .and_then(Value::as_str)
        .is_some_and(|err| err == YOUTUBE_LICENSE_ERROR);

    if !is_license_error {
        return (status, body);
    }

    if let Some(fields) = body.as_object_mut() {
        fields.insert(
            "result".to_string(),
            json!({ "license": { "valid": false, "value": "youtube" } }),
        );
    }
    (StatusCode::OK, body)
}
