//! JSON request forwarding.
//!
//! # Responsibilities
//! - Build the downstream request from the header allow-list
//! - Dispatch exactly one HTTP call (no retries)
//! - Classify the result into a [`DispatchOutcome`]
//! - Relay downstream responses to the caller's [`ResponseSink`]
//!
//! # Design Decisions
//! - Failures before transmission become `SetupError` with the raw message
//! - Transport failures after transmission become `NoResponseError`
//! - Downstream bodies are decoded as JSON when possible, else kept as text

use axum::http::{HeaderMap, Method, StatusCode};
use reqwest::{Client, Url};
use serde_json::Value;

use crate::gateway::headers::OutboundHeaders;
use crate::gateway::outcome::{remap_license_error, DispatchOutcome, ResponseSink};

/// A single inbound call to be forwarded with a JSON body.
#[derive(Debug, Clone, Copy)]
pub struct ForwardRequest<'a> {
    pub method: &'a str,
    pub url: &'a str,
    pub body: Option<&'a Value>,
    pub headers: &'a HeaderMap,
    /// Enables the license error-remap hook for this call.
    pub error_remap: bool,
}

/// Forwards inbound calls to downstream services.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone, Default)]
pub struct Forwarder {
    client: Client,
}

impl Forwarder {
    /// Create a forwarder with a default HTTP client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a forwarder around an existing client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }

    /// Forward a JSON request.
    ///
    /// On `Success` and `UpstreamError` the (possibly remapped) status and
    /// body are written to `sink` before returning. The other outcomes leave
    /// `sink` untouched.
    pub async fn forward<S>(&self, request: ForwardRequest<'_>, sink: &mut S) -> DispatchOutcome
    where
        S: ResponseSink + ?Sized,
    {
        let built = match self.build_json_request(&request) {
            Ok(r) => r,
            Err(message) => {
                tracing::warn!(
                    method = %request.method,
                    url = %request.url,
                    error = %message,
                    "Failed to build downstream request"
                );
                return DispatchOutcome::SetupError { message };
            }
        };

        let outcome = match self.dispatch(built).await {
            DispatchOutcome::UpstreamError { status, body } if request.error_remap => {
                let (status, body) = remap_license_error(status, body);
                DispatchOutcome::UpstreamError { status, body }
            }
            other => other,
        };

        if let Some((status, body)) = outcome.response() {
            sink.send(status, body.clone());
        }
        outcome
    }

    fn build_json_request(&self, request: &ForwardRequest<'_>) -> Result<reqwest::Request, String> {
        let method = Method::from_bytes(request.method.to_ascii_uppercase().as_bytes())
            .map_err(|e| e.to_string())?;
        let url = Url::parse(request.url).map_err(|e| e.to_string())?;
        let headers = OutboundHeaders::from_inbound(request.headers)
            .and_then(|h| h.to_header_map())
            .map_err(|e| e.to_string())?;

        let mut builder = self.client.request(method, url).headers(headers);
        if let Some(body) = request.body {
            builder = builder.json(body);
        }
        builder.build().map_err(|e| e.to_string())
    }

    /// Send a fully built request and classify the result.
    pub(crate) async fn dispatch(&self, request: reqwest::Request) -> DispatchOutcome {
        let method = request.method().clone();
        let url = request.url().clone();

        tracing::debug!(method = %method, url = %url, "Dispatching downstream request");

        let response = match self.client.execute(request).await {
            Ok(r) => r,
            Err(e) if e.is_builder() => {
                tracing::warn!(method = %method, url = %url, error = %e, "Downstream request rejected before send");
                return DispatchOutcome::SetupError { message: e.to_string() };
            }
            Err(e) => {
                tracing::error!(method = %method, url = %url, error = %e, "No response from downstream");
                return DispatchOutcome::NoResponseError;
            }
        };

        let status = response.status();
        let bytes = match response.bytes().await {
            Ok(b) => b,
            Err(e) => {
                tracing::error!(
                    method = %method,
                    url = %url,
                    status = %status,
                    error = %e,
                    "Downstream response body could not be read"
                );
                return DispatchOutcome::NoResponseError;
            }
        };
        let body = decode_body(&bytes);

        if status.is_success() {
            tracing::debug!(method = %method, url = %url, status = %status, "Downstream request succeeded");
            DispatchOutcome::Success { status, body }
        } else {
            tracing::warn!(method = %method, url = %url, status = %status, "Downstream returned error status");
            DispatchOutcome::UpstreamError { status, body }
        }
    }
}

/// Decode a downstream body: JSON when it parses, otherwise the raw text.
pub(crate) fn decode_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::String(String::new());
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

/// Collects the relayed status and body; used where no HTTP response is being built.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CapturedResponse {
    pub status: Option<StatusCode>,
    pub body: Option<Value>,
}

impl ResponseSink for CapturedResponse {
    fn send(&mut self, status: StatusCode, body: Value) {
        self.status = Some(status);
        self.body = Some(body);
    }
}
