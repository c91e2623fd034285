//! Response construction for forwarded calls.
//!
//! # Responsibilities
//! - Receive the downstream status and body relayed by the JSON forwarder
//! - Map the remaining dispatch outcomes to their outward responses
//!
//! # Design Decisions
//! - `NoResponseError` becomes 500 with the fixed internal-error payload
//! - `SetupError` becomes 500 with the bare message as plain text

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use crate::gateway::outcome::{internal_error_payload, DispatchOutcome, ResponseSink};

/// Sink that holds the relayed response until the handler returns.
#[derive(Debug, Default)]
pub struct ResponseSlot {
    relayed: Option<(StatusCode, Value)>,
}

impl ResponseSink for ResponseSlot {
    fn send(&mut self, status: StatusCode, body: Value) {
        self.relayed = Some((status, body));
    }
}

impl ResponseSlot {
    /// Produce the outward response for a JSON forwarding call.
    pub fn into_response_for(self, outcome: DispatchOutcome) -> Response {
        if let Some((status, body)) = self.relayed {
            return (status, Json(body)).into_response();
        }

        match outcome {
            DispatchOutcome::NoResponseError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(internal_error_payload(true)),
            )
                .into_response(),
            DispatchOutcome::SetupError { message } => {
                (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
            }
            // Responses are always relayed through the slot.
            DispatchOutcome::Success { status, body }
            | DispatchOutcome::UpstreamError { status, body } => (status, Json(body)).into_response(),
        }
    }
}
