//! Multipart form forwarding.
//!
//! Unlike the JSON path there is no header allow-list here: the form supplies
//! its own `content-type` and boundary, and nothing is written to a sink.

use reqwest::{multipart::Form, Url};

use crate::gateway::forwarder::Forwarder;
use crate::gateway::outcome::DispatchOutcome;

impl Forwarder {
    /// POST a multipart form to `url`.
    ///
    /// Downstream responses are returned without status remapping and
    /// without the license error-remap hook.
    pub async fn forward_multipart(&self, url: &str, form: Form) -> DispatchOutcome {
        let url = match Url::parse(url) {
            Ok(u) => u,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Invalid multipart destination");
                return DispatchOutcome::SetupError { message: e.to_string() };
            }
        };

        let request = match self.client().post(url).multipart(form).build() {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to build multipart request");
                return DispatchOutcome::SetupError { message: e.to_string() };
            }
        };

        self.dispatch(request).await
    }
}
