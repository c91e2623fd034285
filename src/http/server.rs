//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the forwarding handlers
//! - Wire up middleware (CORS, security headers, tracing, request ID, body limit)
//! - Bind server to listener
//! - Forward JSON and multipart calls to the upstream service

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Multipart, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{any, post},
    Json, Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::{LoadedConfig, UpstreamConfig};
use crate::gateway::{ForwardRequest, Forwarder};
use crate::http::request::{decode_json_body, multipart_to_form, MakeRequestUuidV4, X_REQUEST_ID};
use crate::http::response::ResponseSlot;
use crate::security;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub forwarder: Forwarder,
    pub upstream: Arc<UpstreamConfig>,
}

impl AppState {
    /// Destination URL for an inbound path and query.
    fn destination(&self, path: &str, query: Option<&str>) -> String {
        let base = self.upstream.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        match query {
            Some(q) if !q.is_empty() => format!("{}/{}?{}", base, path, q),
            _ => format!("{}/{}", base, path),
        }
    }
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: LoadedConfig,
}

impl HttpServer {
    /// Create a new HTTP server from a validated configuration.
    pub fn new(config: LoadedConfig) -> Self {
        Self::with_forwarder(config, Forwarder::new())
    }

    /// Create a server using an existing forwarder.
    pub fn with_forwarder(config: LoadedConfig, forwarder: Forwarder) -> Self {
        let state = AppState {
            forwarder,
            upstream: Arc::new(config.config.upstream.clone()),
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &LoadedConfig, state: AppState) -> Router {
        let router = Router::new()
            .route("/api/{*path}", any(forward_json))
            .route("/upload/{*path}", post(forward_upload))
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.config.security.max_body_size));

        let router = if config.config.security.enable_headers {
            security::headers::apply(router)
        } else {
            router
        };

        security::cors::apply(router, config.allow_list.clone()).layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuidV4))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::new(X_REQUEST_ID)),
        )
    }

    /// Run the server until a shutdown signal is broadcast.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.config.upstream.base_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

const API_PREFIX: &str = "/api/";
const UPLOAD_PREFIX: &str = "/upload/";

/// Path below a route prefix, still percent-encoded as received.
///
/// Returns `None` when any segment is a dot segment, plain or percent-encoded,
/// since URL resolution would otherwise climb out of the upstream base path.
fn forwarded_path<'a>(uri: &'a Uri, prefix: &str) -> Option<&'a str> {
    let path = uri.path().strip_prefix(prefix)?;
    if path.split(['/', '\\']).any(is_dot_segment) {
        return None;
    }
    Some(path)
}

fn is_dot_segment(segment: &str) -> bool {
    matches!(
        segment.to_ascii_lowercase().as_str(),
        "." | ".." | "%2e" | ".%2e" | "%2e." | "%2e%2e"
    )
}

fn rejected_path(uri: &Uri) -> Response {
    tracing::debug!(path = %uri.path(), "Rejecting path with dot segments");
    (StatusCode::BAD_REQUEST, "Invalid path").into_response()
}

/// Forward a JSON call to `{base_url}/{path}`.
async fn forward_json(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let body = match decode_json_body(&body) {
        Ok(b) => b,
        Err(e) => {
            tracing::debug!(error = %e, "Rejecting malformed JSON body");
            return (StatusCode::BAD_REQUEST, format!("Invalid JSON body: {}", e)).into_response();
        }
    };

    let Some(path) = forwarded_path(&uri, API_PREFIX) else {
        return rejected_path(&uri);
    };
    let url = state.destination(path, uri.query());
    let request = ForwardRequest {
        method: method.as_str(),
        url: &url,
        body: body.as_ref(),
        headers: &headers,
        error_remap: state.upstream.remap_enabled_for(path),
    };

    let mut slot = ResponseSlot::default();
    let outcome = state.forwarder.forward(request, &mut slot).await;
    slot.into_response_for(outcome)
}

/// Forward a multipart upload to `{base_url}/{path}`.
async fn forward_upload(
    State(state): State<AppState>,
    uri: Uri,
    mut multipart: Multipart,
) -> Response {
    let Some(path) = forwarded_path(&uri, UPLOAD_PREFIX) else {
        return rejected_path(&uri);
    };
    let form = match multipart_to_form(&mut multipart).await {
        Ok(f) => f,
        Err(e) => {
            tracing::debug!(error = %e, "Rejecting malformed multipart body");
            return (StatusCode::BAD_REQUEST, format!("Invalid multipart body: {}", e)).into_response();
        }
    };

    let url = state.destination(path, uri.query());
    let value = state
        .forwarder
        .forward_multipart(&url, form)
        .await
        .into_multipart_value();

    Json(value).into_response()
}
