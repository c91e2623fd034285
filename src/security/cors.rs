//! CORS policy built from the validated origin allow-list.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderName, HeaderValue, Method, Request, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::json;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::security::origin::AllowList;

const ALLOWED_METHODS: [Method; 7] = [
    Method::GET,
    Method::HEAD,
    Method::PUT,
    Method::PATCH,
    Method::POST,
    Method::DELETE,
    Method::OPTIONS,
];

/// Build the CORS response layer.
///
/// Credentials are allowed, so the wildcard case mirrors the request origin
/// instead of answering with a literal `*`.
pub fn cors_layer(allow_list: &AllowList) -> CorsLayer {
    let allow_origin = match allow_list {
        AllowList::Any => AllowOrigin::mirror_request(),
        AllowList::Exact(origins) => AllowOrigin::list(
            origins
                .iter()
                .filter_map(|o| HeaderValue::from_str(o).ok()),
        ),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(ALLOWED_METHODS)
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            HeaderName::from_static("x-custom-header"),
            HeaderName::from_static("rbac_token"),
            HeaderName::from_static("tenantid"),
            HeaderName::from_static("academicyearid"),
            HeaderName::from_static("deviceid"),
            HeaderName::from_static("x-channel-id"),
        ])
        .allow_credentials(true)
}

/// Reject requests carrying an `Origin` outside the allow-list.
///
/// Requests without an `Origin` header (same-origin or non-browser callers)
/// are not subject to CORS and pass through.
pub async fn origin_guard(
    State(allow_list): State<Arc<AllowList>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(origin) = req.headers().get(header::ORIGIN) {
        let permitted = origin
            .to_str()
            .map(|o| allow_list.is_allowed(o))
            .unwrap_or(false);

        if !permitted {
            tracing::warn!(origin = ?origin, "Origin not allowed");
            return (
                StatusCode::FORBIDDEN,
                Json(json!({
                    "statusCode": 403,
                    "message": "Origin not allowed",
                    "error": "Forbidden",
                })),
            )
                .into_response();
        }
    }

    next.run(req).await
}

/// Wrap a router with the CORS layer and the origin guard.
pub fn apply(router: Router, allow_list: AllowList) -> Router {
    let cors = cors_layer(&allow_list);
    router
        .layer(cors)
        .layer(middleware::from_fn_with_state(Arc::new(allow_list), origin_guard))
}
