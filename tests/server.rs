//! End-to-end tests through the HTTP front.

use reqwest::header::{ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN};
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde_json::{json, Value};

mod common;

#[tokio::test]
async fn test_json_call_forwarded_to_upstream_path() {
    let backend = common::start_echo_backend().await;
    let (gateway, shutdown) = common::start_gateway(backend, "*", &[]).await;

    let res = common::client()
        .get(format!("http://{}/api/content/v1/read/do_1?fields=name", gateway))
        .header("tenantid", "t1")
        .header("academicyearid", "y1")
        .header("authorization", "Bearer x")
        .header("cookie", "session=secret")
        .send()
        .await
        .expect("Gateway unreachable");

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
    assert_eq!(res.headers()["x-content-type-options"], "nosniff");

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["path"], "/content/v1/read/do_1");
    assert_eq!(body["query"], "fields=name");
    assert_eq!(body["headers"]["tenantid"], "t1");
    assert!(body["headers"].get("cookie").is_none());

    shutdown.trigger();
}

#[tokio::test]
async fn test_license_error_remapped_on_configured_path() {
    let backend = common::start_fixed_backend(
        400,
        json!({ "params": { "err": "ERR_YOUTUBE_LICENSE_VALIDATION" }, "result": {} }),
    )
    .await;
    let (gateway, shutdown) = common::start_gateway(backend, "*", &["content/v1/read"]).await;
    let client = common::client();

    let res = client
        .get(format!("http://{}/api/content/v1/read/do_1", gateway))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["result"]["license"], json!({ "valid": false, "value": "youtube" }));

    let res = client
        .get(format!("http://{}/api/content/v1/hierarchy/do_1", gateway))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    shutdown.trigger();
}

#[tokio::test]
async fn test_no_response_maps_to_internal_error() {
    let backend = common::start_silent_backend().await;
    let (gateway, shutdown) = common::start_gateway(backend, "*", &[]).await;

    let res = common::client()
        .post(format!("http://{}/api/content/v1/create", gateway))
        .json(&json!({ "request": {} }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "result": {},
            "params": {
                "err": "Internal server error",
                "errmsg": "Internal server error",
                "status": "failed",
            },
            "responseCode": 500,
        })
    );

    shutdown.trigger();
}

#[tokio::test]
async fn test_malformed_json_body_rejected() {
    let backend = common::start_echo_backend().await;
    let (gateway, shutdown) = common::start_gateway(backend, "*", &[]).await;

    let res = common::client()
        .post(format!("http://{}/api/content/v1/create", gateway))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    shutdown.trigger();
}

#[tokio::test]
async fn test_origin_allow_list_enforced() {
    let backend = common::start_echo_backend().await;
    let (gateway, shutdown) =
        common::start_gateway(backend, "https://app.example.com,https://admin.example.com", &[]).await;
    let client = common::client();
    let url = format!("http://{}/api/health", gateway);

    let res = client
        .get(&url)
        .header(ORIGIN, "https://admin.example.com")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "https://admin.example.com");

    let res = client
        .get(&url)
        .header(ORIGIN, "https://app.example.com.evil.net")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Origin not allowed");

    let res = client.get(&url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    shutdown.trigger();
}

#[tokio::test]
async fn test_wildcard_mirrors_any_origin() {
    let backend = common::start_echo_backend().await;
    let (gateway, shutdown) = common::start_gateway(backend, "*", &[]).await;

    let res = common::client()
        .get(format!("http://{}/api/health", gateway))
        .header(ORIGIN, "https://anywhere.test")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "https://anywhere.test");
    assert_eq!(res.headers()["access-control-allow-credentials"], "true");

    shutdown.trigger();
}

#[tokio::test]
async fn test_upload_forwarded_as_multipart() {
    let backend = common::start_echo_backend().await;
    let (gateway, shutdown) = common::start_gateway(backend, "*", &[]).await;

    let form = Form::new().text("title", "Lesson 1").part(
        "file",
        Part::bytes(b"hello".to_vec())
            .file_name("notes.txt")
            .mime_str("text/plain")
            .unwrap(),
    );

    let res = common::client()
        .post(format!("http://{}/upload/asset/v1/upload/do_1", gateway))
        .header("tenantid", "t1")
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["method"], "POST");
    assert_eq!(body["path"], "/asset/v1/upload/do_1");
    assert!(body["headers"]["content-type"]
        .as_str()
        .unwrap()
        .starts_with("multipart/form-data"));
    assert!(body["headers"].get("tenantid").is_none());

    let raw = body["body"].as_str().unwrap();
    assert!(raw.contains("Lesson 1"));
    assert!(raw.contains("filename=\"notes.txt\""));
    assert!(raw.contains("hello"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_upload_without_response_returns_payload() {
    let backend = common::start_silent_backend().await;
    let (gateway, shutdown) = common::start_gateway(backend, "*", &[]).await;

    let res = common::client()
        .post(format!("http://{}/upload/asset/v1/upload/do_1", gateway))
        .multipart(Form::new().text("title", "Lesson 1"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["params"]["err"], "Internal server error");
    assert!(body.get("responseCode").is_none());

    shutdown.trigger();
}

#[tokio::test]
async fn test_dot_segments_cannot_leave_base_path() {
    let backend = common::start_echo_backend().await;
    let (gateway, shutdown) =
        common::start_gateway_at(&format!("http://{}/v1/public", backend), "*", &[]).await;

    let (status, body) = common::raw_get(gateway, "/api/content/v1/read/do_1").await;
    assert_eq!(status, 200);
    assert!(body.contains("\"/v1/public/content/v1/read/do_1\""));

    for target in [
        "/api/%2e%2e/%2e%2e/admin/secrets",
        "/api/../../admin/secrets",
        "/api/.%2E/admin/secrets",
    ] {
        let (status, body) = common::raw_get(gateway, target).await;
        assert_eq!(status, 400, "{}", target);
        assert!(!body.contains("admin/secrets"), "{}", target);
    }

    shutdown.trigger();
}

#[tokio::test]
async fn test_dot_segments_cannot_enable_license_remap() {
    let backend = common::start_fixed_backend(
        400,
        json!({ "params": { "err": "ERR_YOUTUBE_LICENSE_VALIDATION" }, "result": {} }),
    )
    .await;
    let (gateway, shutdown) = common::start_gateway(backend, "*", &["content/v1/read"]).await;

    let (status, _) = common::raw_get(gateway, "/api/content/v1/read/do_1").await;
    assert_eq!(status, 200);

    let (status, body) =
        common::raw_get(gateway, "/api/content/v1/read/%2e%2e/%2e%2e/hierarchy/do_1").await;
    assert_eq!(status, 400);
    assert!(!body.contains("license"));

    shutdown.trigger();
}
