//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;

use axum::{
    body::Bytes,
    http::{HeaderMap, Method, StatusCode, Uri},
    Json, Router,
};
use gateway_forwarder::config::{GatewayConfig, LoadedConfig};
use gateway_forwarder::gateway::Forwarder;
use gateway_forwarder::http::HttpServer;
use gateway_forwarder::lifecycle::Shutdown;
use gateway_forwarder::security::validate_origin_list;
use serde_json::{json, Map, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Start a backend that echoes what it received as JSON.
///
/// The response carries `method`, `path`, `query`, `headers`, `content_type`
/// and `body` (raw body text).
pub async fn start_echo_backend() -> SocketAddr {
    async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Json<Value> {
        let header_map: Map<String, Value> = headers
            .iter()
            .map(|(k, v)| (k.to_string(), json!(v.to_str().unwrap_or_default())))
            .collect();
        Json(json!({
            "method": method.as_str(),
            "path": uri.path(),
            "query": uri.query(),
            "headers": header_map,
            "body": String::from_utf8_lossy(&body),
        }))
    }

    serve(Router::new().fallback(echo)).await
}

/// Start a backend that answers every request with a fixed status and JSON body.
pub async fn start_fixed_backend(status: u16, body: Value) -> SocketAddr {
    let status = StatusCode::from_u16(status).unwrap();
    let handler = move || {
        let body = body.clone();
        async move { (status, Json(body)) }
    };
    serve(Router::new().fallback(handler)).await
}

/// Start a backend that accepts connections and closes them without answering.
pub async fn start_silent_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                drop(socket);
            });
        }
    });

    addr
}

async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

/// Start the gateway in front of `upstream`, returning its address and the
/// shutdown handle keeping it alive.
pub async fn start_gateway(
    upstream: SocketAddr,
    origin_list: &str,
    error_remap_paths: &[&str],
) -> (SocketAddr, Shutdown) {
    start_gateway_at(&format!("http://{}", upstream), origin_list, error_remap_paths).await
}

/// Start the gateway with an explicit upstream base URL, which may carry a path.
pub async fn start_gateway_at(
    base_url: &str,
    origin_list: &str,
    error_remap_paths: &[&str],
) -> (SocketAddr, Shutdown) {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.cors.origin_list = Some(origin_list.to_string());
    config.upstream.base_url = base_url.to_string();
    config.upstream.error_remap_paths = error_remap_paths.iter().map(|p| p.to_string()).collect();

    let allow_list = validate_origin_list(Some(origin_list)).unwrap();
    let server = HttpServer::with_forwarder(
        LoadedConfig { config, allow_list },
        Forwarder::with_client(client()),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// A client that never pools connections, to keep tests independent.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// Send a GET with the request target written verbatim, bypassing client-side
/// URL normalization. Returns the status code and the response body.
pub async fn raw_get(addr: SocketAddr, target: &str) -> (u16, String) {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!(
        "GET {} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n\r\n",
        target, addr
    );
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await.unwrap();
    let raw = String::from_utf8_lossy(&raw).into_owned();

    let status = raw
        .split_whitespace()
        .nth(1)
        .and_then(|code| code.parse().ok())
        .unwrap();
    let body = raw
        .split_once("\r\n\r\n")
        .map(|(_, b)| b.to_string())
        .unwrap_or_default();
    (status, body)
}
