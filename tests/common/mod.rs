//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{Request, Response},
    Router,
};
use front_controller::auth::password::hash_password;
use front_controller::config::{AppConfig, UserConfig};
use front_controller::{HttpServer, Shutdown};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower::ServiceExt;

pub const EMAIL: &str = "ada@example.com";
pub const PASSWORD: &str = "hunter2";

/// Default configuration plus one known user.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.users.push(UserConfig {
        id: 7,
        email: EMAIL.to_string(),
        password_hash: hash_password(PASSWORD).unwrap(),
    });
    config
}

/// Send one request through the router without a socket.
pub async fn send(router: &Router, request: Request<Body>) -> Response<Body> {
    router.clone().oneshot(request).await.unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// The `name=value` part of a `Set-Cookie` header.
pub fn session_pair(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

/// Serve on an ephemeral port until `Shutdown` is triggered.
pub async fn spawn_server(
    server: HttpServer,
) -> (SocketAddr, Shutdown, JoinHandle<Result<(), std::io::Error>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();

    let handle = tokio::spawn(server.run(listener, rx));
    tokio::time::sleep(Duration::from_millis(50)).await;

    (addr, shutdown, handle)
}
