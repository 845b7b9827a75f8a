//! Test helper functions for API integration tests
//!
//! Provides an in-process server over the memory repository, client
//! fixtures pointed at it and helpers for router-level requests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request},
    response::Response,
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::de::DeserializeOwned;

use secrest_api::build_router;
use secrest_api::repositories::{MemoryPrivilegeRepository, PrivilegeRepository};
use secrest_client::PrivilegeClient;
use secrest_shared_config::{ClientConfig, CredentialsConfig};
use secrest_test_utils::PrivilegeFixture;

pub const TEST_USERNAME: &str = "tester";
pub const TEST_PASSWORD: &str = "integration-secret";

pub fn test_credentials() -> CredentialsConfig {
    CredentialsConfig::new(TEST_USERNAME, TEST_PASSWORD)
}

/// Router over a fresh memory repository
pub fn test_app() -> Router {
    let repository: Arc<dyn PrivilegeRepository> = Arc::new(MemoryPrivilegeRepository::new());
    build_router(repository, test_credentials())
}

/// A server listening on an ephemeral local port
///
/// The server task lives as long as the test runtime.
pub struct TestServer {
    addr: SocketAddr,
}

impl TestServer {
    pub async fn spawn() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local address");
        let app = test_app();

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("server error");
        });

        Self { addr }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn client(&self) -> PrivilegeClient {
        let config = ClientConfig::new(self.base_url(), test_credentials());
        PrivilegeClient::for_privileges(&config).expect("client config is valid")
    }
}

/// Privilege fixture backed by its own server
pub async fn privilege_fixture() -> PrivilegeFixture {
    let server = TestServer::spawn().await;
    PrivilegeFixture::for_privileges(server.client())
}

/// `Authorization` header value for the test account
pub fn basic_auth() -> String {
    let encoded = STANDARD.encode(format!("{}:{}", TEST_USERNAME, TEST_PASSWORD));
    format!("Basic {}", encoded)
}

/// Authenticated GET request
pub fn authed_get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, basic_auth())
        .body(Body::empty())
        .unwrap()
}

/// Authenticated request with a JSON body
pub fn authed_json(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, basic_auth())
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Parse a JSON response body
pub async fn parse_body<T: DeserializeOwned>(response: Response) -> T {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Header value as a string, if present
pub fn header_str<'a>(response: &'a Response, name: &str) -> Option<&'a str> {
    response.headers().get(name).and_then(|v| v.to_str().ok())
}
