//! Shared helpers for API integration tests
//!
//! Every [`TestContext`] owns a router over a fresh in-memory store, so tests
//! are independent and need no database.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use quill_api::{
    app::{build_router, AppState},
    config::Config,
};
use serde_json::{json, Value};
use tower::ServiceExt;

pub const JWT_SECRET: &str = "test-secret-key-at-least-32-bytes-long";

pub fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "DATABASE_URL" => Some("postgresql://unused/quill_test".to_string()),
        "JWT_SECRET" => Some(JWT_SECRET.to_string()),
        _ => None,
    })
    .expect("test config")
}

/// A response decoded for assertions
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Value,
    pub text: String,
}

pub struct TestContext {
    pub app: Router,
}

impl TestContext {
    pub fn new() -> Self {
        Self {
            app: build_router(AppState::in_memory(test_config())),
        }
    }

    /// Sends a request; `body` is sent as JSON when present
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        self.send_raw(request).await
    }

    pub async fn send_raw(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8_lossy(&bytes).to_string();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
            text,
        }
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> TestResponse {
        self.send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "name": name, "email": email, "password": password })),
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        self.send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": email, "password": password })),
        )
        .await
    }

    /// Registers a user and returns a bearer token for them
    pub async fn user_token(&self, name: &str, email: &str) -> String {
        let registered = self.register(name, email, "pw1").await;
        assert_eq!(registered.status, StatusCode::CREATED, "{}", registered.text);

        let login = self.login(email, "pw1").await;
        assert_eq!(login.status, StatusCode::OK, "{}", login.text);
        login.body["token"].as_str().unwrap().to_string()
    }

    pub async fn create_post(&self, token: &str, title: &str) -> TestResponse {
        self.send(
            Method::POST,
            "/api/posts",
            Some(token),
            Some(json!({ "title": title, "content": "Body text", "tags": ["rust"] })),
        )
        .await
    }

    pub async fn publish(&self, token: &str, id: &str) -> TestResponse {
        self.send(
            Method::POST,
            &format!("/api/posts/{}/publish", id),
            Some(token),
            None,
        )
        .await
    }
}
