//! Shared helpers for router-level tests: an in-memory store, a fast hasher
//! and a one-shot request helper.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use chrono::Duration;
use pastel_api::AppState;
use pastel_api::config::ApiConfig;
use pastel_core::auth::{AuthConfig, AuthService, PasswordHasher};
use pastel_core::models::account::Role;
use pastel_core::store::InMemoryAccountStore;
use serde_json::{Value, json};
use tower::ServiceExt;

pub const TEST_SECRET: &str = "test-secret";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: Arc<InMemoryAccountStore>,
}

pub fn test_app() -> TestApp {
    let store = Arc::new(InMemoryAccountStore::new());
    let auth_config = AuthConfig::new(TEST_SECRET, Duration::hours(2));
    let auth = AuthService::new(store.clone(), &auth_config).with_hasher(PasswordHasher::with_cost(4));

    let state = AppState {
        auth: Arc::new(auth),
        config: ApiConfig {
            bind_addr: "127.0.0.1:0".into(),
            database_url: "postgres://unused".into(),
            cors_origin: "http://localhost:3001".into(),
            environment: "test".into(),
            auth: auth_config,
        },
    };

    TestApp {
        router: pastel_api::router(state.clone()),
        state,
        store,
    }
}

impl TestApp {
    /// Send one request and return the status plus the parsed JSON body
    /// (`Value::Null` when the body is empty or not JSON).
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let resp = self.router.clone().oneshot(request).await.expect("request");
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("read body");
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    /// Register an account and return `(account id, token)`.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> (String, String) {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({"displayName": name, "email": email, "password": password})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
        (
            body["data"]["account"]["id"].as_str().unwrap().to_string(),
            body["data"]["token"].as_str().unwrap().to_string(),
        )
    }

    /// Register an account and promote it to admin.
    pub async fn register_admin(&self, name: &str, email: &str, password: &str) -> (String, String) {
        let registered = self.register(name, email, password).await;
        self.state
            .auth
            .set_role_by_email(email, Role::Admin)
            .await
            .expect("promote admin");
        registered
    }
}
