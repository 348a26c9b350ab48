// SPDX-License-Identifier: Apache-2.0

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use barim_core::AppConfig;
use barim_core::testing::{InMemoryConnector, InMemoryTracker};
use barim_server::{AppState, build_router};
use serde_json::Value;
use tower::ServiceExt;

pub const TOKEN: &str = "ghp_test_token";

pub fn app(tracker: &InMemoryTracker) -> Router {
    app_with_config(tracker, AppConfig::default())
}

pub fn app_with_config(tracker: &InMemoryTracker, config: AppConfig) -> Router {
    let connector = Arc::new(InMemoryConnector::new(TOKEN, tracker.clone()));
    build_router(AppState::new(config, connector))
}

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    auth: Option<&str>,
    body: Option<&str>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        request = request.header(header::AUTHORIZATION, auth);
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, Some(&bearer()), None).await
}

pub async fn post(app: Router, uri: &str, body: &str) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(&bearer()), Some(body)).await
}

pub fn bearer() -> String {
    format!("Bearer {TOKEN}")
}
