//! Router and classifier stubs for handler tests

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use intake_core::{ClassifierConfig, ComplaintClassifier};

pub use intake_core::test_support::{closed_endpoint, spawn_classifier};

use crate::config::{Config, ProfileBackend};
use crate::store::MemoryProfileStore;
use crate::{create_router, AppState};

/// Router over an in-memory profile store and the given classifier endpoint
pub fn test_app(classifier_url: String) -> Router {
    let config = Config {
        database_url: String::new(),
        port: 0,
        profile_backend: ProfileBackend::Memory,
        classifier_url: classifier_url.clone(),
        classifier_timeout_secs: 5,
        allowed_origins: vec!["http://localhost:5173".to_string()],
        environment: "test".to_string(),
    };

    let classifier = ComplaintClassifier::new(ClassifierConfig::new(classifier_url, Duration::from_secs(5)))
        .unwrap();

    create_router(AppState {
        profiles: Arc::new(MemoryProfileStore::new()),
        classifier: Arc::new(classifier),
        config,
    })
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}
