//! Stub classifier endpoints for tests

use axum::{
    extract::State,
    http::{header, StatusCode},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

const PREDICT_PATH: &str = "/api/predict";

pub type Received = Arc<Mutex<Option<Value>>>;

async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}{}", addr, PREDICT_PATH)
}

/// Classifier answering every request with a fixed status and body.
pub async fn spawn_classifier(status: StatusCode, body: &'static str) -> String {
    let app = Router::new().route(
        PREDICT_PATH,
        post(move || async move { (status, [(header::CONTENT_TYPE, "application/json")], body) }),
    );
    serve(app).await
}

/// Classifier that records the last request body it received.
pub async fn spawn_echo_classifier() -> (String, Received) {
    let received: Received = Arc::default();
    let app = Router::new()
        .route(PREDICT_PATH, post(record))
        .with_state(received.clone());
    (serve(app).await, received)
}

async fn record(State(received): State<Received>, Json(body): Json<Value>) -> Json<Value> {
    let category = body["complaint_type"].clone();
    *received.lock().unwrap() = Some(body);
    Json(json!({ "is_threat": false, "category": category, "confidence": 0.5 }))
}

/// Classifier that answers only after `delay`.
pub async fn spawn_slow_classifier(delay: Duration) -> String {
    let app = Router::new().route(
        PREDICT_PATH,
        post(move || async move {
            tokio::time::sleep(delay).await;
            Json(json!({ "is_threat": true }))
        }),
    );
    serve(app).await
}

/// Address nothing is listening on.
pub async fn closed_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}{}", addr, PREDICT_PATH)
}
