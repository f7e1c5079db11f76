//! Shared helpers for API integration tests.
//!
//! Builds the real application router (same middleware stack as
//! production) over the in-memory store, so tests exercise routing,
//! extractors, and error mapping without a running MongoDB.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use campus_api::config::{EscalationConfig, ServerConfig};
use campus_api::router::build_app_router;
use campus_api::state::AppState;
use campus_classifier::GeminiClassifier;
use campus_core::Classify;
use campus_db::{IssueRepository, IssueStore, MemoryStore};

/// Build a test `ServerConfig` with safe defaults and compressed
/// escalation timescales.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        mongo_url: "mongodb://localhost:27017".to_string(),
        db_name: "campus_issues_test".to_string(),
        google_api_key: None,
        cors_origins: vec!["*".to_string()],
        request_timeout_secs: 30,
        escalation: EscalationConfig {
            scan_interval: Duration::from_millis(20),
            backoff_interval: Duration::from_millis(10),
            stale_after: Duration::from_secs(600),
        },
    }
}

/// Build the full application router over the given in-memory store.
///
/// No classifier key is configured, so created issues get the safe
/// default classification without any network traffic.
pub fn build_test_app(store: Arc<MemoryStore>) -> Router {
    let config = test_config();
    let store: Arc<dyn IssueStore> = store;
    let classifier: Arc<dyn Classify> = Arc::new(GeminiClassifier::new(None));

    let state = AppState {
        repo: IssueRepository::new(Arc::clone(&store), Some(Arc::clone(&classifier))),
        store,
        classifier,
        config: Arc::new(config.clone()),
    };

    build_app_router(state, &config)
}

/// Send a GET request.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

/// Send a request with an optional JSON body.
pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let request = builder.body(body).unwrap();
    app.oneshot(request).await.unwrap()
}

/// Read a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
