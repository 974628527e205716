#![allow(dead_code)]

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use cnec_api::config::ServerConfig;
use cnec_api::router::build_app_router;
use cnec_api::state::AppState;
use cnec_core::region::Region;
use cnec_db::config::RegionConfig;
use cnec_db::{BackendError, RegionBackend, RegionRegistry, RegionSettings, SelectQuery};
use cnec_events::EventBus;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
    }
}

// ---------------------------------------------------------------------------
// In-memory regions
// ---------------------------------------------------------------------------

/// An in-memory table.
#[derive(Default)]
pub struct MemoryRegion {
    pub rows: Mutex<Vec<Value>>,
}

impl MemoryRegion {
    pub fn with_rows(rows: Vec<Value>) -> Arc<Self> {
        Arc::new(Self {
            rows: Mutex::new(rows),
        })
    }
}

#[async_trait]
impl RegionBackend for MemoryRegion {
    async fn insert(&self, _table: &str, row: &Value) -> Result<Value, BackendError> {
        let mut rows = self.rows.lock().unwrap();
        let mut stored = row.clone();
        stored["id"] = json!(rows.len() + 1);
        rows.push(stored.clone());
        Ok(stored)
    }

    async fn select(&self, _table: &str, query: &SelectQuery) -> Result<Vec<Value>, BackendError> {
        let mut rows: Vec<Value> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|row| {
                query
                    .eq
                    .iter()
                    .all(|(col, val)| row.get(col).and_then(Value::as_str) == Some(val.as_str()))
                    && query
                        .not_null
                        .iter()
                        .all(|col| row.get(col).is_some_and(|v| !v.is_null()))
            })
            .cloned()
            .collect();
        if let Some((col, desc)) = &query.order {
            rows.sort_by(|a, b| {
                let order = match (a.get(col), b.get(col)) {
                    (Some(Value::Number(x)), Some(Value::Number(y))) => x
                        .as_f64()
                        .partial_cmp(&y.as_f64())
                        .unwrap_or(Ordering::Equal),
                    (x, y) => x
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .cmp(y.and_then(Value::as_str).unwrap_or_default()),
                };
                if *desc {
                    order.reverse()
                } else {
                    order
                }
            });
        }
        Ok(rows)
    }
}

/// A region whose provider rejects every request.
pub struct RejectingRegion(pub &'static str);

#[async_trait]
impl RegionBackend for RejectingRegion {
    async fn insert(&self, _table: &str, _row: &Value) -> Result<Value, BackendError> {
        Err(BackendError::Api {
            status: 409,
            message: self.0.to_string(),
        })
    }

    async fn select(&self, _table: &str, _query: &SelectQuery) -> Result<Vec<Value>, BackendError> {
        Err(BackendError::Api {
            status: 500,
            message: self.0.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// App builders
// ---------------------------------------------------------------------------

/// A running app plus handles to its shared pieces.
pub struct TestApp {
    pub router: Router,
    pub event_bus: Arc<EventBus>,
}

/// Build the full application router where only `regions` are configured.
///
/// Uses the same middleware stack as production.
pub fn build_test_app(regions: Vec<(Region, Arc<dyn RegionBackend>)>) -> TestApp {
    let mut settings = RegionSettings::new();
    for (region, _) in &regions {
        settings = settings.with(*region, format!("https://{region}.supabase.test"), "anon");
    }
    let backends: HashMap<Region, Arc<dyn RegionBackend>> = regions.into_iter().collect();
    let registry = RegionRegistry::new(
        settings,
        Box::new(move |region: Region, _: &RegionConfig| -> Arc<dyn RegionBackend> {
            Arc::clone(&backends[&region])
        }),
    );

    let config = test_config();
    let event_bus = Arc::new(EventBus::default());
    let state = AppState {
        registry: Arc::new(registry),
        event_bus: Arc::clone(&event_bus),
    };

    TestApp {
        router: build_app_router(state, &config),
        event_bus,
    }
}

/// An app with no configured regions.
pub fn build_empty_app() -> Router {
    build_test_app(Vec::new()).router
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
