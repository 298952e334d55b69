// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Shared fixtures for the gateway integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, Response},
    Router,
};
use contact_intake_gateway::{
    config::Config,
    error::NotifyError,
    handlers::{router, AppState},
    metrics::Metrics,
    notifier::{Delivery, Notifier},
    AdmissionPipeline, Backends, MemoryStore, TenantConfig,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower::ServiceExt;

pub const TENANT_ORIGIN: &str = "https://cf-obras-civiles-web-kplb.bolt.host";
pub const WEBHOOK: &str = "https://hooks.example.com/cfobras";

/// Notifier that remembers every delivery attempt.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub async fn count(&self) -> usize {
        self.sent.lock().await.len()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, target: &str, message: &str) -> Result<Delivery, NotifyError> {
        self.sent
            .lock()
            .await
            .push((target.to_string(), message.to_string()));
        Ok(Delivery::Delivered)
    }
}

pub struct TestGateway {
    pub app: Router,
    pub store: Arc<MemoryStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub pipeline_metrics: Metrics,
}

pub fn cfobras() -> TenantConfig {
    TenantConfig::new("cfobras")
        .with_origin(TENANT_ORIGIN)
        .with_notify_url(WEBHOOK)
        .with_hourly_limit(10)
}

pub async fn gateway(stealth_mode: bool, tenants: Vec<TenantConfig>) -> TestGateway {
    let store = Arc::new(MemoryStore::new());
    for tenant in tenants {
        store.put_tenant(tenant).await;
    }
    let notifier = Arc::new(RecordingNotifier::default());
    let config = Config {
        stealth_mode,
        ..Default::default()
    };
    let metrics = Metrics::new().unwrap();
    let pipeline = AdmissionPipeline::new(
        Backends::shared(store.clone()),
        notifier.clone(),
        &config,
        metrics.clone(),
    );
    let app = router(Arc::new(AppState {
        pipeline: Some(pipeline),
        config,
        metrics: metrics.clone(),
    }));

    TestGateway {
        app,
        store,
        notifier,
        pipeline_metrics: metrics,
    }
}

/// Gateway whose store could not be opened at startup.
pub fn unconfigured_gateway(stealth_mode: bool) -> Router {
    let config = Config {
        stealth_mode,
        ..Default::default()
    };
    router(Arc::new(AppState {
        pipeline: None,
        config,
        metrics: Metrics::new().unwrap(),
    }))
}

pub fn valid_body() -> serde_json::Value {
    serde_json::json!({
        "tenant": "cfobras",
        "name": "Ana Pérez",
        "email": "ana@example.com",
        "phone": "+34 600 000 000",
        "company_name": "Obras SA",
        "contact_type": "budget_request",
        "message": "Necesito un presupuesto para una reforma.",
        "website": ""
    })
}

pub fn post(origin: Option<&str>, source: &str, body: &serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .header("x-forwarded-for", source)
        .header("user-agent", "integration-test");
    if let Some(origin) = origin {
        builder = builder.header("origin", origin);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> (Response<Body>, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let (parts, body) = response.into_parts();
    let bytes = to_bytes(body, usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (Response::from_parts(parts, Body::empty()), json)
}
