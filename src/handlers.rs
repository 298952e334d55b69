// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the intake gateway.
//!
//! The submission endpoint answers every admitted request, and every
//! rejection covered by stealth mode, with the same `200 {"ok": true}`.
//! Protocol-level problems (wrong method, missing store) are never masked.

use crate::config::Config;
use crate::metrics::Metrics;
use crate::pipeline::{AdmissionPipeline, Decision, InboundRequest, Rejection};
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::net::IpAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

const ALLOWED_METHODS: &str = "POST, OPTIONS";
const PREFLIGHT_MAX_AGE_SECS: &str = "86400";

/// Headers consulted for the client address, in order of preference.
const SOURCE_HEADERS: [&str; 3] = ["x-forwarded-for", "x-real-ip", "cf-connecting-ip"];

/// Shared application state.
pub struct AppState {
    /// `None` when no store could be reached at startup
    pub pipeline: Option<AdmissionPipeline>,
    pub config: Config,
    pub metrics: Metrics,
}

/// Body of every successful (or stealth-rejected) submission.
#[derive(Debug, Serialize)]
pub struct AckResponse {
    pub ok: bool,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub ok: bool,
    pub error: &'static str,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .route(
            "/",
            post(submit).options(preflight).fallback(method_not_allowed),
        )
        .route("/health", get(health))
        .route("/healthz", get(health));

    if state.config.metrics.enabled {
        app = app.route(&state.config.metrics.path, get(metrics));
    }

    app.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "contact-intake-gateway",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Prometheus scrape endpoint.
pub async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    match state.metrics.render() {
        Ok(body) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(err) => {
            error!(error = %err, "Failed to render metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Accept a contact-form submission.
pub async fn submit(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let origin = header_str(&headers, header::ORIGIN);

    let Some(pipeline) = state.pipeline.as_ref() else {
        error!("Submission received but no store is configured");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "server_misconfigured");
    };

    let source_address = source_address(&headers);
    let decision = pipeline
        .admit(InboundRequest {
            body: &body,
            origin,
            source_address: &source_address,
            user_agent: header_str(&headers, header::USER_AGENT),
        })
        .await;

    match decision {
        Decision::Admitted(_) => ack_response(origin),
        Decision::Rejected(rejection) if state.config.stealth_mode || rejection.always_stealth() => {
            debug!(reason = rejection.code(), "Masking rejection");
            ack_response(origin)
        }
        Decision::Rejected(rejection) => rejection_response(&rejection),
    }
}

/// CORS preflight for the submission endpoint.
pub async fn preflight(headers: HeaderMap) -> Response {
    let mut response = StatusCode::NO_CONTENT.into_response();
    let out = response.headers_mut();
    echo_origin(out, header_str(&headers, header::ORIGIN));
    out.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    out.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    out.insert(
        header::ACCESS_CONTROL_MAX_AGE,
        HeaderValue::from_static(PREFLIGHT_MAX_AGE_SECS),
    );
    response
}

/// Any method other than POST or OPTIONS on the submission endpoint.
pub async fn method_not_allowed() -> Response {
    let mut response = error_response(StatusCode::METHOD_NOT_ALLOWED, "method_not_allowed");
    response
        .headers_mut()
        .insert(header::ALLOW, HeaderValue::from_static(ALLOWED_METHODS));
    response
}

fn ack_response(origin: Option<&str>) -> Response {
    let mut response = (StatusCode::OK, Json(AckResponse { ok: true })).into_response();
    echo_origin(response.headers_mut(), origin);
    response
}

fn rejection_response(rejection: &Rejection) -> Response {
    let mut response = error_response(rejection.status(), rejection.code());
    if let Rejection::RateLimited { retry_after } = rejection {
        if let Ok(value) = HeaderValue::from_str(&retry_after.as_secs().to_string()) {
            response.headers_mut().insert(header::RETRY_AFTER, value);
        }
    }
    response
}

fn error_response(status: StatusCode, code: &'static str) -> Response {
    (
        status,
        Json(ErrorResponse {
            ok: false,
            error: code,
        }),
    )
        .into_response()
}

fn echo_origin(headers: &mut HeaderMap, origin: Option<&str>) {
    if let Some(value) = origin.and_then(|o| HeaderValue::from_str(o).ok()) {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
        headers.insert(header::VARY, HeaderValue::from_static("Origin"));
    }
}

fn header_str(headers: &HeaderMap, name: HeaderName) -> Option<&str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Client address from proxy headers, canonicalized; `unknown` when absent
/// or unparseable.
pub fn source_address(headers: &HeaderMap) -> String {
    SOURCE_HEADERS
        .iter()
        .filter_map(|name| headers.get(*name).and_then(|v| v.to_str().ok()))
        .filter_map(|value| value.split(',').next())
        .find_map(|candidate| candidate.trim().parse::<IpAddr>().ok())
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
