// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Admission pipeline.
//!
//! A linear state machine per request:
//!
//! 1. Parse the payload
//! 2. Honeypot check (before anything else is looked at)
//! 3. Field extraction
//! 4. Tenant resolution
//! 5. Origin check
//! 6. Rate limit
//! 7. Audit record and notification, both best-effort
//!
//! Each of steps 1–6 either moves on or ends the request with exactly one
//! [`Rejection`]. How a rejection is shown to the caller is decided by the
//! HTTP layer from the deployment's stealth setting.

use crate::audit::AuditSink;
use crate::config::Config;
use crate::limiter::{RateLimitResult, RateLimiter};
use crate::metrics::Metrics;
use crate::models::SubmissionRecord;
use crate::notifier::{build_message, Delivery, Notifier};
use crate::registry::TenantRegistry;
use crate::store::Backends;
use crate::validator::{RawSubmission, ValidationError, HONEYPOT_FIELD};
use axum::http::StatusCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Request attributes the pipeline needs, already lifted out of HTTP.
#[derive(Debug, Clone, Copy)]
pub struct InboundRequest<'a> {
    pub body: &'a [u8],
    pub origin: Option<&'a str>,
    pub source_address: &'a str,
    pub user_agent: Option<&'a str>,
}

/// Terminal state of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Admitted(Admission),
    Rejected(Rejection),
}

impl Decision {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Decision::Admitted(_))
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Decision::Admitted(_) => None,
            Decision::Rejected(rejection) => Some(rejection),
        }
    }
}

/// Outcome of the best-effort side effects of an admission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admission {
    pub record_id: Uuid,
    pub tenant: String,
    pub recorded: bool,
    /// Whether a delivery was attempted; `false` when the tenant has no target
    /// or delivery is disabled for the deployment
    pub notify_attempted: bool,
    /// Whether the target acknowledged the alert
    pub notified: bool,
}

/// Why a request was not admitted. Exactly one applies per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Body unparseable or a field out of bounds
    Invalid(ValidationError),
    /// Decoy field filled in
    Honeypot,
    UnknownTenant,
    TenantDisabled,
    /// Tenant store could not be reached
    TenantBackendUnavailable,
    /// Declared origin missing or not in the tenant's allow-list
    OriginNotAllowed,
    RateLimited { retry_after: Duration },
    /// Counter store could not be reached
    CounterBackendUnavailable,
}

impl Rejection {
    /// Machine-readable code, also used as the metrics label.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Invalid(err) => err.code(),
            Self::Honeypot => "honeypot",
            Self::UnknownTenant => "unknown_tenant",
            Self::TenantDisabled => "tenant_disabled",
            Self::TenantBackendUnavailable | Self::CounterBackendUnavailable => {
                "backend_unavailable"
            }
            Self::OriginNotAllowed => "origin_not_allowed",
            Self::RateLimited { .. } => "rate_limited",
        }
    }

    /// Status used when stealth mode is off.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Invalid(_) => StatusCode::BAD_REQUEST,
            Self::OriginNotAllowed => StatusCode::FORBIDDEN,
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::TenantBackendUnavailable | Self::CounterBackendUnavailable => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::Honeypot | Self::UnknownTenant | Self::TenantDisabled => StatusCode::OK,
        }
    }

    /// Rejections answered with the success shape whatever the deployment's
    /// stealth setting is.
    pub fn always_stealth(&self) -> bool {
        matches!(
            self,
            Self::Honeypot | Self::UnknownTenant | Self::TenantDisabled
        )
    }
}

/// Orchestrates registry, limiter, audit sink and notifier.
pub struct AdmissionPipeline {
    registry: TenantRegistry,
    limiter: RateLimiter,
    audit: AuditSink,
    notifier: Arc<dyn Notifier>,
    metrics: Metrics,
}

impl AdmissionPipeline {
    pub fn new(
        backends: Backends,
        notifier: Arc<dyn Notifier>,
        config: &Config,
        metrics: Metrics,
    ) -> Self {
        Self {
            registry: TenantRegistry::new(backends.tenants),
            limiter: RateLimiter::new(backends.counters, config.rate_limit.default_hourly_limit),
            audit: AuditSink::new(backends.audit),
            notifier,
            metrics,
        }
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Run one request through the pipeline.
    pub async fn admit(&self, request: InboundRequest<'_>) -> Decision {
        let decision = self.run(request).await;
        match &decision {
            Decision::Admitted(admission) => {
                info!(
                    tenant = %admission.tenant,
                    source = request.source_address,
                    record_id = %admission.record_id,
                    "Submission admitted"
                );
                self.metrics.observe_outcome("admitted");
            }
            Decision::Rejected(rejection) => {
                info!(
                    reason = rejection.code(),
                    source = request.source_address,
                    origin = ?request.origin,
                    "Submission rejected"
                );
                self.metrics.observe_outcome(rejection.code());
            }
        }
        decision
    }

    async fn run(&self, request: InboundRequest<'_>) -> Decision {
        // 1. ParseInput
        let raw = match RawSubmission::parse(request.body) {
            Ok(raw) => raw,
            Err(err) => return Decision::Rejected(Rejection::Invalid(err)),
        };

        // 2. HoneypotCheck
        if raw.honeypot_triggered() {
            debug!(field = HONEYPOT_FIELD, "Honeypot field populated");
            return Decision::Rejected(Rejection::Honeypot);
        }

        // 3. ExtractFields
        let fields = match raw.extract() {
            Ok(fields) => fields,
            Err(err) => return Decision::Rejected(Rejection::Invalid(err)),
        };

        // 4. TenantResolve
        let tenant = match self.registry.resolve(&fields.tenant).await {
            Ok(Some(tenant)) if tenant.enabled => tenant,
            Ok(Some(tenant)) => {
                debug!(tenant = %tenant.slug, "Tenant disabled");
                return Decision::Rejected(Rejection::TenantDisabled);
            }
            Ok(None) => return Decision::Rejected(Rejection::UnknownTenant),
            Err(err) => {
                warn!(error = %err, "Tenant store unavailable");
                return Decision::Rejected(Rejection::TenantBackendUnavailable);
            }
        };

        // 5. OriginCheck
        match request.origin {
            Some(origin) if tenant.allows_origin(origin) => {}
            _ => {
                debug!(tenant = %tenant.slug, origin = ?request.origin, "Origin not allowed");
                return Decision::Rejected(Rejection::OriginNotAllowed);
            }
        }

        // 6. RateLimit
        // Zero lets the limiter apply the deployment default.
        let limit = tenant.effective_limit(0);
        match self
            .limiter
            .try_admit(&tenant.slug, request.source_address, limit)
            .await
        {
            Ok(RateLimitResult::Allowed { remaining, .. }) => {
                debug!(tenant = %tenant.slug, remaining, "Within hourly quota");
            }
            Ok(RateLimitResult::Limited { retry_after, .. }) => {
                return Decision::Rejected(Rejection::RateLimited { retry_after });
            }
            Err(err) => {
                warn!(error = %err, "Counter store unavailable");
                return Decision::Rejected(Rejection::CounterBackendUnavailable);
            }
        }

        // 7. Persist + Notify
        let record = SubmissionRecord::new(
            &tenant,
            fields,
            request.source_address,
            request.user_agent.map(str::to_string),
        );

        let recorded = self.audit.record(&record).await;
        if !recorded {
            self.metrics.observe_side_effect_failure("audit");
        }

        let (notify_attempted, notified) = match tenant.notify_url.as_deref() {
            Some(target) if !target.trim().is_empty() => {
                let message = build_message(&record);
                match self.notifier.notify(target, &message).await {
                    Ok(Delivery::Delivered) => (true, true),
                    Ok(Delivery::Disabled) => (false, false),
                    Err(err) => {
                        warn!(tenant = %tenant.slug, error = %err, "Notification failed");
                        self.metrics.observe_side_effect_failure("notify");
                        (true, false)
                    }
                }
            }
            _ => {
                debug!(tenant = %tenant.slug, "No notification target configured");
                (false, false)
            }
        };

        // 8. ADMIT
        Decision::Admitted(Admission {
            record_id: record.id,
            tenant: tenant.slug,
            recorded,
            notify_attempted,
            notified,
        })
    }
}
