// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Intake Gateway
//!
//! A multi-tenant intake endpoint for contact-form submissions. Each request
//! goes through a fixed admission pipeline:
//!
//! - Honeypot detection on a decoy field
//! - Field validation and normalization
//! - Tenant resolution (unknown and disabled tenants fail closed)
//! - Exact-match origin allow-list per tenant
//! - Atomic per-tenant, per-source, per-hour rate limiting
//! - Best-effort audit record and webhook notification
//!
//! In stealth mode every rejection looks exactly like a success to the
//! caller; reasons are only visible in logs and metrics.

pub mod audit;
pub mod config;
pub mod error;
pub mod handlers;
pub mod limiter;
pub mod metrics;
pub mod models;
pub mod notifier;
pub mod pipeline;
pub mod registry;
pub mod store;
pub mod validator;

pub use config::Config;
pub use limiter::{RateLimitResult, RateLimiter};
pub use models::{ContactType, SubmissionRecord, TenantConfig};
pub use pipeline::{AdmissionPipeline, Decision, InboundRequest, Rejection};
pub use registry::TenantRegistry;
pub use store::{Backends, MemoryStore, SurrealStore};
