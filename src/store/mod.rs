// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Storage collaborators used by the admission pipeline.
//!
//! Three narrow interfaces: keyed tenant lookup, an atomic
//! upsert-and-return-count counter, and an append-only audit log. Two
//! backends implement all of them: [`MemoryStore`] and [`SurrealStore`].

mod memory;
mod surreal;

pub use memory::MemoryStore;
pub use surreal::SurrealStore;

use crate::error::StoreResult;
use crate::models::{SubmissionRecord, TenantConfig};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Keyed lookup of tenant configuration.
#[async_trait]
pub trait TenantStore: Send + Sync {
    /// Fetch the tenant with the given (already normalized) slug.
    ///
    /// Returns `Ok(None)` when no such tenant exists.
    async fn fetch_tenant(&self, slug: &str) -> StoreResult<Option<TenantConfig>>;
}

/// Atomic counter store for rate limiting.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Increment the counter for `key` and return the post-increment count.
    ///
    /// Implementations must perform the increment and the read as one
    /// atomic operation: concurrent callers on the same key observe distinct,
    /// consecutive counts.
    async fn increment(&self, key: &CounterKey) -> StoreResult<u64>;
}

/// Append-only audit log of admitted submissions.
#[async_trait]
pub trait AuditStore: Send + Sync {
    async fn append(&self, record: &SubmissionRecord) -> StoreResult<()>;
}

/// Composite identity of a rate-limit counter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CounterKey {
    pub tenant: String,
    pub source: String,
    /// Start of the hour bucket
    pub bucket: DateTime<Utc>,
}

impl CounterKey {
    pub fn new(tenant: impl Into<String>, source: impl Into<String>, bucket: DateTime<Utc>) -> Self {
        Self {
            tenant: tenant.into(),
            source: source.into(),
            bucket,
        }
    }
}

/// Handles to the three collaborators, possibly backed by the same store.
#[derive(Clone)]
pub struct Backends {
    pub tenants: Arc<dyn TenantStore>,
    pub counters: Arc<dyn CounterStore>,
    pub audit: Arc<dyn AuditStore>,
}

impl Backends {
    /// Use one store for all three roles.
    pub fn shared<S>(store: Arc<S>) -> Self
    where
        S: TenantStore + CounterStore + AuditStore + 'static,
    {
        Self {
            tenants: store.clone(),
            counters: store.clone(),
            audit: store,
        }
    }
}
