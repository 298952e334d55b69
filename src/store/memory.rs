// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! In-process store for tests and single-instance development.
//!
//! The counter map sits behind one mutex, so increment-and-read is a single
//! critical section. This gives the atomic upsert semantics within one
//! process only; multi-instance deployments need [`super::SurrealStore`].

use super::{AuditStore, CounterKey, CounterStore, TenantStore};
use crate::error::{StoreError, StoreResult};
use crate::models::{SubmissionRecord, TenantConfig};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Thread-safe in-memory store.
#[derive(Default)]
pub struct MemoryStore {
    tenants: Arc<RwLock<HashMap<String, TenantConfig>>>,
    counters: Arc<Mutex<HashMap<CounterKey, u64>>>,
    submissions: Arc<RwLock<Vec<SubmissionRecord>>>,
    tenants_offline: AtomicBool,
    counters_offline: AtomicBool,
    audit_offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a tenant. The slug is stored lower-cased.
    pub async fn put_tenant(&self, mut tenant: TenantConfig) {
        tenant.slug = tenant.slug.trim().to_lowercase();
        self.tenants.write().await.insert(tenant.slug.clone(), tenant);
    }

    /// Current value of a counter, if it exists.
    pub async fn counter(&self, key: &CounterKey) -> Option<u64> {
        self.counters.lock().await.get(key).copied()
    }

    /// Snapshot of the audit log.
    pub async fn submissions(&self) -> Vec<SubmissionRecord> {
        self.submissions.read().await.clone()
    }

    /// Make tenant lookups fail as if the store were unreachable.
    pub fn set_tenants_offline(&self, offline: bool) {
        self.tenants_offline.store(offline, Ordering::SeqCst);
    }

    /// Make counter increments fail as if the store were unreachable.
    pub fn set_counters_offline(&self, offline: bool) {
        self.counters_offline.store(offline, Ordering::SeqCst);
    }

    /// Make audit appends fail as if the store were unreachable.
    pub fn set_audit_offline(&self, offline: bool) {
        self.audit_offline.store(offline, Ordering::SeqCst);
    }
}

fn check_online(flag: &AtomicBool, what: &str) -> StoreResult<()> {
    if flag.load(Ordering::SeqCst) {
        Err(StoreError::Unavailable(format!("{what} store offline")))
    } else {
        Ok(())
    }
}

#[async_trait]
impl TenantStore for MemoryStore {
    async fn fetch_tenant(&self, slug: &str) -> StoreResult<Option<TenantConfig>> {
        check_online(&self.tenants_offline, "tenant")?;
        Ok(self.tenants.read().await.get(slug).cloned())
    }
}

#[async_trait]
impl CounterStore for MemoryStore {
    async fn increment(&self, key: &CounterKey) -> StoreResult<u64> {
        check_online(&self.counters_offline, "counter")?;
        let mut counters = self.counters.lock().await;
        let count = counters.entry(key.clone()).or_insert(0);
        *count += 1;
        Ok(*count)
    }
}

#[async_trait]
impl AuditStore for MemoryStore {
    async fn append(&self, record: &SubmissionRecord) -> StoreResult<()> {
        check_online(&self.audit_offline, "audit")?;
        self.submissions.write().await.push(record.clone());
        Ok(())
    }
}
