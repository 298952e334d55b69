// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Tenant registry.
//!
//! Resolves a client-supplied tenant identifier to its configuration. Reads
//! always go to the store; nothing is cached between requests, so an
//! administrative change takes effect on the next request.

use crate::error::StoreResult;
use crate::models::TenantConfig;
use crate::store::TenantStore;
use std::sync::Arc;
use tracing::debug;

/// Longest slug accepted, in characters.
pub const MAX_SLUG_LEN: usize = 64;

/// Read-only view over the tenant store.
#[derive(Clone)]
pub struct TenantRegistry {
    store: Arc<dyn TenantStore>,
}

impl TenantRegistry {
    pub fn new(store: Arc<dyn TenantStore>) -> Self {
        Self { store }
    }

    /// Resolve `identifier` to a tenant.
    ///
    /// Returns `Ok(None)` for unknown slugs and for identifiers that are empty
    /// or longer than [`MAX_SLUG_LEN`] after normalization. Disabled tenants
    /// are returned as-is; the caller decides what `enabled = false` means.
    /// Store failures are propagated unchanged.
    pub async fn resolve(&self, identifier: &str) -> StoreResult<Option<TenantConfig>> {
        let Some(slug) = normalize_slug(identifier) else {
            debug!(len = identifier.len(), "Tenant identifier out of bounds");
            return Ok(None);
        };

        self.store.fetch_tenant(&slug).await
    }
}

/// Trim and lower-case a tenant identifier, rejecting empty or oversized ones.
pub fn normalize_slug(identifier: &str) -> Option<String> {
    let slug = identifier.trim().to_lowercase();
    if slug.is_empty() || slug.chars().count() > MAX_SLUG_LEN {
        None
    } else {
        Some(slug)
    }
}
