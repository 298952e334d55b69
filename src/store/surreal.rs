// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! SurrealDB-backed store.
//!
//! Counters live at composite record ids `rate_counter:[tenant, source,
//! bucket]`; the uniqueness of the id replaces a separate unique index and a
//! single `UPSERT` statement performs the increment and returns the new value.
//!
//! The embedded engine does not serialize overlapping read-modify-write
//! transactions on one record: they either abort with a conflict or commit
//! the same value twice. Increments therefore run one at a time through
//! `counter_guard`, which covers every writer since the engine is in-process.

use super::{AuditStore, CounterKey, CounterStore, TenantStore};
use crate::error::{StoreError, StoreResult};
use crate::models::{SubmissionRecord, TenantConfig};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use surrealdb::{
    engine::local::{Db, Mem},
    Surreal,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Database connection wrapper
#[derive(Clone)]
pub struct SurrealStore {
    db: Surreal<Db>,
    counter_guard: Arc<Mutex<()>>,
}

/// Tenant as stored; integers are kept as `i64` to match SurrealDB numbers.
#[derive(Debug, Serialize, Deserialize)]
struct TenantRow {
    slug: String,
    allowed_origins: Vec<String>,
    notify_url: Option<String>,
    hourly_limit: Option<i64>,
    enabled: bool,
}

#[derive(Debug, Serialize)]
struct SubmissionRow {
    tenant: String,
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    company_name: Option<String>,
    contact_type: String,
    message: String,
    source_address: String,
    user_agent: Option<String>,
    created_at: String,
}

#[derive(Debug, Deserialize)]
struct HitsRow {
    hits: i64,
}

#[derive(Debug, Deserialize)]
struct TotalRow {
    total: i64,
}

impl From<TenantConfig> for TenantRow {
    fn from(tenant: TenantConfig) -> Self {
        Self {
            slug: tenant.slug,
            allowed_origins: tenant.allowed_origins.into_iter().collect(),
            notify_url: tenant.notify_url,
            hourly_limit: tenant.hourly_limit.map(i64::from),
            enabled: tenant.enabled,
        }
    }
}

impl TryFrom<TenantRow> for TenantConfig {
    type Error = StoreError;

    fn try_from(row: TenantRow) -> StoreResult<Self> {
        let hourly_limit = row
            .hourly_limit
            .map(u32::try_from)
            .transpose()
            .map_err(|_| StoreError::Corrupt(format!("hourly_limit out of range for {}", row.slug)))?;

        Ok(Self {
            slug: row.slug,
            allowed_origins: row.allowed_origins.into_iter().collect(),
            notify_url: row.notify_url,
            hourly_limit,
            enabled: row.enabled,
        })
    }
}

impl From<&SubmissionRecord> for SubmissionRow {
    fn from(record: &SubmissionRecord) -> Self {
        Self {
            tenant: record.tenant.clone(),
            name: record.name.clone(),
            email: record.email.clone(),
            phone: record.phone.clone(),
            company_name: record.company_name.clone(),
            contact_type: record.contact_type.as_str().to_string(),
            message: record.message.clone(),
            source_address: record.source_address.clone(),
            user_agent: record.user_agent.clone(),
            created_at: record.created_at.to_rfc3339(),
        }
    }
}

impl SurrealStore {
    /// Connect to SurrealDB. `memory` selects the in-memory engine; any
    /// other value is a RocksDB path and needs the `rocksdb` feature.
    pub async fn connect(path: &str) -> StoreResult<Self> {
        let db = if path == "memory" {
            Surreal::new::<Mem>(()).await?
        } else {
            Self::open_persistent(path).await?
        };

        db.use_ns("intake").use_db("gateway").await?;

        Self::init_schema(&db).await?;

        Ok(Self {
            db,
            counter_guard: Arc::new(Mutex::new(())),
        })
    }

    #[cfg(feature = "rocksdb")]
    async fn open_persistent(path: &str) -> StoreResult<Surreal<Db>> {
        Ok(Surreal::new::<surrealdb::engine::local::RocksDb>(path).await?)
    }

    #[cfg(not(feature = "rocksdb"))]
    async fn open_persistent(path: &str) -> StoreResult<Surreal<Db>> {
        Err(StoreError::Unavailable(format!(
            "persistent store at {path} requires the rocksdb feature"
        )))
    }

    /// Initialize database schema
    async fn init_schema(db: &Surreal<Db>) -> StoreResult<()> {
        db.query(
            r#"
            DEFINE TABLE IF NOT EXISTS tenant SCHEMALESS;
            DEFINE INDEX IF NOT EXISTS tenant_slug_idx ON tenant COLUMNS slug UNIQUE;

            DEFINE TABLE IF NOT EXISTS rate_counter SCHEMALESS;

            DEFINE TABLE IF NOT EXISTS submission SCHEMALESS;
            DEFINE INDEX IF NOT EXISTS submission_tenant_idx ON submission COLUMNS tenant;
        "#,
        )
        .await?
        .check()?;

        Ok(())
    }

    /// Create or replace a tenant. Used by seeding and tests; tenant
    /// administration is otherwise external.
    pub async fn put_tenant(&self, mut tenant: TenantConfig) -> StoreResult<()> {
        tenant.slug = tenant.slug.trim().to_lowercase();
        let slug = tenant.slug.clone();
        self.db
            .query("UPSERT type::thing('tenant', $slug) CONTENT $tenant")
            .bind(("slug", slug))
            .bind(("tenant", TenantRow::from(tenant)))
            .await?
            .check()?;
        Ok(())
    }

    /// Number of audit records stored for `tenant`.
    pub async fn submission_count(&self, tenant: &str) -> StoreResult<usize> {
        let mut result = self
            .db
            .query("SELECT count() AS total FROM submission WHERE tenant = $tenant GROUP ALL")
            .bind(("tenant", tenant.to_string()))
            .await?;
        let totals: Vec<TotalRow> = result.take(0)?;
        Ok(totals.first().map(|row| row.total.max(0) as usize).unwrap_or(0))
    }
}

#[async_trait]
impl TenantStore for SurrealStore {
    async fn fetch_tenant(&self, slug: &str) -> StoreResult<Option<TenantConfig>> {
        let mut result = self
            .db
            .query(
                "SELECT slug, allowed_origins, notify_url, hourly_limit, enabled \
                 FROM type::thing('tenant', $slug)",
            )
            .bind(("slug", slug.to_string()))
            .await?;

        let rows: Vec<TenantRow> = result.take(0)?;
        rows.into_iter().next().map(TenantConfig::try_from).transpose()
    }
}

#[async_trait]
impl CounterStore for SurrealStore {
    async fn increment(&self, key: &CounterKey) -> StoreResult<u64> {
        let _guard = self.counter_guard.lock().await;
        let mut result = self
            .db
            .query(
                "UPSERT type::thing('rate_counter', [$tenant, $source, $bucket]) \
                 SET tenant = $tenant, source = $source, bucket = $bucket, hits = (hits OR 0) + 1 \
                 RETURN hits",
            )
            .bind(("tenant", key.tenant.clone()))
            .bind(("source", key.source.clone()))
            .bind(("bucket", key.bucket.timestamp()))
            .await?;

        let rows: Vec<HitsRow> = result.take(0)?;
        let hits = rows
            .first()
            .map(|row| row.hits)
            .ok_or_else(|| StoreError::Corrupt("counter upsert returned no row".to_string()))?;

        debug!(tenant = %key.tenant, source = %key.source, hits, "Counter incremented");
        u64::try_from(hits).map_err(|_| StoreError::Corrupt(format!("negative counter {hits}")))
    }
}

#[async_trait]
impl AuditStore for SurrealStore {
    async fn append(&self, record: &SubmissionRecord) -> StoreResult<()> {
        self.db
            .query("CREATE type::thing('submission', $id) CONTENT $record")
            .bind(("id", record.id.to_string()))
            .bind(("record", SubmissionRow::from(record)))
            .await?
            .check()?;
        Ok(())
    }
}
