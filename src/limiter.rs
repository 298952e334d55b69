// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Fixed-window rate limiter for contact submissions.
//!
//! Quota is counted per tenant, per source address, per wall-clock hour.
//! Every attempt that reaches the limiter increments its bucket, including
//! attempts that end up rejected, so retrying does not earn more quota.

use crate::error::StoreResult;
use crate::store::{CounterKey, CounterStore};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const BUCKET_SECS: i64 = 3600;

/// Result of a rate limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitResult {
    /// Request is allowed
    Allowed {
        /// Post-increment count in the current bucket
        count: u64,
        /// Remaining attempts in the current bucket
        remaining: u64,
    },
    /// Request is rate limited
    Limited {
        /// Post-increment count in the current bucket
        count: u64,
        /// Time until the next bucket opens
        retry_after: Duration,
    },
}

impl RateLimitResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitResult::Allowed { .. })
    }
}

/// Rate limiter backed by an atomic counter store.
#[derive(Clone)]
pub struct RateLimiter {
    counters: Arc<dyn CounterStore>,
    default_limit: u32,
}

impl RateLimiter {
    /// Create a limiter. `default_limit` applies when a caller passes zero.
    pub fn new(counters: Arc<dyn CounterStore>, default_limit: u32) -> Self {
        Self {
            counters,
            default_limit: default_limit.max(1),
        }
    }

    /// Count an attempt in the current hour and decide whether it is admitted.
    pub async fn try_admit(
        &self,
        tenant: &str,
        source: &str,
        hourly_limit: u32,
    ) -> StoreResult<RateLimitResult> {
        self.try_admit_at(tenant, source, hourly_limit, Utc::now()).await
    }

    /// Same as [`RateLimiter::try_admit`] with an explicit clock reading.
    ///
    /// The attempt is admitted iff the post-increment count is at most the
    /// limit. The increment is never undone.
    pub async fn try_admit_at(
        &self,
        tenant: &str,
        source: &str,
        hourly_limit: u32,
        now: DateTime<Utc>,
    ) -> StoreResult<RateLimitResult> {
        let limit = u64::from(if hourly_limit == 0 {
            self.default_limit
        } else {
            hourly_limit
        });
        let bucket = hour_bucket(now);
        let key = CounterKey::new(tenant, source, bucket);

        let count = self.counters.increment(&key).await?;

        if count <= limit {
            Ok(RateLimitResult::Allowed {
                count,
                remaining: limit - count,
            })
        } else {
            let retry_after = until_next_bucket(now, bucket);
            debug!(tenant, source, count, limit, ?retry_after, "Hourly quota exceeded");
            Ok(RateLimitResult::Limited { count, retry_after })
        }
    }
}

/// Truncate `now` to the start of its hour.
pub fn hour_bucket(now: DateTime<Utc>) -> DateTime<Utc> {
    let secs = now.timestamp();
    let start = secs - secs.rem_euclid(BUCKET_SECS);
    DateTime::from_timestamp(start, 0).unwrap_or(now)
}

fn until_next_bucket(now: DateTime<Utc>, bucket: DateTime<Utc>) -> Duration {
    let next = bucket.timestamp() + BUCKET_SECS;
    Duration::from_secs(u64::try_from(next - now.timestamp()).unwrap_or(0))
}
