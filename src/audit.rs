// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Best-effort audit sink for admitted submissions.

use crate::models::SubmissionRecord;
use crate::store::AuditStore;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct AuditSink {
    store: Arc<dyn AuditStore>,
}

impl AuditSink {
    pub fn new(store: Arc<dyn AuditStore>) -> Self {
        Self { store }
    }

    /// Append `record` to the audit log. Returns whether the write succeeded;
    /// failures are logged and never surface to the caller of the pipeline.
    pub async fn record(&self, record: &SubmissionRecord) -> bool {
        match self.store.append(record).await {
            Ok(()) => {
                debug!(id = %record.id, tenant = %record.tenant, "Submission recorded");
                true
            }
            Err(err) => {
                warn!(
                    id = %record.id,
                    tenant = %record.tenant,
                    error = %err,
                    "Failed to record submission"
                );
                false
            }
        }
    }
}
