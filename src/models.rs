// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Data model shared by the registry, limiter and audit sink.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

/// Per-tenant configuration, owned by the tenant store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantConfig {
    /// Lower-case tenant slug
    pub slug: String,
    /// Exact `scheme://host[:port]` origins allowed to submit
    #[serde(default)]
    pub allowed_origins: BTreeSet<String>,
    /// Webhook target for admission alerts
    #[serde(default)]
    pub notify_url: Option<String>,
    /// Submissions allowed per source address per hour; unset or zero means
    /// the deployment default
    #[serde(default)]
    pub hourly_limit: Option<u32>,
    #[serde(default)]
    pub enabled: bool,
}

impl TenantConfig {
    /// Build an enabled tenant with no origins and the default quota.
    pub fn new(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            allowed_origins: BTreeSet::new(),
            notify_url: None,
            hourly_limit: None,
            enabled: true,
        }
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.allowed_origins.insert(origin.into());
        self
    }

    pub fn with_notify_url(mut self, url: impl Into<String>) -> Self {
        self.notify_url = Some(url.into());
        self
    }

    pub fn with_hourly_limit(mut self, limit: u32) -> Self {
        self.hourly_limit = Some(limit);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Exact string match against the allow-list.
    pub fn allows_origin(&self, origin: &str) -> bool {
        self.allowed_origins.contains(origin)
    }

    /// Effective hourly quota, falling back to `default` when unset.
    pub fn effective_limit(&self, default: u32) -> u32 {
        match self.hourly_limit {
            Some(limit) if limit > 0 => limit,
            _ => default,
        }
    }
}

/// What the visitor is contacting the tenant about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactType {
    BudgetRequest,
    #[default]
    GeneralQuery,
    CommercialProposal,
    Other,
}

impl ContactType {
    /// Coerce free-form input into the closed set. Unknown or missing values
    /// become [`ContactType::GeneralQuery`].
    pub fn coerce(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };
        match raw.trim().to_ascii_lowercase().as_str() {
            "budget_request" => Self::BudgetRequest,
            "general_query" => Self::GeneralQuery,
            "commercial_proposal" => Self::CommercialProposal,
            "other" => Self::Other,
            _ => Self::default(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BudgetRequest => "budget_request",
            Self::GeneralQuery => "general_query",
            Self::CommercialProposal => "commercial_proposal",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ContactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized contact fields extracted from a submission payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactFields {
    pub tenant: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    pub contact_type: ContactType,
    pub message: String,
}

/// Append-only audit entry for an admitted submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub id: Uuid,
    pub tenant: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    pub contact_type: ContactType,
    pub message: String,
    pub source_address: String,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl SubmissionRecord {
    /// Build a record for `tenant` from admitted fields.
    pub fn new(
        tenant: &TenantConfig,
        fields: ContactFields,
        source_address: impl Into<String>,
        user_agent: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tenant: tenant.slug.clone(),
            name: fields.name,
            email: fields.email,
            phone: fields.phone,
            company_name: fields.company_name,
            contact_type: fields.contact_type,
            message: fields.message,
            source_address: source_address.into(),
            user_agent,
            created_at: Utc::now(),
        }
    }
}
