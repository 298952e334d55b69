// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Outbound admission alerts.
//!
//! One webhook POST per admitted submission, no retry and no queue.

use crate::config::NotifyConfig;
use crate::error::NotifyError;
use crate::models::SubmissionRecord;
use async_trait::async_trait;
use std::fmt::Write as _;
use tracing::debug;
use url::Url;

/// What became of a notification that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The target acknowledged the alert
    Delivered,
    /// Delivery is switched off for the deployment; nothing was sent
    Disabled,
}

/// Delivers a text alert to a tenant's notification target.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, target: &str, message: &str) -> Result<Delivery, NotifyError>;
}

/// Webhook notifier posting `text/plain` bodies.
pub struct WebhookNotifier {
    client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(config: &NotifyConfig) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("contact-intake-gateway/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, target: &str, message: &str) -> Result<Delivery, NotifyError> {
        let url = parse_target(target)?;

        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(message.to_string())
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            debug!(status = status.as_u16(), "Webhook delivered");
            Ok(Delivery::Delivered)
        } else {
            Err(NotifyError::Status(status.as_u16()))
        }
    }
}

/// Notifier used when delivery is switched off for the deployment.
pub struct DisabledNotifier;

#[async_trait]
impl Notifier for DisabledNotifier {
    async fn notify(&self, target: &str, message: &str) -> Result<Delivery, NotifyError> {
        debug!(notify_target = target, bytes = message.len(), "Notification delivery disabled");
        Ok(Delivery::Disabled)
    }
}

fn parse_target(target: &str) -> Result<Url, NotifyError> {
    let url = Url::parse(target).map_err(|_| NotifyError::InvalidTarget(target.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(NotifyError::InvalidTarget(target.to_string()));
    }
    Ok(url)
}

/// Render the alert text for an admitted submission.
pub fn build_message(record: &SubmissionRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "New contact submission for {}", record.tenant);
    let _ = writeln!(out, "Type: {}", record.contact_type);

    let optional = [
        ("Name", &record.name),
        ("Email", &record.email),
        ("Phone", &record.phone),
        ("Company", &record.company_name),
    ];
    for (label, value) in optional {
        if let Some(value) = value {
            let _ = writeln!(out, "{label}: {value}");
        }
    }

    let _ = writeln!(out, "Source: {}", record.source_address);
    let _ = writeln!(out, "Received: {}", record.created_at.to_rfc3339());
    let _ = writeln!(out);
    out.push_str(&record.message);
    out
}
