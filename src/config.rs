// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the contact intake gateway.
//!
//! Everything here is per deployment. Per-tenant settings (origins, quota,
//! notification target) live in the tenant store, not in this file.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the intake gateway service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Answer every abuse or validation rejection with the success shape
    /// (default: true)
    #[serde(default = "default_true")]
    pub stealth_mode: bool,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Outbound notification configuration
    #[serde(default)]
    pub notify: NotifyConfig,

    /// Backing store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Metrics configuration
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Hourly quota applied when a tenant has none configured (default: 10)
    #[serde(default = "default_hourly_limit")]
    pub default_hourly_limit: u32,
}

/// Webhook notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Deliver notifications to tenant webhooks (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Per-delivery timeout in milliseconds (default: 5000)
    #[serde(default = "default_notify_timeout_ms")]
    pub timeout_ms: u64,
}

/// Store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// `memory` for the embedded in-memory engine, otherwise a RocksDB path
    #[serde(default = "default_store_path")]
    pub path: String,

    /// Optional JSON file with tenant configurations to load at startup
    #[serde(default)]
    pub tenants_file: Option<String>,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics endpoint (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Metrics endpoint path (default: /metrics)
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

// Default value functions
fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_hourly_limit() -> u32 {
    10
}

fn default_notify_timeout_ms() -> u64 {
    5000
}

fn default_store_path() -> String {
    "memory".to_string()
}

fn default_true() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            stealth_mode: default_true(),
            rate_limit: RateLimitConfig::default(),
            notify: NotifyConfig::default(),
            store: StoreConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            default_hourly_limit: default_hourly_limit(),
        }
    }
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            timeout_ms: default_notify_timeout_ms(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            tenants_file: None,
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_metrics_path(),
        }
    }
}

impl NotifyConfig {
    /// Get the delivery timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
