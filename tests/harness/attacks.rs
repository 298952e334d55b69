// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Attack simulation patterns for security testing.

#![allow(dead_code)]

/// Attack pattern configuration.
#[derive(Debug, Clone)]
pub struct AttackConfig {
    /// Total number of requests to send
    pub total_requests: usize,
    /// Number of unique source addresses to simulate
    pub unique_ips: usize,
    /// Fraction of requests with the decoy field filled (0.0-1.0)
    pub honeypot_ratio: f64,
    /// Fraction of requests sent from a foreign origin (0.0-1.0)
    pub foreign_origin_ratio: f64,
    /// Whether requests name a tenant that exists
    pub known_tenant: bool,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            total_requests: 100,
            unique_ips: 1,
            honeypot_ratio: 0.0,
            foreign_origin_ratio: 0.0,
            known_tenant: true,
        }
    }
}

/// Predefined attack patterns.
impl AttackConfig {
    /// Single source flood against one tenant.
    pub fn single_ip_flood() -> Self {
        Self {
            total_requests: 200,
            unique_ips: 1,
            ..Default::default()
        }
    }

    /// Distributed flood - many sources, a few requests each.
    pub fn distributed_flood() -> Self {
        Self {
            total_requests: 500,
            unique_ips: 100,
            ..Default::default()
        }
    }

    /// Form-filling bot that populates every field, decoy included.
    pub fn honeypot_bot() -> Self {
        Self {
            total_requests: 100,
            unique_ips: 20,
            honeypot_ratio: 1.0,
            ..Default::default()
        }
    }

    /// Direct API posting from a non-allowed origin.
    pub fn origin_spoof() -> Self {
        Self {
            total_requests: 100,
            unique_ips: 10,
            foreign_origin_ratio: 1.0,
            ..Default::default()
        }
    }

    /// Tenant enumeration with made-up slugs.
    pub fn tenant_probe() -> Self {
        Self {
            total_requests: 50,
            unique_ips: 5,
            known_tenant: false,
            ..Default::default()
        }
    }

    /// Legitimate traffic mixed with bot and spoofed traffic.
    pub fn mixed_traffic() -> Self {
        Self {
            total_requests: 300,
            unique_ips: 60,
            honeypot_ratio: 0.3,
            foreign_origin_ratio: 0.2,
            ..Default::default()
        }
    }
}

/// Simple deterministic "random" based on index and ratio.
pub fn rand_bool(ratio: f64, index: usize) -> bool {
    if ratio >= 1.0 {
        true
    } else if ratio <= 0.0 {
        false
    } else {
        (index as f64 * 0.618033988749895) % 1.0 < ratio
    }
}
