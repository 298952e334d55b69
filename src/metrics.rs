// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Prometheus counters for admission outcomes.
//!
//! These are for operators. Rejection reasons are visible here and in the
//! logs even when callers only ever see the uniform response.

use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    requests: IntCounterVec,
    side_effect_failures: IntCounterVec,
}

impl Metrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let requests = IntCounterVec::new(
            Opts::new("intake_requests_total", "Submissions by admission outcome"),
            &["outcome"],
        )?;
        let side_effect_failures = IntCounterVec::new(
            Opts::new(
                "intake_side_effect_failures_total",
                "Best-effort audit and notification failures",
            ),
            &["kind"],
        )?;

        registry.register(Box::new(requests.clone()))?;
        registry.register(Box::new(side_effect_failures.clone()))?;

        Ok(Self {
            registry,
            requests,
            side_effect_failures,
        })
    }

    /// Count one pipeline outcome (`admitted` or a rejection code).
    pub fn observe_outcome(&self, outcome: &str) {
        self.requests.with_label_values(&[outcome]).inc();
    }

    /// Count one failed best-effort side effect (`audit` or `notify`).
    pub fn observe_side_effect_failure(&self, kind: &str) {
        self.side_effect_failures.with_label_values(&[kind]).inc();
    }

    pub fn outcome_count(&self, outcome: &str) -> u64 {
        self.requests.with_label_values(&[outcome]).get()
    }

    /// Render all metrics in the Prometheus text format.
    pub fn render(&self) -> prometheus::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|err| prometheus::Error::Msg(err.to_string()))
    }
}
