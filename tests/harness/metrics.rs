// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Metrics collection for attack simulation results.

#![allow(dead_code)]

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Collects metrics during attack simulation.
#[derive(Debug, Default)]
pub struct AttackMetrics {
    /// Start time of the attack
    start_time: Option<Instant>,
    /// End time of the attack
    end_time: Option<Instant>,
    /// Count of requests by outcome
    outcomes: HashMap<Outcome, usize>,
    /// Count of requests by source address
    requests_per_ip: HashMap<String, usize>,
    /// Latency samples (microseconds)
    latencies: Vec<u64>,
}

/// Possible outcomes for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Admitted,
    Honeypot,
    Invalid,
    UnknownTenant,
    OriginRejected,
    RateLimited,
    BackendUnavailable,
}

impl AttackMetrics {
    /// Create a new metrics collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the start of an attack.
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Mark the end of an attack.
    pub fn finish(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Record a request outcome.
    pub fn record(&mut self, outcome: Outcome, ip: &str, latency: Duration) {
        *self.outcomes.entry(outcome).or_insert(0) += 1;
        *self.requests_per_ip.entry(ip.to_string()).or_insert(0) += 1;
        self.latencies.push(latency.as_micros() as u64);
    }

    /// Get total request count.
    pub fn total_requests(&self) -> usize {
        self.outcomes.values().sum()
    }

    /// Get count for a specific outcome.
    pub fn count(&self, outcome: Outcome) -> usize {
        self.outcomes.get(&outcome).copied().unwrap_or(0)
    }

    /// Get duration of the attack.
    pub fn duration(&self) -> Duration {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => end.duration_since(start),
            (Some(start), None) => start.elapsed(),
            _ => Duration::ZERO,
        }
    }

    /// Get block rate (ratio of blocked to total).
    pub fn block_rate(&self) -> f64 {
        let total = self.total_requests();
        if total == 0 {
            return 0.0;
        }
        let admitted = self.count(Outcome::Admitted);
        (total - admitted) as f64 / total as f64
    }

    /// Get median latency in microseconds.
    pub fn median_latency_us(&self) -> u64 {
        if self.latencies.is_empty() {
            return 0;
        }
        let mut sorted = self.latencies.clone();
        sorted.sort_unstable();
        sorted[sorted.len() / 2]
    }

    /// Get number of unique source addresses that made requests.
    pub fn unique_ips(&self) -> usize {
        self.requests_per_ip.len()
    }

    /// Generate a summary report.
    pub fn report(&self) -> MetricsReport {
        MetricsReport {
            total_requests: self.total_requests(),
            admitted: self.count(Outcome::Admitted),
            honeypot: self.count(Outcome::Honeypot),
            invalid: self.count(Outcome::Invalid),
            unknown_tenant: self.count(Outcome::UnknownTenant),
            origin_rejected: self.count(Outcome::OriginRejected),
            rate_limited: self.count(Outcome::RateLimited),
            duration_ms: self.duration().as_millis() as u64,
            block_rate: self.block_rate(),
            median_latency_us: self.median_latency_us(),
            unique_ips: self.unique_ips(),
        }
    }
}

/// Summary report of attack metrics.
#[derive(Debug, Clone)]
pub struct MetricsReport {
    pub total_requests: usize,
    pub admitted: usize,
    pub honeypot: usize,
    pub invalid: usize,
    pub unknown_tenant: usize,
    pub origin_rejected: usize,
    pub rate_limited: usize,
    pub duration_ms: u64,
    pub block_rate: f64,
    pub median_latency_us: u64,
    pub unique_ips: usize,
}

impl std::fmt::Display for MetricsReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Attack Metrics Report ===")?;
        writeln!(f, "Duration:          {} ms", self.duration_ms)?;
        writeln!(f, "Total Requests:    {}", self.total_requests)?;
        writeln!(f)?;
        writeln!(f, "--- Outcomes ---")?;
        writeln!(f, "Admitted:          {}", self.admitted)?;
        writeln!(f, "Honeypot:          {}", self.honeypot)?;
        writeln!(f, "Invalid:           {}", self.invalid)?;
        writeln!(f, "Unknown Tenant:    {}", self.unknown_tenant)?;
        writeln!(f, "Origin Rejected:   {}", self.origin_rejected)?;
        writeln!(f, "Rate Limited:      {}", self.rate_limited)?;
        writeln!(f, "Block Rate:        {:.1}%", self.block_rate * 100.0)?;
        writeln!(f)?;
        writeln!(f, "Median Latency:    {} us", self.median_latency_us)?;
        writeln!(f, "Unique IPs:        {}", self.unique_ips)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_rate() {
        let mut metrics = AttackMetrics::new();
        for _ in 0..3 {
            metrics.record(Outcome::Admitted, "10.0.0.1", Duration::ZERO);
        }
        for _ in 0..7 {
            metrics.record(Outcome::RateLimited, "10.0.0.1", Duration::ZERO);
        }

        assert!((metrics.block_rate() - 0.7).abs() < 0.01);
        assert_eq!(metrics.unique_ips(), 1);
    }
}
