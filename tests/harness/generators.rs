// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test data generators for attack simulation.

#![allow(dead_code)]

use std::net::{IpAddr, Ipv4Addr};

/// Generate a pool of IP addresses for testing.
pub fn generate_ips(count: usize) -> Vec<IpAddr> {
    (0..count)
        .map(|i| {
            // Use 10.x.x.x private range
            let a = ((i >> 16) & 0xFF) as u8;
            let b = ((i >> 8) & 0xFF) as u8;
            let c = (i & 0xFF) as u8;
            IpAddr::V4(Ipv4Addr::new(10, a, b, c))
        })
        .collect()
}

/// A well-formed submission for `tenant`, varied by `index`.
pub fn generate_payload(tenant: &str, index: usize) -> serde_json::Value {
    serde_json::json!({
        "tenant": tenant,
        "name": format!("Visitor {index}"),
        "email": format!("visitor{index}@example.com"),
        "contact_type": (["budget_request", "general_query", "commercial_proposal", "other"][index % 4]),
        "message": format!("Message number {index}"),
        "website": ""
    })
}

/// Values a form-filling bot typically puts in the decoy field.
pub fn generate_honeypot_values() -> Vec<&'static str> {
    vec![
        "https://cheap-pills.example",
        "http://seo-boost.example/?ref=1",
        "www.example.com",
        " ",
        "0",
        "false",
    ]
}

/// Near misses of `allowed` that an exact origin match must reject.
pub fn generate_spoofed_origins(allowed: &str) -> Vec<String> {
    let host = allowed
        .trim_start_matches("https://")
        .trim_start_matches("http://");
    vec![
        format!("{allowed}/"),
        format!("http://{host}"),
        format!("https://{}", host.to_uppercase()),
        format!("https://www.{host}"),
        format!("https://{host}:443"),
        format!("https://{host}.evil.example"),
        format!(" {allowed}"),
        "null".to_string(),
        "https://evil.example".to_string(),
    ]
}

/// Payloads that must fail parsing or field validation.
pub fn generate_invalid_payloads(tenant: &str) -> Vec<serde_json::Value> {
    vec![
        serde_json::json!([tenant]),
        serde_json::json!("just a string"),
        serde_json::json!({"tenant": tenant}),
        serde_json::json!({"tenant": tenant, "message": "   "}),
        serde_json::json!({"tenant": tenant, "message": 42}),
        serde_json::json!({"tenant": tenant, "message": "hi", "email": "nope"}),
        serde_json::json!({"tenant": tenant, "message": "x".repeat(4001)}),
        serde_json::json!({"tenant": tenant, "message": "hi", "name": "n".repeat(121)}),
        serde_json::json!({"message": "hi"}),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_ips() {
        let ips = generate_ips(256);
        assert_eq!(ips.len(), 256);
        // All should be unique
        let unique: std::collections::HashSet<_> = ips.iter().collect();
        assert_eq!(unique.len(), 256);
    }

    #[test]
    fn test_spoofed_origins_never_equal_allowed() {
        let allowed = "https://site.example";
        assert!(generate_spoofed_origins(allowed)
            .iter()
            .all(|origin| origin != allowed));
    }
}
