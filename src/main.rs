// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Intake Gateway Service
//!
//! Public endpoint for contact-form submissions from many tenant sites.
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables (a `.env` file is
//! honoured):
//!
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:8080)
//! - `STEALTH_MODE`: Mask rejection reasons from callers (default: true)
//! - `DEFAULT_HOURLY_LIMIT`: Quota for tenants without one (default: 10)
//! - `NOTIFY_ENABLED`: Deliver webhook notifications (default: true)
//! - `NOTIFY_TIMEOUT_MS`: Webhook timeout in milliseconds (default: 5000)
//! - `STORE_PATH`: `memory` or a RocksDB path (default: memory)
//! - `TENANTS_FILE`: JSON array of tenants to load at startup
//! - `METRICS_ENABLED`: Expose Prometheus metrics (default: true)
//! - `METRICS_PATH`: Metrics endpoint path (default: /metrics)

use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use contact_intake_gateway::{
    config::{Config, MetricsConfig, NotifyConfig, RateLimitConfig, StoreConfig},
    handlers::{router, AppState},
    metrics::Metrics,
    models::TenantConfig,
    notifier::{DisabledNotifier, Notifier, WebhookNotifier},
    store::{Backends, SurrealStore},
    AdmissionPipeline,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Load configuration
    let config = load_config();
    info!(
        bind_addr = %config.bind_addr,
        stealth_mode = config.stealth_mode,
        default_hourly_limit = config.rate_limit.default_hourly_limit,
        notify_enabled = config.notify.enabled,
        store = %config.store.path,
        "Starting contact intake gateway"
    );

    let metrics = Metrics::new().context("failed to register metrics")?;

    let notifier: Arc<dyn Notifier> = if config.notify.enabled {
        Arc::new(WebhookNotifier::new(&config.notify).context("failed to build webhook client")?)
    } else {
        warn!("Webhook notifications disabled for this deployment");
        Arc::new(DisabledNotifier)
    };

    // A store that cannot be opened leaves the service up but answering 500
    let pipeline = match open_store(&config.store).await {
        Ok(store) => {
            info!("Store ready");
            Some(AdmissionPipeline::new(
                Backends::shared(Arc::new(store)),
                notifier,
                &config,
                metrics.clone(),
            ))
        }
        Err(err) => {
            error!(error = %err, "Store unavailable, submissions will be refused");
            None
        }
    };

    let state = Arc::new(AppState {
        pipeline,
        config: config.clone(),
        metrics,
    });

    let app = router(state);

    // Start server
    let addr: SocketAddr = config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Open the store and load any tenants listed in the seed file.
async fn open_store(config: &StoreConfig) -> anyhow::Result<SurrealStore> {
    let store = SurrealStore::connect(&config.path).await?;

    if let Some(path) = &config.tenants_file {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read tenants file {path}"))?;
        let tenants: Vec<TenantConfig> =
            serde_json::from_str(&raw).with_context(|| format!("invalid tenants file {path}"))?;
        let count = tenants.len();
        for tenant in tenants {
            store.put_tenant(tenant).await?;
        }
        info!(count, path = %path, "Loaded tenants");
    }

    Ok(store)
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Load configuration from environment variables.
fn load_config() -> Config {
    let defaults = Config::default();
    Config {
        bind_addr: std::env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
        stealth_mode: env_or("STEALTH_MODE", defaults.stealth_mode),
        rate_limit: RateLimitConfig {
            default_hourly_limit: env_or(
                "DEFAULT_HOURLY_LIMIT",
                defaults.rate_limit.default_hourly_limit,
            ),
        },
        notify: NotifyConfig {
            enabled: env_or("NOTIFY_ENABLED", defaults.notify.enabled),
            timeout_ms: env_or("NOTIFY_TIMEOUT_MS", defaults.notify.timeout_ms),
        },
        store: StoreConfig {
            path: std::env::var("STORE_PATH").unwrap_or(defaults.store.path),
            tenants_file: std::env::var("TENANTS_FILE").ok(),
        },
        metrics: MetricsConfig {
            enabled: env_or("METRICS_ENABLED", defaults.metrics.enabled),
            path: std::env::var("METRICS_PATH").unwrap_or(defaults.metrics.path),
        },
    }
}
