// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error types for the intake gateway collaborators.

use thiserror::Error;

/// Failures reported by a backing store.
///
/// Every variant means the store could not answer. The pipeline fails closed
/// on all of them.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    Database(#[from] surrealdb::Error),

    #[error("Corrupt store data: {0}")]
    Corrupt(String),
}

/// Failures reported by a notification delivery.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Webhook transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Webhook returned status {0}")]
    Status(u16),

    #[error("Invalid webhook target: {0}")]
    InvalidTarget(String),
}

/// Result type alias for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;
