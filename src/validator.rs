// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact submission parsing and field validation.
//!
//! Implements the input stages of admission:
//! - Payload parsing (JSON object with string fields)
//! - Honeypot detection on the decoy `website` field
//! - Field extraction: trimming, length bounds, email shape and case,
//!   contact-type coercion

use crate::models::{ContactFields, ContactType};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Name of the decoy field legitimate clients leave empty.
pub const HONEYPOT_FIELD: &str = "website";

pub const MAX_NAME_LEN: usize = 120;
pub const MAX_EMAIL_LEN: usize = 180;
pub const MAX_PHONE_LEN: usize = 50;
pub const MAX_COMPANY_LEN: usize = 160;
pub const MAX_MESSAGE_LEN: usize = 4000;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Malformed payload: {0}")]
    Malformed(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Field {field} exceeds {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("Invalid email address")]
    InvalidEmail,
}

impl ValidationError {
    /// Machine-readable code for non-stealth responses.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Malformed(_) => "malformed_payload",
            Self::MissingField(_) => "missing_field",
            Self::TooLong { .. } => "field_too_long",
            Self::InvalidEmail => "invalid_email",
        }
    }
}

/// Submission payload exactly as sent by the client.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RawSubmission {
    #[serde(default)]
    pub tenant: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub contact_type: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, rename = "website")]
    pub honeypot: Option<String>,
}

impl RawSubmission {
    /// Parse a request body. Anything other than a JSON object whose known
    /// fields are strings or null is malformed.
    ///
    /// A filled decoy field of any JSON type short-circuits typed parsing:
    /// the result carries only the decoy, so the honeypot check sees it even
    /// when other fields are ill-typed.
    pub fn parse(body: &[u8]) -> Result<Self, ValidationError> {
        let value: serde_json::Value = serde_json::from_slice(body).map_err(|err| {
            debug!(error = %err, "Unparseable submission body");
            ValidationError::Malformed(err.to_string())
        })?;
        if !value.is_object() {
            return Err(ValidationError::Malformed("body is not a JSON object".to_string()));
        }
        if let Some(decoy) = value.get(HONEYPOT_FIELD).and_then(decoy_text) {
            return Ok(Self {
                honeypot: Some(decoy),
                ..Default::default()
            });
        }
        serde_json::from_value(value).map_err(|err| {
            debug!(error = %err, "Submission fields have wrong types");
            ValidationError::Malformed(err.to_string())
        })
    }

    /// Whether the decoy field carries any value at all.
    pub fn honeypot_triggered(&self) -> bool {
        self.honeypot.as_deref().is_some_and(|value| !value.is_empty())
    }

    /// Normalize and bound every field.
    pub fn extract(&self) -> Result<ContactFields, ValidationError> {
        let tenant = required(&self.tenant, "tenant")?;
        let name = optional(&self.name, "name", MAX_NAME_LEN)?;
        let phone = optional(&self.phone, "phone", MAX_PHONE_LEN)?;
        let company_name = optional(&self.company_name, "company_name", MAX_COMPANY_LEN)?;

        let email = optional(&self.email, "email", MAX_EMAIL_LEN)?
            .map(|email| email.to_lowercase());
        if let Some(email) = &email {
            if !is_loose_email(email) {
                debug!("Email failed shape check");
                return Err(ValidationError::InvalidEmail);
            }
        }

        let message = required(&self.message, "message")?;
        check_len(&message, "message", MAX_MESSAGE_LEN)?;

        Ok(ContactFields {
            tenant,
            name,
            email,
            phone,
            company_name,
            contact_type: ContactType::coerce(self.contact_type.as_deref()),
            message,
        })
    }
}

fn trimmed(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Text of a filled decoy field; `None` when it is `null` or `""`.
fn decoy_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(text) if text.is_empty() => None,
        serde_json::Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

fn required(value: &Option<String>, field: &'static str) -> Result<String, ValidationError> {
    trimmed(value).ok_or(ValidationError::MissingField(field))
}

fn optional(
    value: &Option<String>,
    field: &'static str,
    max: usize,
) -> Result<Option<String>, ValidationError> {
    match trimmed(value) {
        Some(v) => {
            check_len(&v, field, max)?;
            Ok(Some(v))
        }
        None => Ok(None),
    }
}

fn check_len(value: &str, field: &'static str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        debug!(field, max, "Field too long");
        Err(ValidationError::TooLong { field, max })
    } else {
        Ok(())
    }
}

/// Loose `local@domain.tld` check: one `@`, no whitespace, a non-empty local
/// part and a domain with a dot that is neither leading nor trailing.
pub fn is_loose_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty() && !host.ends_with('.'),
        None => false,
    }
}
