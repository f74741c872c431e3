//! Contact form submissions.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

/// Maximum number of characters of the free-text message kept in the log.
pub const MESSAGE_LOG_LIMIT: usize = 500;

/// Name used when the submission does not carry one.
pub const DEFAULT_NAME: &str = "Guest";

/// A contact form submission. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactSubmission {
    pub name: String,
    pub phone: String,
    pub consultation: String,
    pub course: String,
    pub message: String,
}

impl Default for ContactSubmission {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            phone: String::new(),
            consultation: String::new(),
            course: String::new(),
            message: String::new(),
        }
    }
}

/// One audit log entry for a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactAuditRecord {
    /// RFC 3339 UTC timestamp.
    pub at: String,
    pub name: String,
    pub phone: String,
    pub consultation: String,
    pub course: String,
    /// Message truncated to [`MESSAGE_LOG_LIMIT`] characters.
    pub message: String,
}

impl ContactSubmission {
    /// Build a submission from a field lookup, applying defaults.
    pub fn from_fields<'a>(get: impl Fn(&str) -> Option<&'a str>) -> Self {
        let defaults = Self::default();
        let field = |key: &str, default: String| get(key).map_or(default, str::to_string);

        Self {
            name: field("name", defaults.name),
            phone: field("phone", defaults.phone),
            consultation: field("consultation", defaults.consultation),
            course: field("course", defaults.course),
            message: field("message", defaults.message),
        }
    }

    /// Build a submission from a JSON body.
    ///
    /// Strings are taken as-is, numbers and booleans are stringified; any other
    /// shape (or a non-object body) falls back to the field default.
    #[must_use]
    pub fn from_json(body: &Value) -> Self {
        let defaults = Self::default();
        let field = |key: &str, default: String| match body.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => default,
        };

        Self {
            name: field("name", defaults.name),
            phone: field("phone", defaults.phone),
            consultation: field("consultation", defaults.consultation),
            course: field("course", defaults.course),
            message: field("message", defaults.message),
        }
    }

    /// Audit record for this submission, received at `at`.
    #[must_use]
    pub fn audit_record(&self, at: DateTime<Utc>) -> ContactAuditRecord {
        ContactAuditRecord {
            at: at.to_rfc3339_opts(SecondsFormat::Millis, true),
            name: self.name.clone(),
            phone: self.phone.clone(),
            consultation: self.consultation.clone(),
            course: self.course.clone(),
            message: truncate_chars(&self.message, MESSAGE_LOG_LIMIT),
        }
    }
}

/// First `limit` characters of `s`.
fn truncate_chars(s: &str, limit: usize) -> String {
    match s.char_indices().nth(limit) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
