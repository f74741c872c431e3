//! Contact form handling.

use std::collections::HashMap;

use academy_core::{ContactSubmission, CoreError};
use axum::{
    Form, Json,
    body::{Body, to_bytes},
    extract::{FromRequest, Request},
    http::header,
    response::Html,
};
use chrono::Utc;
use serde_json::Value;
use tracing::info;

use crate::error::AppError;

/// Largest accepted contact body.
const BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Extracts a [`ContactSubmission`] from a url-encoded or JSON body.
///
/// An empty body or any other content type yields the defaults for every
/// field. A non-empty body that cannot be parsed is a validation error.
#[derive(Debug)]
pub struct ContactForm(pub ContactSubmission);

impl<S> FromRequest<S> for ContactForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let (parts, body) = req.into_parts();
        let bytes = to_bytes(body, BODY_LIMIT)
            .await
            .map_err(|e| CoreError::validation(format!("failed to read request body: {e}")))?;
        if bytes.is_empty() {
            return Ok(Self(ContactSubmission::default()));
        }
        let req = Request::from_parts(parts, Body::from(bytes));

        if content_type.starts_with("application/json") {
            let Json(body) = Json::<Value>::from_request(req, state)
                .await
                .map_err(|e| CoreError::validation(e.body_text()))?;
            Ok(Self(ContactSubmission::from_json(&body)))
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(|e| CoreError::validation(e.body_text()))?;
            Ok(Self(ContactSubmission::from_fields(|key| {
                fields.get(key).map(String::as_str)
            })))
        } else {
            Ok(Self(ContactSubmission::default()))
        }
    }
}

/// `POST /contact`: log the submission and acknowledge it.
pub async fn submit_contact(ContactForm(submission): ContactForm) -> Html<String> {
    let record = submission.audit_record(Utc::now());
    info!(
        target: "academy::contact",
        at = %record.at,
        name = %record.name,
        phone = %record.phone,
        consultation = %record.consultation,
        course = %record.course,
        message = %record.message,
        "contact submission"
    );

    Html(confirmation_html(&submission.name))
}

/// Acknowledgment document embedding the submitter's escaped name.
#[must_use]
pub fn confirmation_html(name: &str) -> String {
    format!(
        "<p>Thank you <strong>{}</strong>, we have received your message.</p>\n\
         <p><a href=\"/\">Back to Home</a></p>",
        escape_html(name)
    )
}

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
