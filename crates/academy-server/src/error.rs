//! Request-boundary error handling.
//!
//! Handlers return `Result<_, AppError>`. Converting an `AppError` into a
//! response logs it once and produces a plain-text body; the
//! [`render_error_pages`] middleware then upgrades that body to the `error`
//! template when one is available.

use academy_core::{CoreError, ErrorKind, PageData};
use axum::{
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{Html, IntoResponse, Response},
};
use tracing::{debug, error, warn};

use crate::AppState;

/// Error returned by request handlers.
#[derive(Debug)]
pub struct AppError(pub CoreError);

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        Self(err)
    }
}

/// Status and message of a failed request, attached to the response so the
/// error page can be rendered with access to the templates.
#[derive(Debug, Clone)]
pub struct ErrorPage {
    pub status: StatusCode,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.0.status_code();
        let message = self.0.to_string();

        match self.0.kind() {
            ErrorKind::Validation => {
                warn!(error = %self.0, status = status.as_u16(), "rejected request");
            }
            ErrorKind::Configuration | ErrorKind::Render | ErrorKind::Filesystem => {
                error!(error = ?self.0, status = status.as_u16(), "request failed");
            }
        }

        let mut response = (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            format!("Error {}: {message}", status.as_u16()),
        )
            .into_response();
        response
            .extensions_mut()
            .insert(ErrorPage { status, message });
        response
    }
}

/// Replace plain-text error bodies with the rendered `error` template.
pub async fn render_error_pages(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;

    let Some(page) = response.extensions().get::<ErrorPage>().cloned() else {
        return response;
    };

    let data = PageData::new()
        .with("status", page.status.as_u16())
        .with("message", page.message);

    match state.render_page("error", data) {
        Ok(html) => (page.status, Html(html)).into_response(),
        Err(e) => {
            debug!(error = %e, "error template unavailable, using text body");
            response
        }
    }
}
