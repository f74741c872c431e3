//! Router and page handlers.

use std::path::Path;

use academy_core::PageData;
use axum::{
    Router,
    extract::State,
    handler::Handler,
    http::{StatusCode, Uri},
    middleware,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::debug;

use crate::{
    AppState,
    contact::submit_contact,
    error::{AppError, render_error_pages},
};

/// Create the page server router.
///
/// Unmatched paths are looked up in `public_dir` first and fall through to
/// the not-found handler. A known path called with another method is a 404
/// as well. Page routes also answer with a trailing slash.
pub fn create_router(state: AppState, public_dir: &Path) -> Router {
    let static_files = ServeDir::new(public_dir)
        .call_fallback_on_method_not_allowed(true)
        .fallback(not_found.with_state(state.clone()));

    Router::new()
        .route("/", get(index))
        .route("/english", get(english))
        .route("/english/", get(english))
        .route("/contact", get(contact).post(submit_contact))
        .route("/contact/", get(contact).post(submit_contact))
        .route("/healthz", get(healthz))
        .fallback_service(static_files)
        .method_not_allowed_fallback(not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            render_error_pages,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness probe. Never touches templates.
async fn healthz() -> &'static str {
    "ok"
}

async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    Ok(Html(state.render_page("index", PageData::active("home"))?))
}

/// The view is named `English`; the lookup is case-sensitive.
async fn english(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    Ok(Html(state.render_page("English", PageData::active("english"))?))
}

async fn contact(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    Ok(Html(state.render_page("contact", PageData::active("contact"))?))
}

/// Render the `404` view, or a plain-text body if it is unavailable.
async fn not_found(State(state): State<AppState>, uri: Uri) -> Response {
    let url = uri
        .path_and_query()
        .map_or_else(|| uri.path().to_string(), |pq| pq.as_str().to_string());
    debug!(%url, "no route matched");

    match state.render_page("404", PageData::new().with("url", url.as_str())) {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(_) => (StatusCode::NOT_FOUND, format!("Not Found: {url}")).into_response(),
    }
}
