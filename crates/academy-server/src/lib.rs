//! Academy Server Library
//!
//! HTTP page server rendering the site templates on request.
//!
//! # Modules
//!
//! - [`routes`] - Router and page handlers
//! - [`contact`] - Contact form extraction and acknowledgment
//! - [`error`] - Error-to-response conversion at the request boundary

use std::sync::Arc;

use academy_core::{Config, PageData, SiteData, TemplateEngine};
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{error, info};

pub mod contact;
pub mod error;
pub mod routes;

pub use contact::{ContactForm, confirmation_html, escape_html};
pub use error::AppError;
pub use routes::create_router;

/// Server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Could not bind the listening socket.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// IO error while serving.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// State shared by all handlers. Immutable after start-up.
#[derive(Debug, Clone)]
pub struct AppState {
    engine: Arc<TemplateEngine>,
    site: Arc<SiteData>,
}

impl AppState {
    /// Create the shared state.
    #[must_use]
    pub fn new(engine: TemplateEngine, site: SiteData) -> Self {
        Self {
            engine: Arc::new(engine),
            site: Arc::new(site),
        }
    }

    /// Render a named view with the site data and `page`.
    pub fn render_page(&self, name: &str, page: PageData) -> academy_core::Result<String> {
        self.engine.render(name, &self.site, Some(&page))
    }
}

/// Build the shared state from configuration.
///
/// A template root that is missing or fails to parse is logged and replaced
/// by an empty engine, so the process stays up (and `/healthz` keeps
/// answering) while every page request fails with a 500.
#[must_use]
pub fn load_state(config: &Config) -> AppState {
    let views = config.views_dir();
    let engine = TemplateEngine::load(&views, &config.paths).unwrap_or_else(|e| {
        error!(error = %e, views = %views.display(), "templates unavailable, pages will fail");
        TemplateEngine::empty(&views, config.paths.template_extension.clone())
    });
    AppState::new(engine, config.site.clone())
}

/// Bind the listening socket on `config.server.host` and `port`.
pub async fn bind(config: &Config, port: u16) -> Result<TcpListener, ServerError> {
    let addr = format!("{}:{port}", config.server.host);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;

    info!(%addr, "page server listening");
    Ok(listener)
}

/// Serve the site on a bound listener until Ctrl+C.
pub async fn serve(config: &Config, listener: TcpListener) -> Result<(), ServerError> {
    let state = load_state(config);
    let app = create_router(state, &config.public_dir());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("page server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
    }
}
