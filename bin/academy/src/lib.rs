//! Academy CLI Library
//!
//! Command implementations behind the `academy` binary.
//!
//! # Modules
//!
//! - [`cmd`] - Command implementations (export, serve, check)

pub mod cmd;

pub use academy_core::Config;
pub use academy_export::{ExportReport, Exporter};

/// Initialize tracing with the specified verbosity level.
///
/// # Arguments
///
/// * `verbose` - Verbosity level (0 = WARN, 1 = INFO, 2 = DEBUG, 3+ = TRACE)
///
/// Directives in `RUST_LOG` are honored on top of the selected level.
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
