//! Serve command - runs the page server

use std::path::Path;

use academy_core::Config;
use color_eyre::eyre::{Result, WrapErr};

/// Run the serve command.
///
/// `port` takes precedence over the `PORT` variable, which takes precedence
/// over the configured port.
pub async fn run(root: &Path, config_path: Option<&Path>, port: Option<u16>) -> Result<()> {
    let config = Config::load(root, config_path).wrap_err("Failed to load configuration")?;
    let port = port.unwrap_or_else(|| config.listen_port());

    tracing::info!(?root, port, "Starting page server");

    let listener = academy_server::bind(&config, port)
        .await
        .wrap_err("Failed to start page server")?;
    let port = listener.local_addr().map_or(port, |addr| addr.port());

    println!();
    println!("  Server is running at http://localhost:{port}");
    println!("  Press Ctrl+C to stop");
    println!();

    academy_server::serve(&config, listener)
        .await
        .wrap_err("Page server failed")?;

    Ok(())
}
