//! Academy CLI
//!
//! Page server and static exporter for the academy marketing site.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;

/// Command-line interface for the academy site.
#[derive(Parser)]
#[command(
    name = "academy",
    version,
    about = "Serve or export the academy site"
)]
struct Cli {
    /// Site root containing views/, public/ and the asset directories
    #[arg(short, long, default_value = ".")]
    root: PathBuf,

    /// Path to configuration file (defaults to academy.toml under the root)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Render every page into the output directory
    Export {
        /// Output directory, relative to the site root (erased before writing)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Start the page server
    Serve {
        /// Port to listen on, overriding PORT
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Validate configuration and templates
    Check {
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    // Contact submissions are logged at INFO; keep them visible while serving.
    let verbose = match cli.command {
        Commands::Serve { .. } => cli.verbose.max(1),
        _ => cli.verbose,
    };
    academy::init_tracing(verbose);

    let config = cli.config.as_deref();
    match cli.command {
        Commands::Export { output } => {
            academy::cmd::export::run(&cli.root, config, output.as_deref())?;
        }
        Commands::Serve { port } => {
            academy::cmd::serve::run(&cli.root, config, port).await?;
        }
        Commands::Check { strict } => {
            academy::cmd::check::run(&cli.root, config, strict)?;
        }
    }

    Ok(())
}
