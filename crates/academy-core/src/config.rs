//! Site configuration management.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    error::{CoreError, Result},
    site::SiteData,
};

/// Default configuration file name, looked up relative to the site root.
pub const DEFAULT_CONFIG_FILE: &str = "academy.toml";

/// Environment variable that selects the server's listening port.
pub const PORT_ENV: &str = "PORT";

/// Main configuration structure.
///
/// Built once at process start and handed to the exporter and the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Data injected into every render call.
    #[serde(default)]
    pub site: SiteData,

    /// Directory and extension layout.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Page server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Static export settings.
    #[serde(default)]
    pub export: ExportConfig,

    /// Directory that relative paths are resolved against.
    #[serde(skip)]
    root: PathBuf,
}

/// Directory layout and file extensions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Template root.
    pub views: PathBuf,

    /// Export output root. Erased on every export.
    pub output: PathBuf,

    /// Static files served as-is by the page server.
    pub public: PathBuf,

    /// Extension of template files, without the dot.
    pub template_extension: String,

    /// Extension of exported documents, without the dot.
    pub output_extension: String,
}

/// Page server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,

    /// Port to listen on when `PORT` is absent or not numeric.
    pub port: u16,
}

/// Static export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directories copied verbatim into the output root.
    pub asset_dirs: Vec<String>,

    /// Root files copied verbatim into the output root.
    pub root_files: Vec<String>,

    /// Filename prefix marking a partial.
    pub partial_marker: char,

    /// Directory names whose contents are partials.
    pub partial_dirs: Vec<String>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            views: PathBuf::from("views"),
            output: PathBuf::from("dist"),
            public: PathBuf::from("public"),
            template_extension: "tera".to_string(),
            output_extension: "html".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            asset_dirs: vec!["assets".to_string(), "images".to_string()],
            root_files: vec![
                ".nojekyll".to_string(),
                "CNAME".to_string(),
                "404.html".to_string(),
                "favicon.ico".to_string(),
            ],
            partial_marker: '_',
            partial_dirs: vec!["partials".to_string(), "includes".to_string()],
        }
    }
}

impl Config {
    /// Load configuration for a site rooted at `root`.
    ///
    /// Layers the built-in defaults, the optional TOML file and
    /// `ACADEMY_<SECTION>__<KEY>` environment variables. A missing file is
    /// not an error; `file` defaults to [`DEFAULT_CONFIG_FILE`] under `root`.
    pub fn load(root: &Path, file: Option<&Path>) -> Result<Self> {
        let file = file.map_or_else(|| root.join(DEFAULT_CONFIG_FILE), Path::to_path_buf);
        tracing::debug!(path = %file.display(), "loading configuration");

        let settings = ::config::Config::builder()
            .add_source(::config::File::from(file.as_path()).required(false))
            .add_source(
                ::config::Environment::with_prefix("ACADEMY")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| {
                CoreError::configuration_with_source(
                    format!("Failed to read config file: {}", file.display()),
                    e,
                )
            })?;

        let config: Config = settings.try_deserialize().map_err(|e| {
            CoreError::configuration_with_source(
                format!("Failed to parse config file: {}", file.display()),
                e,
            )
        })?;

        let config = config.resolve(root);
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| CoreError::configuration_with_source("Failed to parse config", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve relative directories against `root`.
    #[must_use]
    pub fn resolve(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        if self.site.title.trim().is_empty() {
            return Err(CoreError::configuration("site.title cannot be empty"));
        }

        if self.paths.template_extension.is_empty() || self.paths.output_extension.is_empty() {
            return Err(CoreError::configuration(
                "paths.template_extension and paths.output_extension cannot be empty",
            ));
        }

        if self.paths.template_extension.starts_with('.') {
            tracing::warn!("paths.template_extension should not start with a dot");
        }

        if self.export.partial_marker.is_alphanumeric() {
            return Err(CoreError::configuration(format!(
                "export.partial_marker must not be alphanumeric, got '{}'",
                self.export.partial_marker
            )));
        }

        Ok(())
    }

    /// Directory relative paths are resolved against.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute (or root-relative) template directory.
    #[must_use]
    pub fn views_dir(&self) -> PathBuf {
        self.root.join(&self.paths.views)
    }

    /// Export output directory.
    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        self.root.join(&self.paths.output)
    }

    /// Directory of files served verbatim by the page server.
    #[must_use]
    pub fn public_dir(&self) -> PathBuf {
        self.root.join(&self.paths.public)
    }

    /// Port to listen on, honoring the `PORT` variable if it holds a number.
    #[must_use]
    pub fn listen_port(&self) -> u16 {
        port_from_env(std::env::var(PORT_ENV).ok().as_deref(), self.server.port)
    }
}

/// Parse a port value, falling back to `default` when absent or not numeric.
#[must_use]
pub fn port_from_env(value: Option<&str>, default: u16) -> u16 {
    value
        .and_then(|v| v.trim().parse::<u16>().ok())
        .unwrap_or(default)
}
