//! Template discovery, classification and rendering.
//!
//! Templates live under a single root directory and are addressed by their
//! forward-slash path relative to that root. Rendering is delegated to Tera;
//! every template under the root is registered, so `{% include %}` and
//! `{% extends %}` resolve against the root regardless of which page is
//! being rendered.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use tera::{Context, Tera};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::{
    config::{ExportConfig, PathsConfig},
    error::{CoreError, Result},
    site::{PageData, SiteData},
};

/// A template identified by its relative path from the template root.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TemplateRef {
    path: String,
    extension: String,
}

impl TemplateRef {
    /// Create a reference from a forward-slash relative path.
    ///
    /// Backslashes are normalised to forward slashes.
    #[must_use]
    pub fn new(path: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            path: path.into().replace('\\', "/"),
            extension: extension.into(),
        }
    }

    /// Create a reference from a path relative to the template root.
    #[must_use]
    pub fn from_relative_path(path: &Path, extension: impl Into<String>) -> Self {
        let joined = path
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        Self::new(joined, extension)
    }

    /// Relative path, e.g. `partials/_header.tera`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.path
    }

    /// Path without the template extension, e.g. `courses/spanish`.
    #[must_use]
    pub fn name(&self) -> &str {
        self.path
            .strip_suffix(&self.extension)
            .and_then(|p| p.strip_suffix('.'))
            .unwrap_or(&self.path)
    }

    /// Base filename, e.g. `_header.tera`.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Directory segments leading to the file.
    pub fn dir_segments(&self) -> impl Iterator<Item = &str> {
        let dir = self.path.rsplit_once('/').map_or("", |(dir, _)| dir);
        dir.split('/').filter(|s| !s.is_empty())
    }

    /// Whether this template is a fragment that is never rendered standalone.
    #[must_use]
    pub fn is_partial(&self, export: &ExportConfig) -> bool {
        self.file_name().starts_with(export.partial_marker)
            || self
                .dir_segments()
                .any(|segment| export.partial_dirs.iter().any(|d| d == segment))
    }

    /// Output path relative to the output root, with the extension swapped.
    #[must_use]
    pub fn output_path(&self, output_extension: &str) -> PathBuf {
        PathBuf::from(format!("{}.{output_extension}", self.name()))
    }
}

impl fmt::Display for TemplateRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// Recursively find every template file under `root`, sorted by path.
pub fn discover_templates(root: &Path, extension: &str) -> Result<Vec<TemplateRef>> {
    let mut templates = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            CoreError::filesystem(path, e.into())
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if path.extension().is_none_or(|ext| ext != extension) {
            continue;
        }

        let relative = path
            .strip_prefix(root)
            .map_err(|_| CoreError::configuration(format!("invalid template path: {}", path.display())))?;
        templates.push(TemplateRef::from_relative_path(relative, extension));
    }

    templates.sort();
    debug!(root = %root.display(), count = templates.len(), "discovered templates");
    Ok(templates)
}

/// Tera-backed renderer over a template root.
pub struct TemplateEngine {
    root: PathBuf,
    extension: String,
    templates: Vec<TemplateRef>,
    tera: Tera,
}

impl fmt::Debug for TemplateEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateEngine")
            .field("root", &self.root)
            .field("extension", &self.extension)
            .field("templates", &self.templates)
            .finish_non_exhaustive()
    }
}

impl TemplateEngine {
    /// Load and parse every template under `root`.
    pub fn load(root: &Path, paths: &PathsConfig) -> Result<Self> {
        if !root.is_dir() {
            return Err(CoreError::configuration(format!(
                "template root not found: {}",
                root.display()
            )));
        }

        let templates = discover_templates(root, &paths.template_extension)?;

        let mut tera = Tera::default();
        // Every suffix ends with "": escape output of all templates.
        tera.autoescape_on(vec![""]);
        tera.add_template_files(
            templates
                .iter()
                .map(|t| (root.join(t.as_str()), Some(t.as_str()))),
        )
        .map_err(|e| CoreError::render(root.display().to_string(), error_chain(&e)))?;

        info!(root = %root.display(), count = templates.len(), "loaded templates");

        Ok(Self {
            root: root.to_path_buf(),
            extension: paths.template_extension.clone(),
            templates,
            tera,
        })
    }

    /// An engine without templates. Every render is a configuration error.
    #[must_use]
    pub fn empty(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
            templates: Vec::new(),
            tera: Tera::default(),
        }
    }

    /// Template root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All registered templates, pages and partials alike, sorted by path.
    #[must_use]
    pub fn templates(&self) -> &[TemplateRef] {
        &self.templates
    }

    /// Whether a template with this name (path without extension) exists.
    ///
    /// The lookup is exact and case-sensitive.
    #[must_use]
    pub fn has_template(&self, name: &str) -> bool {
        self.templates.iter().any(|t| t.name() == name)
    }

    /// Render a template by name, e.g. `index` or `English`.
    pub fn render(&self, name: &str, site: &SiteData, page: Option<&PageData>) -> Result<String> {
        let path = format!("{name}.{}", self.extension);
        self.render_path(&path, site, page)
    }

    /// Render a discovered template.
    pub fn render_ref(&self, template: &TemplateRef, site: &SiteData) -> Result<String> {
        self.render_path(template.as_str(), site, None)
    }

    fn render_path(&self, path: &str, site: &SiteData, page: Option<&PageData>) -> Result<String> {
        if !self.templates.iter().any(|t| t.as_str() == path) {
            return Err(CoreError::configuration(format!("template not found: {path}")));
        }

        let mut context = Context::new();
        context.insert("site", site);
        if let Some(page) = page {
            for (key, value) in page.iter() {
                context.insert(key, value);
            }
        }

        debug!(template = path, "rendering template");
        self.tera.render(path, &context).map_err(|e| match e.kind {
            tera::ErrorKind::TemplateNotFound(ref missing) => {
                CoreError::configuration(format!("template not found: {missing} (included from {path})"))
            }
            _ => CoreError::render(path, error_chain(&e)),
        })
    }
}

/// Flatten a Tera error and its sources into one line.
fn error_chain(err: &tera::Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
