//! Export orchestration.
//!
//! Coordinates one export run: precondition check, planning, rendering and
//! asset propagation. A run is all-or-nothing; the first failure aborts it.
//! Runs against the same output directory must not overlap.

use std::{
    fs,
    path::{Component, Path, PathBuf},
    time::Instant,
};

use academy_core::{
    Config, CoreError, ExportConfig, PathsConfig, SiteData, TemplateEngine, TemplateRef,
    discover_templates,
};
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    assets::{AssetCopier, AssetError},
    plan::{AssetCopy, ExportPlan, ManifestEntry},
};

/// Export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Configuration or render error from the core library.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// IO error while writing output.
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Asset copy error.
    #[error("asset error: {0}")]
    Asset(#[from] AssetError),
}

impl ExportError {
    fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Outcome of a successful export run.
#[derive(Debug, Clone, Default)]
pub struct ExportReport {
    /// Pages written, in template path order.
    pub rendered: Vec<ManifestEntry>,

    /// Partials that were not exported.
    pub partials: Vec<TemplateRef>,

    /// Assets that existed and were copied.
    pub copied: Vec<AssetCopy>,

    /// Run duration in milliseconds.
    pub duration_ms: u64,
}

/// Static exporter that mirrors the template root into the output root.
#[derive(Debug)]
pub struct Exporter {
    site: SiteData,
    paths: PathsConfig,
    export: ExportConfig,
    source_root: PathBuf,
    views_dir: PathBuf,
    output_dir: PathBuf,
}

impl Exporter {
    /// Create an exporter from resolved configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            site: config.site.clone(),
            paths: config.paths.clone(),
            export: config.export.clone(),
            source_root: config.root().to_path_buf(),
            views_dir: config.views_dir(),
            output_dir: config.output_dir(),
        }
    }

    /// Override the output directory.
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Output directory this exporter writes to.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Compute the plan for the current template root without writing anything.
    pub fn plan(&self) -> Result<ExportPlan> {
        self.check_preconditions()?;
        let templates = discover_templates(&self.views_dir, &self.paths.template_extension)?;
        Ok(ExportPlan::new(templates, &self.export, &self.paths))
    }

    /// Execute the full export.
    pub fn run(&self) -> Result<ExportReport> {
        let start = Instant::now();

        info!(
            views = %self.views_dir.display(),
            output = %self.output_dir.display(),
            "starting export"
        );

        // 1. Plan and parse before touching the output directory
        let plan = self.plan()?;
        let engine = TemplateEngine::load(&self.views_dir, &self.paths)?;

        // 2. Reset output directory
        self.clean_output()?;

        // 3. Render pages
        self.render_pages(&engine, &plan.manifest.entries)?;

        // 4. Copy assets
        let copied = self.copy_assets(&plan.assets)?;

        let report = ExportReport {
            rendered: plan.manifest.entries,
            partials: plan.manifest.partials,
            copied,
            duration_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            pages = report.rendered.len(),
            partials = report.partials.len(),
            assets = report.copied.len(),
            duration_ms = report.duration_ms,
            "export complete"
        );

        Ok(report)
    }

    fn check_preconditions(&self) -> Result<()> {
        if !self.views_dir.is_dir() {
            return Err(CoreError::configuration(format!(
                "template root not found: {}",
                self.views_dir.display()
            ))
            .into());
        }

        let output = normalize(&self.output_dir);
        if output == normalize(&self.source_root) || normalize(&self.views_dir).starts_with(&output)
        {
            return Err(CoreError::configuration(format!(
                "output directory {} would erase the site sources",
                self.output_dir.display()
            ))
            .into());
        }

        Ok(())
    }

    /// Remove and recreate the output directory.
    fn clean_output(&self) -> Result<()> {
        if self.output_dir.exists() {
            debug!(dir = %self.output_dir.display(), "cleaning output directory");
            fs::remove_dir_all(&self.output_dir).map_err(ExportError::io(&self.output_dir))?;
        }
        fs::create_dir_all(&self.output_dir).map_err(ExportError::io(&self.output_dir))?;
        Ok(())
    }

    /// Render every page in parallel; the first error stops the run.
    fn render_pages(&self, engine: &TemplateEngine, entries: &[ManifestEntry]) -> Result<()> {
        info!(count = entries.len(), "rendering pages");

        entries.par_iter().try_for_each(|entry| -> Result<()> {
            let html = engine.render_ref(&entry.template, &self.site)?;
            let output_path = self.output_dir.join(&entry.output);

            if let Some(parent) = output_path.parent() {
                fs::create_dir_all(parent).map_err(ExportError::io(parent))?;
            }
            fs::write(&output_path, html).map_err(ExportError::io(&output_path))?;

            debug!(template = %entry.template, path = %output_path.display(), "wrote page");
            Ok(())
        })
    }

    fn copy_assets(&self, assets: &[AssetCopy]) -> Result<Vec<AssetCopy>> {
        let copier = AssetCopier::new(&self.source_root, &self.output_dir);
        let mut copied = Vec::new();

        for asset in assets {
            if copier.copy(asset)? {
                copied.push(asset.clone());
            }
        }

        Ok(copied)
    }
}

/// Absolute form of `path` for comparison: `.` and `..` folded, symlinks in
/// the longest existing prefix resolved.
fn normalize(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut lexical = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                lexical.pop();
            }
            other => lexical.push(other),
        }
    }

    for prefix in lexical.ancestors() {
        if let Ok(canonical) = fs::canonicalize(prefix) {
            return match lexical.strip_prefix(prefix) {
                Ok(rest) if !rest.as_os_str().is_empty() => canonical.join(rest),
                _ => canonical,
            };
        }
    }
    lexical
}
