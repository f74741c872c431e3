//! Export planning.
//!
//! Turns a list of discovered templates and the export settings into the
//! manifest of pages to render and the list of assets to copy. Nothing here
//! touches the filesystem.

use std::path::PathBuf;

use academy_core::{ExportConfig, PathsConfig, TemplateRef};

/// One page to render: template path to output path, both relative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub template: TemplateRef,
    pub output: PathBuf,
}

/// Input template to output file mappings for one export run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportManifest {
    /// Pages to render, sorted by template path.
    pub entries: Vec<ManifestEntry>,

    /// Partials that are not rendered standalone.
    pub partials: Vec<TemplateRef>,
}

/// Whether an asset candidate is a directory or a single root file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Directory,
    File,
}

/// An auxiliary item copied verbatim from the source root into the output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetCopy {
    pub name: String,
    pub kind: AssetKind,
}

/// Everything an export run will do.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportPlan {
    pub manifest: ExportManifest,
    /// Candidates; only those present at the source root are copied.
    pub assets: Vec<AssetCopy>,
}

impl ExportPlan {
    /// Classify templates and compute output paths.
    #[must_use]
    pub fn new(mut templates: Vec<TemplateRef>, export: &ExportConfig, paths: &PathsConfig) -> Self {
        templates.sort();

        let mut manifest = ExportManifest::default();
        for template in templates {
            if template.is_partial(export) {
                manifest.partials.push(template);
            } else {
                let output = template.output_path(&paths.output_extension);
                manifest.entries.push(ManifestEntry { template, output });
            }
        }

        let assets = export
            .asset_dirs
            .iter()
            .map(|name| AssetCopy {
                name: name.clone(),
                kind: AssetKind::Directory,
            })
            .chain(export.root_files.iter().map(|name| AssetCopy {
                name: name.clone(),
                kind: AssetKind::File,
            }))
            .collect();

        Self { manifest, assets }
    }
}
