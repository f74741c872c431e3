//! Academy Export Library
//!
//! Pre-renders the site templates into a flat directory for static hosting.
//!
//! # Modules
//!
//! - [`plan`] - Pure planning: export manifest and asset candidates
//! - [`assets`] - Verbatim copying of auxiliary directories and root files
//! - [`build`] - Export orchestration

pub mod assets;
pub mod build;
pub mod plan;

pub use assets::{AssetCopier, AssetError};
pub use build::{ExportError, ExportReport, Exporter};
pub use plan::{AssetCopy, AssetKind, ExportManifest, ExportPlan, ManifestEntry};
