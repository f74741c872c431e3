//! Academy Core Library
//!
//! Configuration, error handling, template rendering and the shared data model
//! used by both the page server and the static exporter.

pub mod config;
pub mod contact;
pub mod error;
pub mod site;
pub mod template;

pub use config::{Config, ExportConfig, PathsConfig, ServerConfig, port_from_env};
pub use contact::{ContactAuditRecord, ContactSubmission, MESSAGE_LOG_LIMIT};
pub use error::{CoreError, ErrorKind, Result};
pub use site::{PageData, SiteData};
pub use template::{TemplateEngine, TemplateRef, discover_templates};
