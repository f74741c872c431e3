//! Data handed to templates: shared site data and per-page data.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Shared, immutable data injected into every render call under `site`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteData {
    /// Site title.
    pub title: String,

    /// Site description for meta tags.
    pub description: Option<String>,

    /// Free-form values available as `site.extra.<key>`.
    pub extra: BTreeMap<String, Value>,
}

impl Default for SiteData {
    fn default() -> Self {
        Self {
            title: "My Academy".to_string(),
            description: None,
            extra: BTreeMap::new(),
        }
    }
}

impl SiteData {
    /// Create site data with the given title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Per-route data. Each entry becomes a top-level template variable.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageData {
    values: BTreeMap<String, Value>,
}

impl PageData {
    /// Create empty page data.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Page data marking the active navigation entry.
    #[must_use]
    pub fn active(nav: impl Into<String>) -> Self {
        Self::new().with("active", nav.into())
    }

    /// Add a value.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Get a value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Iterate over all values in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}
