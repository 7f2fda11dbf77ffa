//! Build configuration, read from a TOML file. Every key is optional.
//!
//! ```toml
//! output_dir = "site"
//! index_name = "series"
//! index_title = "Message Series"
//! visibility = "protected"
//! format = "html"
//! strict = true
//! series_order = "newest_first"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::access::{AccessLevel, VisibilityPolicy};
use crate::html::HtmlPageRender;
use crate::render::{JsonPageRender, PageRender};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Html,
    Json,
}

impl OutputFormat {
    pub fn renderer(&self) -> Box<dyn PageRender> {
        match self {
            OutputFormat::Html => Box::new(HtmlPageRender),
            OutputFormat::Json => Box::new(JsonPageRender),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SeriesOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CatalogConfig {
    pub output_dir: PathBuf,
    /// Index file name without extension; the renderer picks the extension.
    pub index_name: String,
    pub index_title: String,
    /// Least public level shown in series message lists.
    pub visibility: AccessLevel,
    pub format: OutputFormat,
    /// Abort the build when any record is invalid.
    pub strict: bool,
    pub series_order: SeriesOrder,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("site"),
            index_name: "series".to_string(),
            index_title: "Series".to_string(),
            visibility: AccessLevel::Public,
            format: OutputFormat::Html,
            strict: false,
            series_order: SeriesOrder::NewestFirst,
        }
    }
}

impl CatalogConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&text)
    }

    pub fn visibility_policy(&self) -> VisibilityPolicy {
        VisibilityPolicy::up_to(self.visibility)
    }

    pub fn index_path(&self, extension: &str) -> PathBuf {
        self.output_dir.join(format!("{}.{}", self.index_name, extension))
    }
}
