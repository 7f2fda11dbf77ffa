//! Catalog Pipeline - Single Entry Point
//!
//! load -> reconcile -> validate -> render, always in that order.
//! `build` validates internally before anything is written. No bypass.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::{CatalogConfig, SeriesOrder};
use crate::hashing::{compute_manifest_hash, sha256_file};
use crate::loader::{load_messages, load_series, LoadError};
use crate::message::Message;
use crate::ordering::{by_date, by_date_descending};
use crate::reconcile::Catalog;
use crate::render::{PageKind, PageRender, RenderError, SeriesIndexRender};
use crate::series::Series;
use crate::validation::{ValidationResult, Validator};
use crate::ENGINE_VERSION;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("Validation failed: {0} invalid record(s)")]
    ValidationFailed(usize),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Output error at {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationSummary {
    pub messages_checked: usize,
    pub messages_invalid: usize,
    pub series_checked: usize,
    pub series_invalid: usize,
    pub warnings: usize,
}

impl ValidationSummary {
    pub fn invalid(&self) -> usize {
        self.messages_invalid + self.series_invalid
    }

    pub fn is_valid(&self) -> bool {
        self.invalid() == 0
    }

    fn add(&mut self, result: &ValidationResult, is_series: bool) {
        let invalid = usize::from(!result.valid);
        if is_series {
            self.series_checked += 1;
            self.series_invalid += invalid;
        } else {
            self.messages_checked += 1;
            self.messages_invalid += invalid;
        }
        self.warnings += result.warning_count();
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmittedFile {
    pub kind: PageKind,
    pub path: PathBuf,
    pub title: Option<String>,
    pub size_bytes: u64,
    pub hash: String,
}

/// Manifest of one build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogBuild {
    pub id: String,
    pub engine_version: String,
    pub created_at: DateTime<Utc>,
    pub manifest_hash: String,
    pub validation: ValidationSummary,
    pub pages: Vec<EmittedFile>,
}

/// The catalog pipeline - single entry point for a site build
pub struct CatalogPipeline {
    config: CatalogConfig,
    renderer: Box<dyn PageRender>,
    message_validator: Validator<Message>,
    series_validator: Validator<Series>,
}

impl CatalogPipeline {
    pub fn new(config: CatalogConfig) -> Self {
        let renderer = config.format.renderer();
        Self::with_renderer(config, renderer)
    }

    pub fn with_renderer(config: CatalogConfig, renderer: Box<dyn PageRender>) -> Self {
        Self {
            config,
            renderer,
            message_validator: Validator::for_messages(),
            series_validator: Validator::for_series(),
        }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Load both CSV sheets and reconcile them.
    pub fn load(&self, messages_csv: &Path, series_csv: &Path) -> Result<Catalog, PipelineError> {
        let messages = load_messages(messages_csv)?;
        let series = load_series(series_csv)?;
        info!(messages = messages.len(), series = series.len(), "loaded catalog");
        Ok(Catalog::new(messages, series))
    }

    /// Validate every message, then every series.
    ///
    /// Diagnostics go to `sink` when one is given.
    pub fn validate(&self, catalog: &Catalog, mut sink: Option<&mut dyn Write>) -> ValidationSummary {
        let mut summary = ValidationSummary::default();

        for message in catalog.messages() {
            let result = self.message_validator.validate(message);
            if !result.report(sink.as_deref_mut()) {
                warn!(record = %result.record, "invalid message");
            }
            summary.add(&result, false);
        }

        for series in catalog.series() {
            let result = self.series_validator.validate(series);
            if !result.report(sink.as_deref_mut()) {
                warn!(record = %result.record, "invalid series");
            }
            summary.add(&result, true);
        }

        info!(
            invalid = summary.invalid(),
            warnings = summary.warnings,
            "validated catalog"
        );
        summary
    }

    /// Build the site.
    ///
    /// CRITICAL: This ALWAYS validates first. In strict mode any invalid
    /// record aborts the build before a file is written.
    pub fn build(
        &self,
        mut catalog: Catalog,
        sink: Option<&mut dyn Write>,
    ) -> Result<CatalogBuild, PipelineError> {
        let validation = self.validate(&catalog, sink);
        if self.config.strict && !validation.is_valid() {
            return Err(PipelineError::ValidationFailed(validation.invalid()));
        }

        match self.config.series_order {
            SeriesOrder::NewestFirst => catalog.sort_series_by(by_date_descending),
            SeriesOrder::OldestFirst => catalog.sort_series_by(by_date),
        }

        let output_dir = &self.config.output_dir;
        std::fs::create_dir_all(output_dir).map_err(|source| PipelineError::Output {
            path: output_dir.clone(),
            source,
        })?;

        let index_path = self.config.index_path(self.renderer.extension());
        let rendered = SeriesIndexRender::new(catalog.series())
            .with_index_title(self.config.index_title.clone())
            .render(
                self.renderer.as_ref(),
                &self.config.visibility_policy(),
                &index_path,
            )?;

        let mut pages = Vec::with_capacity(rendered.len());
        for page in rendered {
            let (size_bytes, hash) = sha256_file(&page.path).map_err(|source| {
                PipelineError::Output { path: page.path.clone(), source }
            })?;
            pages.push(EmittedFile {
                kind: page.kind,
                path: page.path,
                title: page.title,
                size_bytes,
                hash,
            });
        }

        let mut build = CatalogBuild {
            id: Uuid::new_v4().to_string(),
            engine_version: ENGINE_VERSION.to_string(),
            created_at: Utc::now(),
            manifest_hash: String::new(), // Computed after
            validation,
            pages,
        };

        // Hash covers what was produced, not when or by which run.
        build.manifest_hash = compute_manifest_hash(&(&build.validation, &build.pages))?;

        info!(pages = build.pages.len(), id = %build.id, "build complete");
        Ok(build)
    }
}

impl Default for CatalogPipeline {
    fn default() -> Self {
        Self::new(CatalogConfig::default())
    }
}
