//! Series Catalog Core - Message Catalog Site Builder
//!
//! # The Ground Rules
//! 1. Records Never Fail To Load: bad cells become diagnostics, not panics
//! 2. Reconcile Before Validate: counts are checked against resolved messages
//! 3. Validation Reports Everything: no rule short-circuits another
//! 4. Only Public Series Get Pages: everything else stays on the index
//! 5. Deterministic Output: index first, then series pages in list order

pub mod access;
pub mod config;
pub mod hashing;
pub mod html;
pub mod links;
pub mod loader;
pub mod message;
pub mod naming;
pub mod ordering;
pub mod pipeline;
pub mod reconcile;
pub mod record;
pub mod render;
pub mod series;
pub mod validation;

pub use access::{AccessLevel, VisibilityPolicy, VisibilityPredicate};
pub use config::{CatalogConfig, OutputFormat, SeriesOrder};
pub use hashing::{canonical_json, compute_manifest_hash};
pub use message::Message;
pub use pipeline::{CatalogBuild, CatalogPipeline, PipelineError, ValidationSummary};
pub use reconcile::{discover_messages, Catalog};
pub use record::RawRecord;
pub use render::{PageModel, PageRender, RenderError, SeriesIndexRender};
pub use series::Series;
pub use validation::{ValidationResult, ValidationRule, ValidationViolation, Validator, ViolationSeverity};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
