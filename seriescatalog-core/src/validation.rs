//! Validation System - Rule/Policy Separation
//!
//! Rules produce structured violations.
//! Policy maps violations to a validity decision: only errors invalidate,
//! warnings are advisory.
//!
//! Series rules compare the declared message count against the resolved
//! list, so series must be reconciled before they are validated.

use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use tracing::warn;

use crate::message::{Message, MessageField};
use crate::series::{Series, SeriesField};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSeverity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationViolation {
    pub rule: String,
    pub severity: ViolationSeverity,
    pub message: String,
}

impl ValidationViolation {
    fn error(rule: &str, message: impl Into<String>) -> Self {
        Self { rule: rule.to_string(), severity: ViolationSeverity::Error, message: message.into() }
    }

    fn warning(rule: &str, message: impl Into<String>) -> Self {
        Self { rule: rule.to_string(), severity: ViolationSeverity::Warning, message: message.into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationResult {
    pub valid: bool,
    pub violations: Vec<ValidationViolation>,
    /// Names the record in diagnostics, e.g. `Series 'Abide'`.
    pub record: String,
}

impl ValidationResult {
    pub fn has_errors(&self) -> bool {
        self.violations.iter().any(|v| v.severity == ViolationSeverity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.violations.iter().filter(|v| v.severity == ViolationSeverity::Warning).count()
    }

    /// Human-readable lines: a header naming the record, then one line per problem.
    ///
    /// Empty when there is nothing to report.
    pub fn diagnostics(&self) -> Vec<String> {
        if self.violations.is_empty() {
            return vec![];
        }
        let mut lines = Vec::with_capacity(self.violations.len() + 1);
        lines.push(format!("{} has the following problems:", self.record));
        lines.extend(self.violations.iter().map(|v| format!("    * {}", v.message)));
        lines
    }

    pub fn write_to(&self, sink: &mut dyn Write) -> io::Result<()> {
        for line in self.diagnostics() {
            writeln!(sink, "{}", line)?;
        }
        Ok(())
    }

    /// Print diagnostics to `sink` when one is given, and return validity.
    ///
    /// A failing sink is logged; it never changes the decision.
    pub fn report(&self, sink: Option<&mut (dyn Write + '_)>) -> bool {
        if let Some(sink) = sink {
            if let Err(e) = self.write_to(sink) {
                warn!(record = %self.record, error = %e, "failed to write diagnostics");
            }
        }
        self.valid
    }
}

/// Records the validator knows how to name in diagnostics.
pub trait Validatable {
    const KIND: &'static str;

    fn label(&self) -> Option<&str>;

    fn describe(&self) -> String {
        format!("{} '{}'", Self::KIND, self.label().unwrap_or("(untitled)"))
    }
}

impl Validatable for Message {
    const KIND: &'static str = "Message";

    fn label(&self) -> Option<&str> {
        self.title()
    }
}

impl Validatable for Series {
    const KIND: &'static str = "Series";

    fn label(&self) -> Option<&str> {
        self.title()
    }
}

/// Validation rule trait - produces violations
pub trait ValidationRule<R> {
    fn name(&self) -> &'static str;
    fn validate(&self, record: &R) -> Vec<ValidationViolation>;
}

// --- Concrete Rules ---

/// A required field must be present.
pub struct RequiredField<R> {
    name: &'static str,
    problem: &'static str,
    present: fn(&R) -> bool,
}

impl<R> RequiredField<R> {
    pub fn new(name: &'static str, problem: &'static str, present: fn(&R) -> bool) -> Self {
        Self { name, problem, present }
    }
}

impl<R> ValidationRule<R> for RequiredField<R> {
    fn name(&self) -> &'static str { self.name }

    fn validate(&self, record: &R) -> Vec<ValidationViolation> {
        if (self.present)(record) {
            vec![]
        } else {
            vec![ValidationViolation::error(self.name, self.problem)]
        }
    }
}

/// Records that keep deferred parse errors per field.
pub trait FieldErrorSource {
    type Field: Copy;

    fn field_error(&self, field: Self::Field) -> Option<&str>;
}

impl FieldErrorSource for Message {
    type Field = MessageField;

    fn field_error(&self, field: MessageField) -> Option<&str> {
        self.parse_error(field)
    }
}

impl FieldErrorSource for Series {
    type Field = SeriesField;

    fn field_error(&self, field: SeriesField) -> Option<&str> {
        self.parse_error(field)
    }
}

/// Surfaces a deferred parse error as an error.
pub struct FieldErrorRule<R: FieldErrorSource> {
    name: &'static str,
    field: R::Field,
}

impl<R: FieldErrorSource> FieldErrorRule<R> {
    pub fn new(name: &'static str, field: R::Field) -> Self {
        Self { name, field }
    }
}

impl<R: FieldErrorSource> ValidationRule<R> for FieldErrorRule<R> {
    fn name(&self) -> &'static str { self.name }

    fn validate(&self, record: &R) -> Vec<ValidationViolation> {
        record
            .field_error(self.field)
            .map(|problem| vec![ValidationViolation::error(self.name, problem)])
            .unwrap_or_default()
    }
}

/// Series memberships and track numbers must line up one to one.
pub struct TrackAlignmentRule;

impl ValidationRule<Message> for TrackAlignmentRule {
    fn name(&self) -> &'static str { "track_alignment" }

    fn validate(&self, message: &Message) -> Vec<ValidationViolation> {
        let series_count = message.series().len();
        let track_count = message.track_numbers().len();
        if series_count == track_count {
            return vec![];
        }
        vec![ValidationViolation::error(
            self.name(),
            format!(
                "is in {} series, but has track data for {} series",
                series_count, track_count
            ),
        )]
    }
}

/// Unknown message types are probably typos.
pub struct KnownTypeRule;

impl ValidationRule<Message> for KnownTypeRule {
    fn name(&self) -> &'static str { "known_type" }

    fn validate(&self, message: &Message) -> Vec<ValidationViolation> {
        match message.kind() {
            Some(kind) if !message.has_known_kind() => vec![ValidationViolation::warning(
                self.name(),
                format!("has an unknown type '{}'", kind),
            )],
            _ => vec![],
        }
    }
}

/// The declared count must be positive and backed by resolved messages.
///
/// A series that was never reconciled has zero resolved messages.
pub struct MessageCountRule;

impl ValidationRule<Series> for MessageCountRule {
    fn name(&self) -> &'static str { "message_count" }

    fn validate(&self, series: &Series) -> Vec<ValidationViolation> {
        let actual = series.resolved_messages().map_or(0, |m| m.len() as u64);
        match series.message_count() {
            None => vec![ValidationViolation::warning(
                self.name(),
                "has no message count, will be handled on a best effort basis",
            )],
            Some(count) if count < 1 => {
                vec![ValidationViolation::error(self.name(), "has 0 messages")]
            }
            Some(count) if count > actual => {
                vec![ValidationViolation::error(
                    self.name(),
                    format!(
                        "has a message count of {} messages, but {} actual messages",
                        count, actual
                    ),
                )]
            }
            Some(_) => vec![],
        }
    }
}

/// Validator runs every rule, in order, without short-circuiting.
pub struct Validator<R> {
    rules: Vec<Box<dyn ValidationRule<R>>>,
}

impl<R: Validatable> Validator<R> {
    pub fn with_rules(rules: Vec<Box<dyn ValidationRule<R>>>) -> Self {
        Self { rules }
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn validate(&self, record: &R) -> ValidationResult {
        let violations: Vec<_> = self
            .rules
            .iter()
            .flat_map(|rule| rule.validate(record))
            .collect();

        let valid = !violations.iter().any(|v| v.severity == ViolationSeverity::Error);
        ValidationResult { valid, violations, record: record.describe() }
    }
}

impl Validator<Message> {
    pub fn for_messages() -> Self {
        Self::with_rules(vec![
            Box::new(RequiredField::<Message>::new("title", "has no title", |m: &Message| m.title().is_some())),
            Box::new(RequiredField::<Message>::new("date", "has no date", |m: &Message| m.date().is_some())),
            Box::new(FieldErrorRule::<Message>::new("date_format", MessageField::Date)),
            Box::new(TrackAlignmentRule),
            Box::new(FieldErrorRule::<Message>::new("track_format", MessageField::TrackNumbers)),
            Box::new(KnownTypeRule),
            Box::new(FieldErrorRule::<Message>::new("audio_link", MessageField::AudioLink)),
            Box::new(FieldErrorRule::<Message>::new("video_link", MessageField::VideoLink)),
            Box::new(FieldErrorRule::<Message>::new("visibility", MessageField::Visibility)),
        ])
    }
}

impl Validator<Series> {
    pub fn for_series() -> Self {
        Self::with_rules(vec![
            Box::new(RequiredField::<Series>::new("id", "has no identifier", |s: &Series| s.id().is_some())),
            Box::new(RequiredField::<Series>::new("title", "has no title", |s: &Series| s.title().is_some())),
            Box::new(RequiredField::<Series>::new("start_date", "has no start date", |s: &Series| {
                s.start_date().is_some()
            })),
            Box::new(FieldErrorRule::<Series>::new("start_date_format", SeriesField::StartDate)),
            Box::new(FieldErrorRule::<Series>::new("end_date_format", SeriesField::EndDate)),
            Box::new(FieldErrorRule::<Series>::new("message_count_format", SeriesField::MessageCount)),
            Box::new(MessageCountRule),
            Box::new(FieldErrorRule::<Series>::new("visibility", SeriesField::Visibility)),
            Box::new(FieldErrorRule::<Series>::new("cover_art_link", SeriesField::CoverArtLink)),
            Box::new(FieldErrorRule::<Series>::new("cover_image_link", SeriesField::CoverImageLink)),
            Box::new(FieldErrorRule::<Series>::new("study_guide_links", SeriesField::StudyGuideLinks)),
        ])
    }
}

impl Default for Validator<Message> {
    fn default() -> Self {
        Self::for_messages()
    }
}

impl Default for Validator<Series> {
    fn default() -> Self {
        Self::for_series()
    }
}

pub fn validate_message(message: &Message) -> ValidationResult {
    Validator::for_messages().validate(message)
}

pub fn validate_series(series: &Series) -> ValidationResult {
    Validator::for_series().validate(series)
}
