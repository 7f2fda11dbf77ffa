//! Raw Record Plumbing
//!
//! Shared helpers for turning loader output into typed fields, and the
//! per-field error store that lets a record collect every problem before
//! validation reports them together.

use chrono::NaiveDate;
use std::collections::BTreeMap;

/// One loaded row: normalized field name to cell text.
pub type RawRecord = BTreeMap<String, String>;

const DATE_FORMATS: &[&str] = &["%b %d, %Y", "%B %d, %Y", "%Y-%m-%d"];

/// Look up a field, treating blank cells as absent.
pub fn field<'a>(record: &'a RawRecord, name: &str) -> Option<&'a str> {
    record
        .get(name)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

/// Split a `;`-delimited cell, trimming whitespace around each entry.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a medium-format (`Jan 5, 2014`) or ISO date.
pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| format!("unable to parse date '{}'", raw))
}

pub fn format_medium_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Last parse error per field, iterated in field order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldErrors<F: Ord> {
    errors: BTreeMap<F, String>,
}

impl<F: Ord + Copy> FieldErrors<F> {
    pub fn new() -> Self {
        Self { errors: BTreeMap::new() }
    }

    pub fn record(&mut self, field: F, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }

    pub fn clear(&mut self, field: F) {
        self.errors.remove(&field);
    }

    pub fn get(&self, field: F) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (F, &str)> {
        self.errors.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

impl<F: Ord + Copy> Default for FieldErrors<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a [`RawRecord`] from literal pairs. Handy for fixtures.
pub fn raw_record<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> RawRecord {
    pairs
        .into_iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}
