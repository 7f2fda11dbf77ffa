//! Access Levels
//!
//! Defines who may see a record, and the predicate used to filter the
//! message views handed to renderers.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Access level of a message or series, ordered from most to least public.
///
/// `Raw` marks unedited recordings and is only legal on messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    Public,
    Protected,
    Private,
    Raw,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown visibility '{0}'")]
pub struct UnknownVisibility(pub String);

impl AccessLevel {
    /// The only level that gets its own detail pages.
    pub const MOST_PUBLIC: AccessLevel = AccessLevel::Public;

    /// Label used in the source spreadsheets.
    pub fn label(&self) -> &'static str {
        match self {
            AccessLevel::Public => "Public",
            AccessLevel::Protected => "Protected",
            AccessLevel::Private => "Private",
            AccessLevel::Raw => "Private (Raw)",
        }
    }

    /// Parse a spreadsheet label, case-insensitively.
    ///
    /// `Private (Raw)` is only accepted when `allow_raw` is set.
    pub fn parse_label(label: &str, allow_raw: bool) -> Result<Self, UnknownVisibility> {
        match label.to_lowercase().as_str() {
            "public" => Ok(AccessLevel::Public),
            "protected" => Ok(AccessLevel::Protected),
            "private" => Ok(AccessLevel::Private),
            "private (raw)" if allow_raw => Ok(AccessLevel::Raw),
            _ => Err(UnknownVisibility(label.to_string())),
        }
    }

    /// True when `self` is visible to an audience cleared for `max_level`.
    pub fn is_within(self, max_level: AccessLevel) -> bool {
        self <= max_level
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Decides whether a record with the given level may be shown.
pub trait VisibilityPredicate {
    fn is_visible(&self, level: Option<AccessLevel>) -> bool;
}

impl<F> VisibilityPredicate for F
where
    F: Fn(Option<AccessLevel>) -> bool,
{
    fn is_visible(&self, level: Option<AccessLevel>) -> bool {
        self(level)
    }
}

/// Threshold visibility: everything at least as public as `max_level`.
///
/// Records without a level are never visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityPolicy {
    pub max_level: AccessLevel,
}

impl VisibilityPolicy {
    pub fn up_to(max_level: AccessLevel) -> Self {
        Self { max_level }
    }

    pub fn public_only() -> Self {
        Self::up_to(AccessLevel::Public)
    }
}

impl Default for VisibilityPolicy {
    fn default() -> Self {
        Self::public_only()
    }
}

impl VisibilityPredicate for VisibilityPolicy {
    fn is_visible(&self, level: Option<AccessLevel>) -> bool {
        level.map_or(false, |l| l.is_within(self.max_level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(AccessLevel::parse_label("PUBLIC", false), Ok(AccessLevel::Public));
        assert_eq!(AccessLevel::parse_label("protected", false), Ok(AccessLevel::Protected));
        assert_eq!(AccessLevel::parse_label("Private (Raw)", true), Ok(AccessLevel::Raw));
    }

    #[test]
    fn test_raw_rejected_when_not_allowed() {
        let err = AccessLevel::parse_label("Private (Raw)", false).unwrap_err();
        assert_eq!(err.to_string(), "unknown visibility 'Private (Raw)'");
    }

    #[test]
    fn test_policy_threshold() {
        let policy = VisibilityPolicy::up_to(AccessLevel::Protected);
        assert!(policy.is_visible(Some(AccessLevel::Public)));
        assert!(policy.is_visible(Some(AccessLevel::Protected)));
        assert!(!policy.is_visible(Some(AccessLevel::Private)));
        assert!(!policy.is_visible(None));
    }

    #[test]
    fn test_closure_predicate() {
        let everything = |_: Option<AccessLevel>| true;
        let predicate: &dyn VisibilityPredicate = &everything;
        assert!(predicate.is_visible(None));
    }
}
