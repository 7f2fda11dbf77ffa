//! Ordering Policies
//!
//! Stateless comparators for `sort_by`. Missing keys always sort last,
//! whichever direction the present keys are sorted in.

use chrono::NaiveDate;
use std::cmp::Ordering;
use std::sync::Arc;

use crate::message::Message;
use crate::series::Series;

/// Records that can be put in chronological order.
pub trait Dated {
    fn sort_date(&self) -> Option<NaiveDate>;
}

impl Dated for Message {
    fn sort_date(&self) -> Option<NaiveDate> {
        self.date()
    }
}

impl Dated for Series {
    fn sort_date(&self) -> Option<NaiveDate> {
        self.start_date()
    }
}

impl<T: Dated + ?Sized> Dated for Arc<T> {
    fn sort_date(&self) -> Option<NaiveDate> {
        (**self).sort_date()
    }
}

fn nulls_last<K: Ord>(a: Option<K>, b: Option<K>, present: impl FnOnce(K, K) -> Ordering) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => present(a, b),
    }
}

/// Oldest first.
pub fn by_date<T: Dated + ?Sized>(a: &T, b: &T) -> Ordering {
    nulls_last(a.sort_date(), b.sort_date(), |a, b| a.cmp(&b))
}

/// Newest first.
pub fn by_date_descending<T: Dated + ?Sized>(a: &T, b: &T) -> Ordering {
    nulls_last(a.sort_date(), b.sort_date(), |a, b| b.cmp(&a))
}

/// Orders messages by their track number within one series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByTrackNumber {
    series_name: String,
}

impl ByTrackNumber {
    pub fn new(series_name: impl Into<String>) -> Self {
        Self { series_name: series_name.into() }
    }

    pub fn series_name(&self) -> &str {
        &self.series_name
    }

    pub fn compare(&self, a: &Message, b: &Message) -> Ordering {
        nulls_last(
            a.track_number_in(&self.series_name),
            b.track_number_in(&self.series_name),
            |a, b| a.cmp(&b),
        )
    }
}

/// Closure form of [`ByTrackNumber`].
pub fn by_track_number(series_name: &str) -> impl Fn(&Message, &Message) -> Ordering + '_ {
    move |a, b| {
        nulls_last(
            a.track_number_in(series_name),
            b.track_number_in(series_name),
            |a, b| a.cmp(&b),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dated(title: &str, date: Option<(i32, u32, u32)>) -> Message {
        let mut m = Message::new();
        m.set_title(title.to_string());
        m.set_date(date.and_then(|(y, mo, d)| NaiveDate::from_ymd_opt(y, mo, d)));
        m
    }

    fn titles(messages: &[Message]) -> Vec<&str> {
        messages.iter().filter_map(Message::title).collect()
    }

    #[test]
    fn test_by_date_nulls_last_both_directions() {
        let mut messages = vec![
            dated("none", None),
            dated("late", Some((2015, 6, 1))),
            dated("early", Some((2013, 2, 3))),
        ];

        messages.sort_by(by_date);
        assert_eq!(titles(&messages), vec!["early", "late", "none"]);

        messages.sort_by(by_date_descending);
        assert_eq!(titles(&messages), vec!["late", "early", "none"]);
    }

    #[test]
    fn test_by_track_number() {
        let in_series = |title: &str, track: u32| {
            let mut m = Message::new();
            m.set_title(title.to_string());
            m.set_series(vec!["Abide".into()]);
            m.set_track_numbers(vec![track]);
            m
        };
        let mut messages = vec![in_series("two", 2), dated("stray", None), in_series("one", 1)];

        let order = ByTrackNumber::new("abide");
        messages.sort_by(|a, b| order.compare(a, b));
        assert_eq!(titles(&messages), vec!["one", "two", "stray"]);

        messages.reverse();
        messages.sort_by(by_track_number("Abide"));
        assert_eq!(titles(&messages), vec!["one", "two", "stray"]);
    }

    #[test]
    fn test_equal_tracks_compare_equal() {
        let order = ByTrackNumber::new("x");
        assert_eq!(order.compare(&Message::new(), &Message::new()), Ordering::Equal);
    }
}
