//! Reconciliation
//!
//! Matches messages into the series they name, in track order.

use std::sync::Arc;
use tracing::{debug, info};

use crate::message::Message;
use crate::ordering::ByTrackNumber;
use crate::series::Series;

/// Find every message in `all_messages` that belongs to `series` and store
/// them on the series, sorted by track number.
///
/// Replaces any previously resolved list. Returns the number found.
pub fn discover_messages(series: &mut Series, all_messages: &[Arc<Message>]) -> usize {
    let Some(title) = series.title().map(str::to_owned) else {
        series.set_messages(Some(vec![]));
        return 0;
    };

    let order = ByTrackNumber::new(title);
    let mut matched: Vec<Arc<Message>> = all_messages
        .iter()
        .filter(|message| message.track_number_in(order.series_name()).is_some())
        .cloned()
        .collect();
    matched.sort_by(|a, b| order.compare(a, b));

    let found = matched.len();
    debug!(series = order.series_name(), found, "discovered messages");
    series.set_messages(Some(matched));
    found
}

/// Reconcile every series against the same catalog.
pub fn reconcile_all(series_list: &mut [Series], all_messages: &[Arc<Message>]) -> usize {
    let total = series_list
        .iter_mut()
        .map(|series| discover_messages(series, all_messages))
        .sum::<usize>();
    info!(series = series_list.len(), messages = total, "reconciled catalog");
    total
}

/// A reconciled catalog.
///
/// The only way to build one runs reconciliation, so anything holding a
/// `Catalog` sees series whose message lists are resolved.
#[derive(Debug, Clone)]
pub struct Catalog {
    messages: Vec<Arc<Message>>,
    series: Vec<Series>,
}

impl Catalog {
    pub fn new(messages: Vec<Message>, mut series: Vec<Series>) -> Self {
        let messages: Vec<Arc<Message>> = messages.into_iter().map(Arc::new).collect();
        reconcile_all(&mut series, &messages);
        Self { messages, series }
    }

    pub fn messages(&self) -> &[Arc<Message>] {
        &self.messages
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    /// Reorder the series list; reconciliation results are untouched.
    pub fn sort_series_by(&mut self, compare: impl FnMut(&Series, &Series) -> std::cmp::Ordering) {
        self.series.sort_by(compare);
    }
}
