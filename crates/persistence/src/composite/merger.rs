//! Result merging for hybrid storage.
//!
//! Both backends are asked for the same leading window of results. The
//! windows are concatenated primary-first, deduplicated by event ID (so the
//! primary's copy of an event wins), re-sorted with the effective sort keys
//! and finally cut down to the caller's page.

use crate::search::{SortKey, compare_events, deduplicate_events};
use crate::types::EventPage;

/// Outcome of merging two pages.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedPage {
    pub page: EventPage,
    /// Events present in both inputs.
    pub duplicates: u64,
}

/// Merges two event pages into the requested window.
///
/// `offset` and `limit` must already be normalized. The total is the sum of
/// both totals minus the duplicates seen inside the fetched windows, which is
/// exact whenever the windows cover all matching events.
pub fn merge_pages(
    primary: EventPage,
    secondary: EventPage,
    sort: &[SortKey],
    offset: usize,
    limit: usize,
) -> MergedPage {
    let fetched = primary.events.len() + secondary.events.len();
    let mut merged = deduplicate_events(
        primary
            .events
            .into_iter()
            .chain(secondary.events)
            .map(Some),
    );
    let duplicates = (fetched - merged.len()) as u64;

    // Stable, so ties keep primary-first order.
    merged.sort_by(|a, b| compare_events(a, b, sort));

    let events = merged.into_iter().skip(offset).take(limit).collect();
    let total = (primary.total + secondary.total).saturating_sub(duplicates);

    MergedPage {
        page: EventPage::new(events, total),
        duplicates,
    }
}

/// Unions two attribute value lists into one sorted, duplicate-free list of at
/// most `limit` values.
pub fn merge_attribute_values(primary: Vec<String>, secondary: Vec<String>, limit: usize) -> Vec<String> {
    let mut values: Vec<String> = primary.into_iter().chain(secondary).collect();
    values.sort();
    values.dedup();
    values.truncate(limit);
    values
}
