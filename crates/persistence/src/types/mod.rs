//! Core types for the persistence layer.
//!
//! - [`Event`] - A CADF audit event as returned by the search engine
//! - [`EventFilter`], [`AttributeFilter`] - Backend-agnostic filter descriptions
//! - [`EventPage`] - One page of events plus the total hit count
//!
//! # Examples
//!
//! ```
//! use hermes_persistence::types::{EventFilter, SortSpec, TimeOperator};
//!
//! let filter = EventFilter {
//!     outcome: "!success".to_string(),
//!     observer_type: "service/compute".to_string(),
//!     ..EventFilter::default()
//! }
//! .with_time(TimeOperator::Gte, "2017-11-01T00:00:00+00:00")
//! .with_sort(SortSpec::asc("initiator_id"))
//! .with_page(0, 50);
//!
//! assert_eq!(filter.limit, 50);
//! ```

mod event;
mod filter;

pub use event::{Address, Attachment, Event, Host, Reason, Resource};
pub use filter::{
    AttributeFilter, EventFilter, FieldFilter, NEGATION_PREFIX, SortDirection, SortSpec,
    TimeOperator,
};

use serde::{Deserialize, Serialize};

/// One page of events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventPage {
    /// Events in the requested window, in sort order.
    pub events: Vec<Event>,
    /// Total number of matching events, independent of the window.
    pub total: u64,
}

impl EventPage {
    pub fn new(events: Vec<Event>, total: u64) -> Self {
        Self { events, total }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
