//! Backend-agnostic filter descriptions.
//!
//! A filter is built once per request from untrusted input and never mutated
//! afterwards. Numeric inputs are kept exactly as received; clamping happens
//! when a query plan is built (see [`crate::search::normalize`]).

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Prefix marking an equality filter as "not equal".
pub const NEGATION_PREFIX: char = '!';

/// A range operator on the event time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOperator {
    Lt,
    Lte,
    Gt,
    Gte,
}

impl TimeOperator {
    /// Returns the operator keyword understood by range queries.
    pub fn as_str(self) -> &'static str {
        match self {
            TimeOperator::Lt => "lt",
            TimeOperator::Lte => "lte",
            TimeOperator::Gt => "gt",
            TimeOperator::Gte => "gte",
        }
    }
}

impl FromStr for TimeOperator {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lt" => Ok(TimeOperator::Lt),
            "lte" => Ok(TimeOperator::Lte),
            "gt" => Ok(TimeOperator::Gt),
            "gte" => Ok(TimeOperator::Gte),
            other => Err(ValidationError::InvalidParameter {
                parameter: "time".to_string(),
                message: format!("unknown operator '{other}', expected lt, lte, gt or gte"),
            }),
        }
    }
}

impl fmt::Display for TimeOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(ValidationError::InvalidParameter {
                parameter: "sort".to_string(),
                message: format!("unknown direction '{other}', expected asc or desc"),
            }),
        }
    }
}

/// One sort key on a logical field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Desc)
    }
}

/// An equality filter on a single field, after negation detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldFilter<'a> {
    /// Match events whose field equals the value.
    Equals(&'a str),
    /// Match events whose field does not equal the value.
    NotEquals(&'a str),
}

impl<'a> FieldFilter<'a> {
    /// Interprets a raw filter value.
    ///
    /// A leading `!` turns the filter into an exclusion. Returns `None` when
    /// nothing is left to match on, including the bare `!`.
    ///
    /// ```
    /// use hermes_persistence::types::FieldFilter;
    ///
    /// assert_eq!(FieldFilter::parse("success"), Some(FieldFilter::Equals("success")));
    /// assert_eq!(FieldFilter::parse("!success"), Some(FieldFilter::NotEquals("success")));
    /// assert_eq!(FieldFilter::parse("!"), None);
    /// assert_eq!(FieldFilter::parse(""), None);
    /// ```
    pub fn parse(raw: &'a str) -> Option<Self> {
        match raw.strip_prefix(NEGATION_PREFIX) {
            Some("") => None,
            Some(value) => Some(FieldFilter::NotEquals(value)),
            None if raw.is_empty() => None,
            None => Some(FieldFilter::Equals(raw)),
        }
    }

    /// The value compared against, without the negation marker.
    pub fn value(&self) -> &'a str {
        match self {
            FieldFilter::Equals(v) | FieldFilter::NotEquals(v) => v,
        }
    }

    pub fn is_negated(&self) -> bool {
        matches!(self, FieldFilter::NotEquals(_))
    }
}

/// Filter for event listing.
///
/// All string filters are exact matches on the mapped backend field; an empty
/// string means "no filter" and a leading `!` means "not equal".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventFilter {
    pub observer_type: String,
    pub target_type: String,
    pub target_id: String,
    pub initiator_type: String,
    pub initiator_id: String,
    pub initiator_name: String,
    pub action: String,
    pub outcome: String,
    pub request_path: String,

    /// Time bounds, all of which must hold.
    pub time: BTreeMap<TimeOperator, String>,

    /// Free-text query, passed to the backend's query-string syntax.
    pub search: String,

    /// Sort keys in priority order. `time desc` is always appended.
    pub sort: Vec<SortSpec>,

    pub offset: u64,
    pub limit: u64,
}

impl EventFilter {
    /// Returns the scalar filters as `(logical field, raw value)` pairs, in a fixed order.
    pub fn term_filters(&self) -> [(&'static str, &str); 9] {
        [
            ("observer_type", self.observer_type.as_str()),
            ("target_type", self.target_type.as_str()),
            ("target_id", self.target_id.as_str()),
            ("initiator_type", self.initiator_type.as_str()),
            ("initiator_id", self.initiator_id.as_str()),
            ("initiator_name", self.initiator_name.as_str()),
            ("action", self.action.as_str()),
            ("outcome", self.outcome.as_str()),
            ("request_path", self.request_path.as_str()),
        ]
    }

    /// Sets a scalar filter by logical name. Returns `false` for unknown names.
    pub fn set_term(&mut self, field: &str, value: impl Into<String>) -> bool {
        let slot = match field {
            "observer_type" => &mut self.observer_type,
            "target_type" => &mut self.target_type,
            "target_id" => &mut self.target_id,
            "initiator_type" => &mut self.initiator_type,
            "initiator_id" => &mut self.initiator_id,
            "initiator_name" => &mut self.initiator_name,
            "action" => &mut self.action,
            "outcome" => &mut self.outcome,
            "request_path" => &mut self.request_path,
            _ => return false,
        };
        *slot = value.into();
        true
    }

    pub fn with_time(mut self, op: TimeOperator, value: impl Into<String>) -> Self {
        self.time.insert(op, value.into());
        self
    }

    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort.push(sort);
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_page(mut self, offset: u64, limit: u64) -> Self {
        self.offset = offset;
        self.limit = limit;
        self
    }
}

/// Filter for attribute-value aggregation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeFilter {
    /// Logical name of the attribute, e.g. `target_type`.
    pub query_name: String,
    /// Maximum number of distinct values. 0 selects the default.
    pub limit: u64,
    /// Maximum number of `/`-separated segments kept per value. 0 disables truncation.
    pub max_depth: u64,
}

impl AttributeFilter {
    pub fn new(query_name: impl Into<String>) -> Self {
        Self {
            query_name: query_name.into(),
            ..Self::default()
        }
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_max_depth(mut self, max_depth: u64) -> Self {
        self.max_depth = max_depth;
        self
    }
}
