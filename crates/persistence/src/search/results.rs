//! Normalization of raw search responses.
//!
//! Both search engines answer with the same response shape, so hits,
//! totals and aggregation buckets are decoded here once. Decoding is strict:
//! one malformed hit fails the whole call, since an audit trail must never
//! silently lose a record.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{BackendError, StorageResult};
use crate::types::{Event, EventPage, SortDirection};

use super::plan::{ATTRIBUTE_AGGREGATION, SortKey};

/// Top-level search response.
#[derive(Debug, Default, Deserialize)]
pub struct RawSearchResponse {
    #[serde(default)]
    pub hits: RawHits,
    #[serde(default)]
    pub aggregations: HashMap<String, RawAggregation>,
}

/// The `hits` member of a search response.
#[derive(Debug, Default, Deserialize)]
pub struct RawHits {
    #[serde(default)]
    pub total: Option<RawTotal>,
    #[serde(default)]
    pub hits: Vec<RawHit>,
}

/// Total hit count. Older engines report a bare number.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub enum RawTotal {
    Count(u64),
    Object { value: u64 },
}

impl RawTotal {
    pub fn value(self) -> u64 {
        match self {
            RawTotal::Count(v) | RawTotal::Object { value: v } => v,
        }
    }
}

/// A single hit.
#[derive(Debug, Deserialize)]
pub struct RawHit {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(rename = "_source", default)]
    pub source: Option<Value>,
}

/// A bucket aggregation.
#[derive(Debug, Default, Deserialize)]
pub struct RawAggregation {
    #[serde(default)]
    pub buckets: Vec<RawBucket>,
}

/// One `(key, count)` bucket.
#[derive(Debug, Deserialize)]
pub struct RawBucket {
    pub key: Value,
    #[serde(default)]
    pub doc_count: u64,
}

/// Decodes every hit into an [`Event`], failing on the first malformed one.
pub fn parse_events(hits: Vec<RawHit>) -> StorageResult<Vec<Event>> {
    let mut events = Vec::with_capacity(hits.len());
    for hit in hits {
        let hit_id = hit.id.unwrap_or_default();
        let source = hit.source.ok_or_else(|| BackendError::Serialization {
            message: format!("hit '{hit_id}' has no _source"),
        })?;
        let event = serde_json::from_value::<Event>(source).map_err(|e| {
            BackendError::Serialization {
                message: format!("failed to decode event '{hit_id}': {e}"),
            }
        })?;
        events.push(event);
    }
    Ok(events)
}

impl RawSearchResponse {
    /// Converts the response into a page of events.
    ///
    /// A missing total falls back to the number of decoded hits.
    pub fn into_page(self) -> StorageResult<EventPage> {
        let total = self.hits.total.map(RawTotal::value);
        let events = parse_events(self.hits.hits)?;
        let total = total.unwrap_or(events.len() as u64);
        tracing::debug!(hits = events.len(), total, "decoded event page");
        Ok(EventPage::new(events, total))
    }

    /// Returns the first hit, or `None` when nothing matched.
    pub fn into_first_event(self) -> StorageResult<Option<Event>> {
        let first = self.hits.hits.into_iter().take(1).collect();
        Ok(parse_events(first)?.pop())
    }

    /// Extracts the attribute values from the terms aggregation.
    pub fn into_attribute_values(mut self, max_depth: Option<u32>) -> Vec<String> {
        match self.aggregations.remove(ATTRIBUTE_AGGREGATION) {
            Some(aggregation) => attribute_values(&aggregation.buckets, max_depth),
            None => {
                tracing::warn!("search response carried no '{ATTRIBUTE_AGGREGATION}' aggregation");
                Vec::new()
            }
        }
    }
}

/// Converts a bucket key to its string form.
///
/// Strings are used as-is; other scalars use their JSON text.
pub fn bucket_key(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Truncates a slash-separated path to its first `max_depth` segments.
///
/// Paths without a slash, paths with at most `max_depth` segments, and a depth
/// of `None` (or `Some(0)`) are returned unchanged.
///
/// ```
/// use hermes_persistence::search::truncate_slash_path;
///
/// assert_eq!(truncate_slash_path("service/compute/instance", Some(2)), "service/compute");
/// assert_eq!(truncate_slash_path("service", Some(2)), "service");
/// assert_eq!(truncate_slash_path("a/b/c/d/e/f/g", Some(3)), "a/b/c");
/// assert_eq!(truncate_slash_path("a/b/c", None), "a/b/c");
/// ```
pub fn truncate_slash_path(path: &str, max_depth: Option<u32>) -> &str {
    let depth = match max_depth {
        None | Some(0) => return path,
        Some(d) => d as usize,
    };
    path.match_indices('/')
        .nth(depth - 1)
        .map_or(path, |(idx, _)| &path[..idx])
}

/// Converts buckets to truncated, deduplicated, sorted attribute values.
pub fn attribute_values(buckets: &[RawBucket], max_depth: Option<u32>) -> Vec<String> {
    let mut values: Vec<String> = buckets
        .iter()
        .map(|bucket| truncate_slash_path(&bucket_key(&bucket.key), max_depth).to_string())
        .collect();
    values.sort();
    values.dedup();
    values
}

/// Merges event lists, keeping the first occurrence of each event ID.
///
/// `None` entries are skipped. Relative order of first occurrences is preserved.
pub fn deduplicate_events<I>(events: I) -> Vec<Event>
where
    I: IntoIterator<Item = Option<Event>>,
{
    let mut seen = HashSet::new();
    events
        .into_iter()
        .flatten()
        .filter(|event| seen.insert(event.id.clone()))
        .collect()
}

/// Parses an event timestamp.
///
/// Accepts RFC 3339 as well as offset-less date-times and plain dates, which
/// are taken as UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt);
    }
    let utc = FixedOffset::east_opt(0)?;
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_local_timezone(utc).single()?);
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
    date.and_hms_opt(0, 0, 0)?.and_local_timezone(utc).single()
}

/// Compares two values of a logical field.
///
/// Times compare chronologically, and a parseable time orders before one that
/// does not parse. Unparseable times and all other fields compare lexically.
pub fn compare_field_values(logical: &str, a: &str, b: &str) -> Ordering {
    if logical != "time" {
        return a.cmp(b);
    }
    match (parse_timestamp(a), parse_timestamp(b)) {
        (Some(ta), Some(tb)) => ta.cmp(&tb),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Orders two events by a list of sort keys.
///
/// Events missing a sort field come last in either direction.
pub fn compare_events(a: &Event, b: &Event, keys: &[SortKey]) -> Ordering {
    for key in keys {
        let ordering = match (a.field_value(&key.logical), b.field_value(&key.logical)) {
            (Some(va), Some(vb)) => {
                let ord = compare_field_values(&key.logical, va, vb);
                match key.direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            }
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use serde_json::json;

    fn event(id: &str) -> Event {
        Event {
            id: id.to_string(),
            ..Event::default()
        }
    }

    fn bucket(key: Value) -> RawBucket {
        RawBucket { key, doc_count: 1 }
    }

    #[test]
    fn test_truncate_examples() {
        assert_eq!(truncate_slash_path("service/compute/instance", Some(2)), "service/compute");
        assert_eq!(truncate_slash_path("service", Some(2)), "service");
        assert_eq!(truncate_slash_path("a/b/c/d/e/f/g", Some(3)), "a/b/c");
        assert_eq!(truncate_slash_path("a/b", Some(2)), "a/b");
        assert_eq!(truncate_slash_path("a/b/c", Some(1)), "a");
        assert_eq!(truncate_slash_path("a/b/c", Some(0)), "a/b/c");
    }

    #[test]
    fn test_truncate_is_idempotent() {
        let paths = [
            "",
            "/",
            "a",
            "a/",
            "/a/b",
            "a//b/c",
            "service/compute/instance/extra",
            "a/b/c/d/e/f/g",
        ];
        for path in paths {
            for depth in 1..=8 {
                let once = truncate_slash_path(path, Some(depth));
                let twice = truncate_slash_path(once, Some(depth));
                assert_eq!(once, twice, "path {path:?} depth {depth}");
            }
        }
    }

    #[test]
    fn test_attribute_values_truncate_dedup_sort() {
        let buckets = vec![
            bucket(json!("network/floatingip")),
            bucket(json!("compute/server/a")),
            bucket(json!("compute/server/b")),
        ];
        assert_eq!(
            attribute_values(&buckets, Some(2)),
            vec!["compute/server", "network/floatingip"]
        );
    }

    #[test]
    fn test_bucket_key_non_string() {
        assert_eq!(bucket_key(&json!(409)), "409");
        assert_eq!(bucket_key(&json!(true)), "true");
        assert_eq!(bucket_key(&json!("x")), "x");
    }

    #[test]
    fn test_deduplicate_keeps_first_and_order() {
        let mut duplicate = event("3");
        duplicate.action = "X".to_string();
        let merged = deduplicate_events(vec![
            Some(event("3")),
            None,
            Some(event("1")),
            Some(duplicate),
            None,
            Some(event("2")),
        ]);
        let ids: Vec<_> = merged.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "1", "2"]);
        assert_eq!(merged[0].action, "");
    }

    #[test]
    fn test_parse_events_strict() {
        let response: RawSearchResponse = serde_json::from_value(json!({
            "hits": {
                "total": {"value": 2, "relation": "eq"},
                "hits": [
                    {"_id": "a", "_source": {"id": "a"}},
                    {"_id": "b", "_source": {"id": "b", "attachments": "not-a-list"}}
                ]
            }
        }))
        .unwrap();
        let err = response.into_page().unwrap_err();
        assert!(matches!(
            err,
            StorageError::Backend(BackendError::Serialization { .. })
        ));
    }

    #[test]
    fn test_missing_source_is_an_error() {
        let hits = vec![RawHit {
            id: Some("a".to_string()),
            source: None,
        }];
        assert!(parse_events(hits).is_err());
    }

    #[test]
    fn test_total_shapes() {
        let response: RawSearchResponse =
            serde_json::from_value(json!({"hits": {"total": 7, "hits": []}})).unwrap();
        assert_eq!(response.into_page().unwrap().total, 7);

        let response: RawSearchResponse =
            serde_json::from_value(json!({"hits": {"hits": [{"_source": {"id": "a"}}]}})).unwrap();
        assert_eq!(response.into_page().unwrap().total, 1);
    }

    #[test]
    fn test_first_event_none_when_empty() {
        let response: RawSearchResponse =
            serde_json::from_value(json!({"hits": {"total": {"value": 0}, "hits": []}})).unwrap();
        assert!(response.into_first_event().unwrap().is_none());
    }

    #[test]
    fn test_missing_aggregation_yields_empty() {
        let response = RawSearchResponse::default();
        assert!(response.into_attribute_values(None).is_empty());
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let a = parse_timestamp("2017-11-17T08:53:32.667973+00:00").unwrap();
        let b = parse_timestamp("2017-11-17T09:53:32.667973+01:00").unwrap();
        assert_eq!(a, b);
        assert!(parse_timestamp("2017-11-17T08:53:32").is_some());
        assert!(parse_timestamp("2017-11-17").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_compare_events_time_desc_then_missing_last() {
        let mut old = event("old");
        old.event_time = "2017-11-06T10:15:56.984390+00:00".to_string();
        let mut new = event("new");
        new.event_time = "2017-11-17T08:53:32.667973+00:00".to_string();
        let untimed = event("untimed");

        let keys = vec![SortKey {
            logical: "time".to_string(),
            field: "eventTime".to_string(),
            direction: SortDirection::Desc,
        }];
        let mut events = vec![untimed, old, new];
        events.sort_by(|a, b| compare_events(a, b, &keys));
        let ids: Vec<_> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old", "untimed"]);
    }

    #[test]
    fn test_compare_time_values_is_total() {
        let values = [
            "2017-11-02T00:00:00+00:00",
            "2017-11-01T12:00:00+02:00",
            "2017-11-01",
            "2017-11-01Tbroken",
            "0000-bogus",
            "zzz",
        ];
        assert_eq!(compare_field_values("time", values[0], values[3]), Ordering::Less);
        assert_eq!(compare_field_values("time", values[4], values[2]), Ordering::Greater);
        assert_eq!(compare_field_values("time", values[3], values[4]), Ordering::Greater);

        for a in values {
            for b in values {
                let ab = compare_field_values("time", a, b);
                assert_eq!(ab, compare_field_values("time", b, a).reverse());
                for c in values {
                    let bc = compare_field_values("time", b, c);
                    if ab != Ordering::Greater && bc != Ordering::Greater {
                        assert_ne!(
                            compare_field_values("time", a, c),
                            Ordering::Greater,
                            "{a} <= {b} <= {c}"
                        );
                    }
                }
            }
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| compare_field_values("time", a, b));
        assert_eq!(
            sorted,
            vec![
                "2017-11-01",
                "2017-11-01T12:00:00+02:00",
                "2017-11-02T00:00:00+00:00",
                "0000-bogus",
                "2017-11-01Tbroken",
                "zzz",
            ]
        );
    }
}
