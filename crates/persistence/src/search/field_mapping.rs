//! Logical field names to indexed field paths.

use std::collections::HashMap;
use std::sync::LazyLock;

/// CADF logical names and the backend fields they are indexed under.
///
/// String members are matched on their `.keyword` sub-field so comparisons are
/// exact rather than analyzed.
const CADF_FIELDS: &[(&str, &str)] = &[
    ("time", "eventTime"),
    ("action", "action.keyword"),
    ("outcome", "outcome.keyword"),
    ("request_path", "requestPath.keyword"),
    ("observer_id", "observer.id.keyword"),
    ("observer_type", "observer.typeURI.keyword"),
    ("target_id", "target.id.keyword"),
    ("target_type", "target.typeURI.keyword"),
    ("initiator_id", "initiator.id.keyword"),
    ("initiator_type", "initiator.typeURI.keyword"),
    ("initiator_name", "initiator.name.keyword"),
];

static CADF: LazyLock<FieldMapping> =
    LazyLock::new(|| FieldMapping::from_pairs(CADF_FIELDS.iter().copied()));

/// Read-only mapping from logical field names to backend field paths.
///
/// Every backend resolves names through the same mapping so filter semantics
/// cannot drift between them.
#[derive(Debug, Clone, Default)]
pub struct FieldMapping {
    fields: HashMap<String, String>,
}

impl FieldMapping {
    /// The process-wide CADF mapping.
    pub fn cadf() -> &'static FieldMapping {
        &CADF
    }

    /// Builds a mapping from `(logical, backend)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Resolves a logical name.
    ///
    /// Unmapped names are returned verbatim so new fields can be queried before
    /// a mapping entry exists.
    ///
    /// ```
    /// use hermes_persistence::search::FieldMapping;
    ///
    /// let mapping = FieldMapping::cadf();
    /// assert_eq!(mapping.resolve("initiator_id"), "initiator.id.keyword");
    /// assert_eq!(mapping.resolve("tags"), "tags");
    /// ```
    pub fn resolve<'a>(&'a self, logical: &'a str) -> &'a str {
        self.fields.get(logical).map_or(logical, String::as_str)
    }

    /// Returns `true` if the logical name has an explicit entry.
    pub fn contains(&self, logical: &str) -> bool {
        self.fields.contains_key(logical)
    }

    /// The backend field holding the event time.
    pub fn time_field(&self) -> &str {
        self.resolve("time")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cadf_mapping_entries() {
        let mapping = FieldMapping::cadf();
        assert_eq!(mapping.resolve("time"), "eventTime");
        assert_eq!(mapping.resolve("action"), "action.keyword");
        assert_eq!(mapping.resolve("outcome"), "outcome.keyword");
        assert_eq!(mapping.resolve("request_path"), "requestPath.keyword");
        assert_eq!(mapping.resolve("observer_id"), "observer.id.keyword");
        assert_eq!(mapping.resolve("observer_type"), "observer.typeURI.keyword");
        assert_eq!(mapping.resolve("target_id"), "target.id.keyword");
        assert_eq!(mapping.resolve("target_type"), "target.typeURI.keyword");
        assert_eq!(mapping.resolve("initiator_id"), "initiator.id.keyword");
        assert_eq!(mapping.resolve("initiator_type"), "initiator.typeURI.keyword");
        assert_eq!(mapping.resolve("initiator_name"), "initiator.name.keyword");
        assert_eq!(mapping.time_field(), "eventTime");
    }

    #[test]
    fn test_unmapped_name_passes_through() {
        let mapping = FieldMapping::cadf();
        assert!(!mapping.contains("reason.reasonCode"));
        assert_eq!(mapping.resolve("reason.reasonCode"), "reason.reasonCode");
        assert_eq!(mapping.resolve(""), "");
    }

    #[test]
    fn test_cadf_is_shared() {
        assert!(std::ptr::eq(FieldMapping::cadf(), FieldMapping::cadf()));
    }

    #[test]
    fn test_custom_mapping() {
        let mapping = FieldMapping::from_pairs([("time", "@timestamp")]);
        assert_eq!(mapping.time_field(), "@timestamp");
        assert_eq!(mapping.resolve("action"), "action");
    }
}
