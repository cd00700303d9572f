//! Backend-agnostic query construction and result normalization.
//!
//! Everything a backend needs to know about the meaning of a filter lives
//! here, so the Elasticsearch and OpenSearch adapters (and the in-memory
//! backend) only differ in how they serialize a plan and transport it:
//!
//! - [`field_mapping`] - logical field names to indexed field paths
//! - [`normalize`] - clamping of untrusted offsets, limits and depths
//! - [`index`] - index addressing and tenant enforcement
//! - [`plan`] - resolved query plans shared by every backend
//! - [`results`] - hit decoding, attribute truncation, deduplication

pub mod field_mapping;
pub mod index;
pub mod normalize;
pub mod plan;
pub mod results;

pub use field_mapping::FieldMapping;
pub use index::{IndexLayout, IndexTarget};
pub use plan::{
    ATTRIBUTE_AGGREGATION, AttributeQueryPlan, EventLookupPlan, EventQueryPlan, ID_FIELD,
    RangeClause, SortKey, TermClause,
};
pub use results::{
    RawSearchResponse, attribute_values, compare_events, deduplicate_events, truncate_slash_path,
};
