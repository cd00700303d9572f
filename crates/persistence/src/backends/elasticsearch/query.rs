//! Typed Elasticsearch Query DSL.
//!
//! Plans are serialized into these structs instead of free-form JSON so that
//! the request shape is checked by the compiler. Only the subset of the DSL
//! audit queries need is modelled.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::search::{AttributeQueryPlan, EventLookupPlan, EventQueryPlan, ID_FIELD, TermClause};
use crate::search::{ATTRIBUTE_AGGREGATION, RangeClause};
use crate::types::{SortDirection, TimeOperator};

/// A complete `_search` request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    pub query: Query,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<BTreeMap<String, FieldSort>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<u32>,
    pub size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_total_hits: Option<bool>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub aggs: BTreeMap<String, Aggregation>,
}

/// A query clause.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Query {
    Bool(BoolQuery),
    Term(BTreeMap<String, String>),
    Range(BTreeMap<String, RangeBounds>),
    QueryString(QueryString),
    MatchAll(MatchAll),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BoolQuery {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub must: Vec<Query>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filter: Vec<Query>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub must_not: Vec<Query>,
}

impl BoolQuery {
    fn is_empty(&self) -> bool {
        self.must.is_empty() && self.filter.is_empty() && self.must_not.is_empty()
    }

    fn into_query(self) -> Query {
        if self.is_empty() {
            Query::MatchAll(MatchAll {})
        } else {
            Query::Bool(self)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RangeBounds {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lte: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gte: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryString {
    pub query: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchAll {}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSort {
    pub order: SortDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    Terms(TermsAggregation),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermsAggregation {
    pub field: String,
    pub size: u32,
}

fn term(clause: &TermClause) -> Query {
    Query::Term(BTreeMap::from([(clause.field.clone(), clause.value.clone())]))
}

fn range(clause: &RangeClause) -> Query {
    let mut bounds = RangeBounds::default();
    for (op, value) in &clause.bounds {
        let slot = match op {
            TimeOperator::Lt => &mut bounds.lt,
            TimeOperator::Lte => &mut bounds.lte,
            TimeOperator::Gt => &mut bounds.gt,
            TimeOperator::Gte => &mut bounds.gte,
        };
        *slot = Some(value.clone());
    }
    Query::Range(BTreeMap::from([(clause.field.clone(), bounds)]))
}

fn tenant_only(tenant: Option<&TermClause>) -> BoolQuery {
    BoolQuery {
        filter: tenant.map(term).into_iter().collect(),
        ..BoolQuery::default()
    }
}

/// Serializes an event listing plan.
pub fn event_search(plan: &EventQueryPlan) -> SearchRequest {
    let mut query = tenant_only(plan.tenant.as_ref());
    query.filter.extend(plan.filters.iter().map(term));
    query.filter.extend(plan.range.iter().map(range));
    query.must_not.extend(plan.exclusions.iter().map(term));
    if let Some(search) = &plan.search {
        query.must.push(Query::QueryString(QueryString {
            query: search.clone(),
        }));
    }

    SearchRequest {
        query: query.into_query(),
        sort: plan
            .sort
            .iter()
            .map(|key| {
                BTreeMap::from([(
                    key.field.clone(),
                    FieldSort {
                        order: key.direction,
                    },
                )])
            })
            .collect(),
        from: Some(plan.from),
        size: plan.size,
        track_total_hits: Some(true),
        aggs: BTreeMap::new(),
    }
}

/// Serializes a single-event lookup plan.
pub fn event_lookup(plan: &EventLookupPlan) -> SearchRequest {
    let mut query = tenant_only(plan.tenant.as_ref());
    query.filter.push(Query::Term(BTreeMap::from([(
        ID_FIELD.to_string(),
        plan.id.clone(),
    )])));
    SearchRequest {
        query: query.into_query(),
        sort: Vec::new(),
        from: None,
        size: 1,
        track_total_hits: None,
        aggs: BTreeMap::new(),
    }
}

/// Serializes an attribute aggregation plan.
pub fn attribute_aggregation(plan: &AttributeQueryPlan) -> SearchRequest {
    SearchRequest {
        query: tenant_only(plan.tenant.as_ref()).into_query(),
        sort: Vec::new(),
        from: None,
        size: 0,
        track_total_hits: None,
        aggs: BTreeMap::from([(
            ATTRIBUTE_AGGREGATION.to_string(),
            Aggregation::Terms(TermsAggregation {
                field: plan.field.clone(),
                size: plan.size,
            }),
        )]),
    }
}
