//! OpenSearch query bodies.
//!
//! Translates shared query plans into OpenSearch Query DSL JSON.

use serde_json::{Map, Value, json};

use crate::search::{
    ATTRIBUTE_AGGREGATION, AttributeQueryPlan, EventLookupPlan, EventQueryPlan, ID_FIELD,
    RangeClause, TermClause,
};

fn term(clause: &TermClause) -> Value {
    json!({ "term": { clause.field.as_str(): clause.value } })
}

fn range(clause: &RangeClause) -> Value {
    let bounds: Map<String, Value> = clause
        .bounds
        .iter()
        .map(|(op, value)| (op.as_str().to_string(), json!(value)))
        .collect();
    json!({ "range": { clause.field.as_str(): bounds } })
}

/// Wraps clauses in a bool query, or `match_all` when there are none.
fn bool_query(must: Vec<Value>, filter: Vec<Value>, must_not: Vec<Value>) -> Value {
    let mut bool_query = Map::new();
    if !must.is_empty() {
        bool_query.insert("must".to_string(), json!(must));
    }
    if !filter.is_empty() {
        bool_query.insert("filter".to_string(), json!(filter));
    }
    if !must_not.is_empty() {
        bool_query.insert("must_not".to_string(), json!(must_not));
    }

    if bool_query.is_empty() {
        json!({ "match_all": {} })
    } else {
        json!({ "bool": bool_query })
    }
}

fn tenant_filter(tenant: Option<&TermClause>) -> Vec<Value> {
    tenant.map(term).into_iter().collect()
}

/// Builds the body for an event listing.
pub fn event_search(plan: &EventQueryPlan) -> Value {
    let must: Vec<Value> = plan
        .search
        .iter()
        .map(|query| json!({ "query_string": { "query": query } }))
        .collect();

    let mut filter = tenant_filter(plan.tenant.as_ref());
    filter.extend(plan.filters.iter().map(term));
    filter.extend(plan.range.iter().map(range));

    let must_not: Vec<Value> = plan.exclusions.iter().map(term).collect();

    let sort: Vec<Value> = plan
        .sort
        .iter()
        .map(|key| json!({ key.field.as_str(): { "order": key.direction.as_str() } }))
        .collect();

    json!({
        "query": bool_query(must, filter, must_not),
        "sort": sort,
        "from": plan.from,
        "size": plan.size,
        "track_total_hits": true,
    })
}

/// Builds the body for a single-event lookup.
pub fn event_lookup(plan: &EventLookupPlan) -> Value {
    let mut filter = tenant_filter(plan.tenant.as_ref());
    filter.push(json!({ "term": { ID_FIELD: plan.id } }));

    json!({
        "query": bool_query(Vec::new(), filter, Vec::new()),
        "size": 1,
    })
}

/// Builds the body for an attribute aggregation.
pub fn attribute_aggregation(plan: &AttributeQueryPlan) -> Value {
    json!({
        "query": bool_query(Vec::new(), tenant_filter(plan.tenant.as_ref()), Vec::new()),
        "size": 0,
        "aggs": {
            ATTRIBUTE_AGGREGATION: {
                "terms": {
                    "field": plan.field,
                    "size": plan.size,
                }
            }
        }
    })
}
