//! CADF audit event records.
//!
//! Events are produced elsewhere and stored by the search engine; this crate
//! only reads them back. The structs model the CADF fields queries filter and
//! sort on, and keep every other member in a flattened map so a record passes
//! through unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

fn is_empty(s: &str) -> bool {
    s.is_empty()
}

/// A CADF audit event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Unique event identifier. Deduplication keys on this value.
    #[serde(default)]
    pub id: String,

    /// CADF event type, e.g. `activity`.
    #[serde(default, skip_serializing_if = "is_empty")]
    pub event_type: String,

    /// RFC 3339 timestamp of the event.
    #[serde(default, skip_serializing_if = "is_empty")]
    pub event_time: String,

    /// CADF action, e.g. `create/role_assignment`.
    #[serde(default, skip_serializing_if = "is_empty")]
    pub action: String,

    /// CADF outcome: `success`, `failure` or `pending`.
    #[serde(default, skip_serializing_if = "is_empty")]
    pub outcome: String,

    /// CADF type URI of the event record itself.
    #[serde(rename = "typeURI", default, skip_serializing_if = "is_empty")]
    pub type_uri: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<Reason>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initiator: Option<Resource>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Resource>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observer: Option<Resource>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,

    /// API path of the request that produced the event.
    #[serde(default, skip_serializing_if = "is_empty")]
    pub request_path: String,

    /// Members not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A CADF resource: the initiator, target or observer of an event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(rename = "typeURI", default, skip_serializing_if = "is_empty")]
    pub type_uri: String,

    #[serde(default, skip_serializing_if = "is_empty")]
    pub id: String,

    #[serde(default, skip_serializing_if = "is_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "is_empty")]
    pub domain: String,

    #[serde(default, skip_serializing_if = "is_empty")]
    pub project_id: String,

    #[serde(default, skip_serializing_if = "is_empty")]
    pub domain_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<Host>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub addresses: Vec<Address>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Network host of an initiator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Host {
    #[serde(default, skip_serializing_if = "is_empty")]
    pub address: String,

    #[serde(default, skip_serializing_if = "is_empty")]
    pub agent: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Endpoint of a target service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default, skip_serializing_if = "is_empty")]
    pub url: String,

    #[serde(default, skip_serializing_if = "is_empty")]
    pub name: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Why an event has its outcome, typically an HTTP status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reason {
    #[serde(default, skip_serializing_if = "is_empty")]
    pub reason_type: String,

    #[serde(default, skip_serializing_if = "is_empty")]
    pub reason_code: String,

    /// Members such as `policyType` and `policyId`.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Additional payload attached to an event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(default, skip_serializing_if = "is_empty")]
    pub name: String,

    #[serde(rename = "typeURI", default, skip_serializing_if = "is_empty")]
    pub type_uri: String,

    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub content: Value,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Event {
    /// Returns the value of a logical filter field, as used by in-memory evaluation.
    ///
    /// Logical names are the keys of [`crate::search::FieldMapping`]. Unknown
    /// names and absent resources yield `None`.
    pub fn field_value(&self, logical: &str) -> Option<&str> {
        let value = match logical {
            "time" => self.event_time.as_str(),
            "action" => self.action.as_str(),
            "outcome" => self.outcome.as_str(),
            "request_path" => self.request_path.as_str(),
            "observer_id" => self.observer.as_ref()?.id.as_str(),
            "observer_type" => self.observer.as_ref()?.type_uri.as_str(),
            "target_id" => self.target.as_ref()?.id.as_str(),
            "target_type" => self.target.as_ref()?.type_uri.as_str(),
            "initiator_id" => self.initiator.as_ref()?.id.as_str(),
            "initiator_type" => self.initiator.as_ref()?.type_uri.as_str(),
            "initiator_name" => self.initiator.as_ref()?.name.as_str(),
            "id" => self.id.as_str(),
            _ => return None,
        };
        Some(value)
    }

    /// Returns the tenants this event belongs to.
    ///
    /// Consolidated indexes store them in a `tenant_ids` member; events without
    /// it fall back to the initiator's project or domain.
    pub fn tenant_ids(&self) -> Vec<&str> {
        if let Some(Value::Array(ids)) = self.extra.get("tenant_ids") {
            return ids.iter().filter_map(Value::as_str).collect();
        }
        self.initiator
            .iter()
            .flat_map(|i| [i.project_id.as_str(), i.domain_id.as_str()])
            .filter(|id| !id.is_empty())
            .collect()
    }
}
