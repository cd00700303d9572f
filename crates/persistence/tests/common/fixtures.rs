//! CADF event fixtures.
//!
//! Four Keystone-style events for two projects: two successful role
//! assignments and two failed logins, with distinct timestamps so the default
//! time-descending order is unambiguous.

use serde_json::{Value, json};

use hermes_persistence::types::Event;

pub const PROJECT_A: &str = "a759dcc2a2384a76b0386bb985952373";
pub const PROJECT_B: &str = "ae63ddf2076d4342a56eb049e37a7621";

pub const SUCCESS_NEWER: &str = "7be6c4ff-b761-5f1f-b234-f5d41616c2cd";
pub const SUCCESS_OLDER: &str = "f6f0ebf3-bf59-553a-9e38-788f714ccc46";
pub const FAILURE_NEWER: &str = "d3f6695e-8a55-5db1-895c-9f7f0910b7a5";
pub const FAILURE_OLDER: &str = "1bad0c4e-b0b4-5d5c-8f0a-a5e8f0b2ac3a";

/// Raw JSON for one event, as the search engine stores it.
pub fn event_json(id: &str, time: &str, action: &str, outcome: &str, project: &str) -> Value {
    json!({
        "id": id,
        "eventType": "activity",
        "eventTime": time,
        "action": action,
        "outcome": outcome,
        "typeURI": "http://schemas.dmtf.org/cloud/audit/1.0/event",
        "reason": {"reasonType": "HTTP", "reasonCode": if outcome == "success" { "201" } else { "401" }},
        "initiator": {
            "typeURI": "service/security/account/user",
            "id": "21ff350bc75824262c60adfc58b7fd4a7349120f43a990c2888e6b0b88af6398",
            "name": "test_admin",
            "domain": "Default",
            "project_id": project,
            "host": {"address": "100.66.0.24", "agent": "python-keystoneclient"}
        },
        "target": {
            "typeURI": "data/security/project",
            "id": "ff4c2a7a74e94d4b8a7a3c8c39c4fb8e",
            "addresses": [{"url": "https://identity-3.example.com/v3", "name": "public"}]
        },
        "observer": {
            "typeURI": "service/security",
            "id": "0e8a00bf-e36c-5a51-9418-2d56d59c8887",
            "name": "keystone"
        },
        "requestPath": "/v3/auth/tokens",
        "tenant_ids": [project]
    })
}

/// The four fixture events in storage order (not time order).
pub fn fixture_json() -> Vec<Value> {
    vec![
        event_json(
            SUCCESS_OLDER,
            "2017-11-06T10:11:21.605621+00:00",
            "create/role_assignment",
            "success",
            PROJECT_A,
        ),
        event_json(
            FAILURE_NEWER,
            "2017-11-06T10:17:40.120005+00:00",
            "authenticate",
            "failure",
            PROJECT_A,
        ),
        event_json(
            SUCCESS_NEWER,
            "2017-11-06T10:15:56.984390+00:00",
            "create/role_assignment",
            "success",
            PROJECT_B,
        ),
        event_json(
            FAILURE_OLDER,
            "2017-11-06T09:58:03.556123+00:00",
            "authenticate",
            "failure",
            PROJECT_B,
        ),
    ]
}

pub fn fixture_events() -> Vec<Event> {
    fixture_json()
        .into_iter()
        .map(|v| serde_json::from_value(v).unwrap())
        .collect()
}

pub fn event_ids(events: &[Event]) -> Vec<&str> {
    events.iter().map(|e| e.id.as_str()).collect()
}
