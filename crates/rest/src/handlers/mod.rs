//! HTTP request handlers.
//!
//! | Route | Handler |
//! |-------|---------|
//! | `GET /v1/events` | [`list_events_handler`] |
//! | `GET /v1/events/{event_id}` | [`get_event_handler`] |
//! | `GET /v1/attributes/{query_name}` | [`attributes_handler`] |
//! | `GET /health` | [`health_handler`] |

pub mod attributes;
pub mod events;
pub mod health;

pub use attributes::attributes_handler;
pub use events::{get_event_handler, list_events_handler};
pub use health::health_handler;
