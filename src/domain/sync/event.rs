//! Inbound channel event.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::domain::foundation::{EventId, Timestamp};

/// One named event pushed by the server over a view's channel.
///
/// The name vocabulary (`queue-update`, `status-change`, ...) belongs to
/// the dashboard that registered it and is never validated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelEvent {
    pub event_id: EventId,
    pub name: String,
    #[serde(default)]
    pub payload: JsonValue,
    pub received_at: Timestamp,
}

impl ChannelEvent {
    pub fn new(name: impl Into<String>, payload: JsonValue) -> Self {
        Self {
            event_id: EventId::new(),
            name: name.into(),
            payload,
            received_at: Timestamp::now(),
        }
    }

    /// Event with a null payload.
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, JsonValue::Null)
    }
}
