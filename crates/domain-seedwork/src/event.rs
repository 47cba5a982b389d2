use chrono::{DateTime, Utc};

use common::{AggregateId, EventKind};

/// A notification raised by an aggregate.
///
/// Domain and integration events share this shape; they differ only in
/// which bus they travel on and when they are dispatched relative to the
/// owning transaction.
#[derive(Debug, Clone)]
pub struct Event {
    /// The aggregate that raised the event.
    pub aggregate_id: AggregateId,

    /// Dispatch key; handlers register against this tag.
    pub kind: EventKind,

    /// Structured payload, opaque to the engine.
    pub payload: serde_json::Value,

    /// When the event was raised (not when it was dispatched).
    pub occurred_at: DateTime<Utc>,
}

impl Event {
    /// Creates an event raised now.
    pub fn new(aggregate_id: AggregateId, kind: EventKind, payload: serde_json::Value) -> Self {
        Self {
            aggregate_id,
            kind,
            payload,
            occurred_at: Utc::now(),
        }
    }

    /// Deserializes the payload into a typed value.
    pub fn payload_as<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.payload.clone())
    }
}
