use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use common::AggregateId;

/// A stored document: a JSON body keyed by aggregate id within a collection.
///
/// The body is the persistence-layer record produced by a type converter;
/// the store treats it as opaque JSON. Timestamps are maintained by the
/// store on upsert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Document key, shared with the aggregate it persists.
    pub id: AggregateId,

    /// Opaque JSON body.
    pub body: serde_json::Value,

    /// When the document was first written.
    pub created_at: DateTime<Utc>,

    /// When the document was last written.
    pub updated_at: DateTime<Utc>,
}

impl DocumentRecord {
    /// Creates a record for a body about to be written.
    ///
    /// Both timestamps are set to now; the store preserves `created_at`
    /// when the document already exists.
    pub fn new(id: AggregateId, body: serde_json::Value) -> Self {
        let now = Utc::now();
        Self {
            id,
            body,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_has_matching_timestamps() {
        let record = DocumentRecord::new(AggregateId::new(), serde_json::json!({"name": "x"}));
        assert_eq!(record.created_at, record.updated_at);
    }
}
