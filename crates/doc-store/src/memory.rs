use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use common::AggregateId;

use crate::{DocumentRecord, Result, store::DocumentStore};

type Collections = HashMap<String, HashMap<AggregateId, DocumentRecord>>;

/// A write staged in a session, applied to the base map on commit.
#[derive(Debug, Clone)]
enum StagedWrite {
    Upsert {
        collection: String,
        record: DocumentRecord,
    },
    Delete {
        collection: String,
        id: AggregateId,
    },
}

/// Session over the in-memory store.
///
/// Buffers writes until commit; reads see the session's own staged writes
/// first, then the committed base.
#[derive(Debug, Default)]
pub struct InMemorySession {
    staged: Vec<StagedWrite>,
}

/// In-memory document store implementation for testing.
///
/// Provides the same interface as the PostgreSQL implementation, with
/// buffered sessions standing in for database transactions: nothing staged
/// in a session is visible to other sessions (or to
/// [`find_committed`](InMemoryDocumentStore::find_committed)) until commit,
/// and an aborted session leaves the base untouched.
#[derive(Clone, Default)]
pub struct InMemoryDocumentStore {
    collections: Arc<RwLock<Collections>>,
}

impl InMemoryDocumentStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of committed documents across collections.
    pub async fn document_count(&self) -> usize {
        self.collections
            .read()
            .await
            .values()
            .map(HashMap::len)
            .sum()
    }

    /// Reads a committed document directly, bypassing any session.
    pub async fn find_committed(
        &self,
        collection: &str,
        id: AggregateId,
    ) -> Option<DocumentRecord> {
        self.collections
            .read()
            .await
            .get(collection)
            .and_then(|docs| docs.get(&id))
            .cloned()
    }

    /// Seeds a committed document, bypassing any session.
    pub async fn seed(&self, collection: &str, record: DocumentRecord) {
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(record.id, record);
    }

    /// Clears all committed documents.
    pub async fn clear(&self) {
        self.collections.write().await.clear();
    }

    /// Resolves a read against the session's staged writes.
    ///
    /// Returns `Some(Some(_))` for a staged upsert, `Some(None)` for a
    /// staged delete, and `None` when the session has not touched the id.
    fn staged_view(
        session: &InMemorySession,
        collection: &str,
        id: AggregateId,
    ) -> Option<Option<DocumentRecord>> {
        session.staged.iter().rev().find_map(|write| match write {
            StagedWrite::Upsert {
                collection: c,
                record,
            } if c == collection && record.id == id => Some(Some(record.clone())),
            StagedWrite::Delete { collection: c, id: d } if c == collection && *d == id => {
                Some(None)
            }
            _ => None,
        })
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    type Session = InMemorySession;

    async fn begin(&self) -> Result<Self::Session> {
        Ok(InMemorySession::default())
    }

    async fn commit(&self, session: Self::Session) -> Result<()> {
        let mut collections = self.collections.write().await;
        for write in session.staged {
            match write {
                StagedWrite::Upsert { collection, record } => {
                    collections
                        .entry(collection)
                        .or_default()
                        .insert(record.id, record);
                }
                StagedWrite::Delete { collection, id } => {
                    if let Some(docs) = collections.get_mut(&collection) {
                        docs.remove(&id);
                    }
                }
            }
        }
        Ok(())
    }

    async fn abort(&self, session: Self::Session) -> Result<()> {
        drop(session);
        Ok(())
    }

    async fn find_by_id(
        &self,
        collection: &str,
        id: AggregateId,
        session: &mut Self::Session,
    ) -> Result<Option<DocumentRecord>> {
        if let Some(staged) = Self::staged_view(session, collection, id) {
            return Ok(staged);
        }
        Ok(self.find_committed(collection, id).await)
    }

    async fn upsert(
        &self,
        collection: &str,
        mut record: DocumentRecord,
        session: &mut Self::Session,
    ) -> Result<DocumentRecord> {
        // Preserve created_at when the document already exists, whether in
        // this session's staged writes or in the committed base.
        let existing = match Self::staged_view(session, collection, record.id) {
            Some(staged) => staged,
            None => self.find_committed(collection, record.id).await,
        };
        if let Some(existing) = existing {
            record.created_at = existing.created_at;
        }
        record.updated_at = Utc::now();

        session.staged.push(StagedWrite::Upsert {
            collection: collection.to_string(),
            record: record.clone(),
        });
        Ok(record)
    }

    async fn delete(
        &self,
        collection: &str,
        id: AggregateId,
        session: &mut Self::Session,
    ) -> Result<()> {
        session.staged.push(StagedWrite::Delete {
            collection: collection.to_string(),
            id,
        });
        Ok(())
    }
}
