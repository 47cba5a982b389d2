use async_trait::async_trait;

use common::AggregateId;

use crate::{DocumentRecord, Result};

/// Core trait for document store implementations.
///
/// A session spans exactly one transaction attempt: it is produced by
/// [`begin`](DocumentStore::begin) and consumed by either
/// [`commit`](DocumentStore::commit) or [`abort`](DocumentStore::abort).
/// Writes made through a session must not be visible to other sessions
/// until commit; isolation beyond that is owned by the implementation.
///
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Session type bound to one transaction attempt.
    type Session: Send;

    /// Opens a new transactional session.
    async fn begin(&self) -> Result<Self::Session>;

    /// Durably commits every write made through the session.
    async fn commit(&self, session: Self::Session) -> Result<()>;

    /// Discards every write made through the session.
    async fn abort(&self, session: Self::Session) -> Result<()>;

    /// Fetches a document by id within the session.
    ///
    /// Returns `None` if no document matches. A session sees its own
    /// uncommitted writes.
    async fn find_by_id(
        &self,
        collection: &str,
        id: AggregateId,
        session: &mut Self::Session,
    ) -> Result<Option<DocumentRecord>>;

    /// Inserts or updates a document within the session.
    ///
    /// Returns the persisted shape: `created_at` is preserved for an
    /// existing document and `updated_at` reflects this write.
    async fn upsert(
        &self,
        collection: &str,
        record: DocumentRecord,
        session: &mut Self::Session,
    ) -> Result<DocumentRecord>;

    /// Deletes a document by id within the session.
    ///
    /// Deleting an absent document is a no-op.
    async fn delete(
        &self,
        collection: &str,
        id: AggregateId,
        session: &mut Self::Session,
    ) -> Result<()>;
}
