use thiserror::Error;

use common::AggregateId;
use doc_store::DocStoreError;
use domain_seedwork::{DispatchError, DomainError};

/// Errors surfaced by the repository and unit of work.
///
/// Nothing is silently swallowed: every variant either aborted the
/// enclosing transaction or, for an integration [`Dispatch`] failure,
/// escaped `with_transaction` after the write was already durable.
///
/// [`Dispatch`]: PersistenceError::Dispatch
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// No document matched the requested id.
    #[error("{aggregate_type} not found: {id}")]
    NotFound {
        aggregate_type: &'static str,
        id: AggregateId,
    },

    /// An aggregate business method or `on_save` hook rejected the
    /// operation (validation failure or permission denial).
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// An event handler failed. Inside a transaction this aborts it; after
    /// commit the write is durable and the notification may be lost.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// The document store failed; propagated unchanged, no retry.
    #[error("Store error: {0}")]
    Store(#[from] DocStoreError),

    /// A persistence record could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
