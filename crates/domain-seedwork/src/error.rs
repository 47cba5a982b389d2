use thiserror::Error;

use common::EventKind;

/// Errors raised by aggregate business methods and the `on_save` hook.
///
/// Both variants abort the save they occur in, and therefore the enclosing
/// transaction.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The passport does not authorize the attempted mutation.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// A field value or final invariant check failed.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// An event payload could not be serialized when raised.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Error produced when an event handler fails during dispatch.
///
/// Carries the kind being dispatched so the failing subscription can be
/// identified from logs alone.
#[derive(Debug, Error)]
#[error("Dispatch of {kind} failed: {source}")]
pub struct DispatchError {
    pub kind: EventKind,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}
