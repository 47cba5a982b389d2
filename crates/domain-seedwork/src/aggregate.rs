//! Aggregate-root base contract.

use serde::Serialize;

use common::{AggregateId, EventKind};

use crate::error::DomainError;
use crate::event::Event;

/// Marker for authorization capabilities.
///
/// A passport is an opaque value threaded through every persistence
/// operation; only aggregate business methods inspect it, to authorize
/// individual field mutations. The seedwork never interprets it.
pub trait Passport: Clone + Send + Sync + 'static {}

/// Per-aggregate state the seedwork manages: event buffers, the deleted
/// tombstone, and the modified flag.
///
/// Every aggregate root embeds one of these and exposes it through
/// [`AggregateRoot::base`] / [`AggregateRoot::base_mut`]. A freshly
/// constructed or rehydrated aggregate starts with empty buffers and both
/// flags clear.
#[derive(Debug, Clone, Default)]
pub struct AggregateBase {
    domain_events: Vec<Event>,
    integration_events: Vec<Event>,
    is_deleted: bool,
    modified: bool,
}

impl AggregateBase {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once the aggregate has been tombstoned; save then deletes
    /// instead of upserting.
    pub fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    /// Tombstones the aggregate. Callers gate this behind their own
    /// passport checks.
    pub fn set_deleted(&mut self) {
        self.is_deleted = true;
        self.modified = true;
    }

    /// True if any field write or raised event has touched the aggregate
    /// since construction or rehydration.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Records that a field write happened; setters call this.
    pub fn mark_modified(&mut self) {
        self.modified = true;
    }

    /// Buffered domain events, in raise order.
    pub fn domain_events(&self) -> &[Event] {
        &self.domain_events
    }

    /// Buffered integration events, in raise order.
    pub fn integration_events(&self) -> &[Event] {
        &self.integration_events
    }

    /// Empties the domain-event buffer. Reserved to the repository, which
    /// clears only after every buffered event dispatched successfully.
    pub fn clear_domain_events(&mut self) {
        self.domain_events.clear();
    }

    /// Drains the integration-event buffer. Reserved to the repository; a
    /// second drain returns nothing.
    pub fn take_integration_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.integration_events)
    }

    pub(crate) fn push_domain_event(&mut self, event: Event) {
        self.domain_events.push(event);
        self.modified = true;
    }

    pub(crate) fn push_integration_event(&mut self, event: Event) {
        self.integration_events.push(event);
        self.modified = true;
    }
}

/// Base contract for mutable domain objects.
///
/// An aggregate root is the transactional consistency boundary for a
/// cluster of domain objects and the only entry point for mutation. The
/// seedwork relies on this contract to buffer events during business
/// operations and to drain them at the right points of the save path;
/// business logic only ever calls the `raise_*` methods.
pub trait AggregateRoot: Send + Sync {
    /// Stable name for the aggregate type, doubling as the store
    /// collection name.
    fn aggregate_type() -> &'static str
    where
        Self: Sized;

    /// The aggregate's identity, assigned at construction.
    fn id(&self) -> AggregateId;

    fn base(&self) -> &AggregateBase;

    fn base_mut(&mut self) -> &mut AggregateBase;

    /// Hook invoked by the repository immediately before persisting.
    ///
    /// `was_modified` reports whether any field write or raised event
    /// touched the aggregate during this unit of work. A returned error
    /// aborts the save and the enclosing transaction.
    fn on_save(&self, was_modified: bool) -> Result<(), DomainError> {
        let _ = was_modified;
        Ok(())
    }

    /// Buffers a same-process event, dispatched by the repository during
    /// save, before the transaction commits. No I/O happens here.
    fn raise_domain_event<P: Serialize>(
        &mut self,
        kind: EventKind,
        payload: &P,
    ) -> Result<(), DomainError>
    where
        Self: Sized,
    {
        let event = Event::new(self.id(), kind, serde_json::to_value(payload)?);
        self.base_mut().push_domain_event(event);
        Ok(())
    }

    /// Buffers a cross-process event, drained by the unit of work and
    /// dispatched only after the transaction durably commits.
    fn raise_integration_event<P: Serialize>(
        &mut self,
        kind: EventKind,
        payload: &P,
    ) -> Result<(), DomainError>
    where
        Self: Sized,
    {
        let event = Event::new(self.id(), kind, serde_json::to_value(payload)?);
        self.base_mut().push_integration_event(event);
        Ok(())
    }

    fn domain_events(&self) -> &[Event] {
        self.base().domain_events()
    }

    fn clear_domain_events(&mut self) {
        self.base_mut().clear_domain_events();
    }

    fn take_integration_events(&mut self) -> Vec<Event> {
        self.base_mut().take_integration_events()
    }

    fn is_deleted(&self) -> bool {
        self.base().is_deleted()
    }

    fn is_modified(&self) -> bool {
        self.base().is_modified()
    }
}
