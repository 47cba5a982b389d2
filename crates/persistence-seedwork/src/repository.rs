use std::sync::Arc;

use common::AggregateId;
use doc_store::{DocumentRecord, DocumentStore};
use domain_seedwork::{AggregateRoot, Event, EventBus};

use crate::converter::TypeConverter;
use crate::error::PersistenceError;

/// Transaction-scoped gateway between one aggregate type and the store.
///
/// A repository lives for exactly one unit-of-work attempt: it owns the
/// store session for that attempt, the passport the caller presented, and
/// the integration events staged by every save so far. The unit of work
/// constructs it, hands it to the business function, and takes the session
/// and staged events back when the function returns.
pub struct Repository<S, C>
where
    S: DocumentStore,
    C: TypeConverter,
{
    store: Arc<S>,
    converter: Arc<C>,
    domain_bus: Arc<EventBus>,
    passport: C::Passport,
    session: S::Session,
    staged_integration_events: Vec<Event>,
}

impl<S, C> Repository<S, C>
where
    S: DocumentStore,
    C: TypeConverter,
{
    pub(crate) fn new(
        store: Arc<S>,
        converter: Arc<C>,
        domain_bus: Arc<EventBus>,
        passport: C::Passport,
        session: S::Session,
    ) -> Self {
        Self {
            store,
            converter,
            domain_bus,
            passport,
            session,
            staged_integration_events: Vec::new(),
        }
    }

    /// The passport this transaction was opened with.
    pub fn passport(&self) -> &C::Passport {
        &self.passport
    }

    /// Fetches an aggregate by id within the open transaction.
    pub async fn get(&mut self, id: AggregateId) -> Result<C::Aggregate, PersistenceError> {
        let collection = C::Aggregate::aggregate_type();
        let record = self
            .store
            .find_by_id(collection, id, &mut self.session)
            .await?
            .ok_or(PersistenceError::NotFound {
                aggregate_type: collection,
                id,
            })?;

        let typed: C::Record = serde_json::from_value(record.body)?;
        Ok(self.converter.to_domain(typed, self.passport.clone()))
    }

    /// Persists an aggregate within the open transaction.
    ///
    /// In order: runs the aggregate's `on_save` hook, dispatches every
    /// buffered domain event through the domain bus (a handler error
    /// propagates before the buffer is cleared, aborting the transaction),
    /// stages the aggregate's integration events for post-commit dispatch,
    /// then deletes the document if the aggregate is tombstoned or upserts
    /// it otherwise. Returns the aggregate rehydrated from the persisted
    /// shape, or unchanged for a delete.
    #[tracing::instrument(skip(self, aggregate), fields(collection = C::Aggregate::aggregate_type()))]
    pub async fn save(&mut self, mut aggregate: C::Aggregate) -> Result<C::Aggregate, PersistenceError> {
        aggregate.on_save(aggregate.is_modified())?;

        for event in aggregate.domain_events() {
            self.domain_bus.dispatch(event).await?;
        }
        aggregate.clear_domain_events();

        self.staged_integration_events
            .extend(aggregate.take_integration_events());

        let collection = C::Aggregate::aggregate_type();
        if aggregate.is_deleted() {
            tracing::debug!(id = %aggregate.id(), "deleting tombstoned aggregate");
            self.store
                .delete(collection, aggregate.id(), &mut self.session)
                .await?;
            return Ok(aggregate);
        }

        let record = self.converter.to_persistence(&aggregate);
        let body = serde_json::to_value(&record)?;
        let saved = self
            .store
            .upsert(collection, DocumentRecord::new(aggregate.id(), body), &mut self.session)
            .await?;

        let typed: C::Record = serde_json::from_value(saved.body)?;
        Ok(self.converter.to_domain(typed, self.passport.clone()))
    }

    /// Drains the integration events staged by every save so far, in save
    /// order. A second drain returns nothing.
    pub fn take_integration_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.staged_integration_events)
    }

    pub(crate) fn into_parts(self) -> (S::Session, Vec<Event>) {
        (self.session, self.staged_integration_events)
    }
}
