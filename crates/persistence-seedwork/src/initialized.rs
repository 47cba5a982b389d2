use futures_core::future::BoxFuture;

use common::AggregateId;
use doc_store::DocumentStore;
use domain_seedwork::DomainError;

use crate::converter::TypeConverter;
use crate::error::PersistenceError;
use crate::repository::Repository;
use crate::unit_of_work::UnitOfWork;

/// A unit of work with the passport fixed up front.
///
/// API layers resolve the caller's passport once per request and hand the
/// rest of the application this wrapper, so business code never threads
/// the passport manually. Three call shapes are exposed: the raw
/// transaction, the scoped transaction, and the fetch-mutate-save shape
/// keyed by aggregate id.
pub struct InitializedUnitOfWork<S, C>
where
    S: DocumentStore,
    C: TypeConverter,
{
    unit_of_work: UnitOfWork<S, C>,
    passport: C::Passport,
}

impl<S, C> InitializedUnitOfWork<S, C>
where
    S: DocumentStore,
    C: TypeConverter,
{
    pub fn new(unit_of_work: UnitOfWork<S, C>, passport: C::Passport) -> Self {
        Self {
            unit_of_work,
            passport,
        }
    }

    /// Direct passthrough with an explicit passport, overriding the bound
    /// one for this call only.
    pub async fn with_transaction<T, F>(
        &self,
        passport: C::Passport,
        work: F,
    ) -> Result<T, PersistenceError>
    where
        T: Send,
        F: for<'c> FnOnce(
                &'c mut Repository<S, C>,
            ) -> BoxFuture<'c, Result<T, PersistenceError>>
            + Send,
    {
        self.unit_of_work.with_transaction(passport, work).await
    }

    /// Runs `work` in a transaction under the bound passport.
    pub async fn with_scoped_transaction<T, F>(&self, work: F) -> Result<T, PersistenceError>
    where
        T: Send,
        F: for<'c> FnOnce(
                &'c mut Repository<S, C>,
            ) -> BoxFuture<'c, Result<T, PersistenceError>>
            + Send,
    {
        self.unit_of_work
            .with_transaction(self.passport.clone(), work)
            .await
    }

    /// Fetches the aggregate by id inside a transaction, hands it to
    /// `mutate`, saves the result, and returns the saved aggregate.
    ///
    /// The fetched aggregate is passed to `mutate` directly, so the
    /// mutation and the save are correlated by reference, not by a
    /// re-fetch. A missing id fails with `NotFound` before `mutate` runs.
    pub async fn with_scoped_transaction_by_id<F>(
        &self,
        id: AggregateId,
        mutate: F,
    ) -> Result<C::Aggregate, PersistenceError>
    where
        F: FnOnce(&mut C::Aggregate) -> Result<(), DomainError> + Send + 'static,
    {
        self.unit_of_work
            .with_transaction(self.passport.clone(), move |repository| {
                Box::pin(async move {
                    let mut aggregate = repository.get(id).await?;
                    mutate(&mut aggregate)?;
                    repository.save(aggregate).await
                })
            })
            .await
    }
}
