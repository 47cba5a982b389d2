use std::sync::Arc;

use futures_core::future::BoxFuture;

use doc_store::DocumentStore;
use domain_seedwork::{AggregateRoot, EventBus};

use crate::converter::TypeConverter;
use crate::error::PersistenceError;
use crate::repository::Repository;

/// Owns the transaction boundary for one aggregate type.
///
/// Stateless across invocations: every [`with_transaction`] call opens its
/// own store session, builds its own transaction-scoped [`Repository`],
/// and is independent of any other call. The store handle, converter, and
/// both buses are shared, read-only-after-construction singletons.
///
/// [`with_transaction`]: UnitOfWork::with_transaction
pub struct UnitOfWork<S, C>
where
    S: DocumentStore,
    C: TypeConverter,
{
    store: Arc<S>,
    converter: Arc<C>,
    domain_bus: Arc<EventBus>,
    integration_bus: Arc<EventBus>,
}

impl<S, C> UnitOfWork<S, C>
where
    S: DocumentStore,
    C: TypeConverter,
{
    /// Assembles a unit of work from its shared collaborators.
    pub fn new(
        store: Arc<S>,
        converter: Arc<C>,
        domain_bus: Arc<EventBus>,
        integration_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            store,
            converter,
            domain_bus,
            integration_bus,
        }
    }

    /// Runs `work` against a transaction-scoped repository.
    ///
    /// On success the session commits and every integration event staged
    /// by the work's saves is dispatched through the integration bus, in
    /// save order, each awaited before the next. On error the session
    /// aborts and nothing is dispatched.
    ///
    /// Integration events therefore dispatch if and only if the
    /// transaction committed, and only after the commit is durable. A
    /// handler failure at that point propagates out of this call even
    /// though the write already happened; callers own any reconciliation
    /// (there is no outbox or retry here).
    #[tracing::instrument(skip_all, fields(collection = C::Aggregate::aggregate_type()))]
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
        let session = self.store.begin().await?;
        let mut repository = Repository::new(
            self.store.clone(),
            self.converter.clone(),
            self.domain_bus.clone(),
            passport,
            session,
        );

        match work(&mut repository).await {
            Ok(value) => {
                let (session, integration_events) = repository.into_parts();

                self.store.commit(session).await?;
                metrics::counter!("unit_of_work_committed").increment(1);
                tracing::debug!(
                    integration_events = integration_events.len(),
                    "transaction committed"
                );

                for event in &integration_events {
                    self.integration_bus.dispatch(event).await?;
                }
                Ok(value)
            }
            Err(error) => {
                let (session, _) = repository.into_parts();
                if let Err(abort_error) = self.store.abort(session).await {
                    tracing::warn!(error = %abort_error, "abort failed after business error");
                }
                metrics::counter!("unit_of_work_aborted").increment(1);
                Err(error)
            }
        }
    }
}

impl<S, C> Clone for UnitOfWork<S, C>
where
    S: DocumentStore,
    C: TypeConverter,
{
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            converter: self.converter.clone(),
            domain_bus: self.domain_bus.clone(),
            integration_bus: self.integration_bus.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::error::PersistenceError;
    use crate::test_support::{
        LISTING_PUBLISHED, LISTING_RENAMED, Listing, TestPassport, test_engine,
    };
    use domain_seedwork::DomainError;

    fn passport() -> TestPassport {
        TestPassport { can_edit: true }
    }

    /// Two domain events and one integration event: both domain handlers
    /// fire before save resolves, the integration handler exactly once
    /// after the transaction resolves.
    #[tokio::test]
    async fn domain_events_fire_before_commit_integration_after() {
        let engine = test_engine();
        let domain_log = engine.domain_log.clone();

        engine
            .unit_of_work
            .with_transaction(passport(), move |repo| {
                Box::pin(async move {
                    let mut listing = Listing::new(passport(), "a");
                    listing.rename("b")?;
                    listing.rename("c")?;
                    listing.publish()?;
                    repo.save(listing).await?;

                    // Domain handlers already ran, inside the transaction.
                    assert_eq!(domain_log.lock().unwrap().len(), 2);
                    Ok(())
                })
            })
            .await
            .unwrap();

        assert_eq!(engine.domain_log.lock().unwrap().len(), 2);
        let integration = engine.integration_log.lock().unwrap();
        assert_eq!(*integration, vec![(LISTING_PUBLISHED, "a".to_string())]);
    }

    /// Business failure before save: no handler on either bus runs and no
    /// document is written.
    #[tokio::test]
    async fn rollback_discards_all_buffered_events() {
        let engine = test_engine();
        let result: Result<(), _> = engine
            .unit_of_work
            .with_transaction(passport(), |_repo| {
                Box::pin(async move {
                    let mut listing = Listing::new(passport(), "a");
                    listing.rename("b")?;
                    listing.publish()?;
                    Err(PersistenceError::Domain(DomainError::Validation(
                        "boom".into(),
                    )))
                })
            })
            .await;

        assert!(result.is_err());
        assert!(engine.domain_log.lock().unwrap().is_empty());
        assert!(engine.integration_log.lock().unwrap().is_empty());
        assert_eq!(engine.store.document_count().await, 0);
    }

    /// Failure after a save aborts the transaction: the domain handlers
    /// already ran (inside the transaction), but nothing was committed and
    /// no integration event is dispatched.
    #[tokio::test]
    async fn failure_after_save_aborts_commit_and_integration_dispatch() {
        let engine = test_engine();
        let result: Result<(), _> = engine
            .unit_of_work
            .with_transaction(passport(), |repo| {
                Box::pin(async move {
                    let mut listing = Listing::new(passport(), "a");
                    listing.rename("b")?;
                    listing.publish()?;
                    repo.save(listing).await?;
                    Err(PersistenceError::Domain(DomainError::Validation(
                        "boom".into(),
                    )))
                })
            })
            .await;

        assert!(result.is_err());
        assert_eq!(engine.domain_log.lock().unwrap().len(), 1);
        assert!(engine.integration_log.lock().unwrap().is_empty());
        assert_eq!(engine.store.document_count().await, 0);
    }

    /// First integration dispatch fails: with_transaction rejects, the
    /// write stays durable, and the second event is never attempted.
    #[tokio::test]
    async fn integration_dispatch_failure_is_sequential_and_post_commit() {
        use std::sync::{Arc, Mutex};

        use doc_store::InMemoryDocumentStore;
        use domain_seedwork::EventBus;

        use crate::test_support::ListingConverter;
        use crate::unit_of_work::UnitOfWork;

        let store = Arc::new(InMemoryDocumentStore::new());
        let attempts = Arc::new(Mutex::new(Vec::<String>::new()));

        let mut integration_bus = EventBus::new("integration");
        {
            let attempts = attempts.clone();
            integration_bus.register(LISTING_PUBLISHED, move |event| {
                let attempts = attempts.clone();
                async move {
                    let name = event.payload["name"].as_str().unwrap_or_default().to_string();
                    attempts.lock().unwrap().push(name);
                    Err::<(), domain_seedwork::HandlerError>("downstream unavailable".into())
                }
            });
        }

        let unit_of_work = UnitOfWork::new(
            store.clone(),
            Arc::new(ListingConverter),
            Arc::new(EventBus::new("domain")),
            Arc::new(integration_bus),
        );

        let result: Result<(), _> = unit_of_work
            .with_transaction(passport(), |repo| {
                Box::pin(async move {
                    let mut first = Listing::new(passport(), "first");
                    first.publish()?;
                    repo.save(first).await?;

                    let mut second = Listing::new(passport(), "second");
                    second.publish()?;
                    repo.save(second).await?;
                    Ok(())
                })
            })
            .await;

        assert!(matches!(result, Err(PersistenceError::Dispatch(_))));
        // The failing handler was invoked for the first event only.
        assert_eq!(*attempts.lock().unwrap(), vec!["first".to_string()]);
        // The transaction itself durably committed before dispatch.
        assert_eq!(store.document_count().await, 2);
    }

    /// Concurrent units of work stay independent: each sees only its own
    /// staged writes until commit.
    #[tokio::test]
    async fn concurrent_transactions_are_isolated() {
        let engine = test_engine();
        let uow_a = engine.unit_of_work.clone();
        let uow_b = engine.unit_of_work.clone();

        let a = tokio::spawn(async move {
            uow_a
                .with_transaction(passport(), |repo| {
                    Box::pin(async move {
                        repo.save(Listing::new(passport(), "a")).await?;
                        Ok(())
                    })
                })
                .await
        });
        let b = tokio::spawn(async move {
            uow_b
                .with_transaction(passport(), |repo| {
                    Box::pin(async move {
                        repo.save(Listing::new(passport(), "b")).await?;
                        Ok(())
                    })
                })
                .await
        });

        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();
        assert_eq!(engine.store.document_count().await, 2);
    }

    #[tokio::test]
    async fn with_transaction_returns_the_work_value() {
        let engine = test_engine();
        let name = engine
            .unit_of_work
            .with_transaction(passport(), |repo| {
                Box::pin(async move {
                    let mut listing = Listing::new(passport(), "a");
                    listing.rename("kept")?;
                    let saved = repo.save(listing).await?;
                    Ok(saved.name)
                })
            })
            .await
            .unwrap();

        assert_eq!(name, "kept");
        assert_eq!(
            engine.domain_log.lock().unwrap().as_slice(),
            &[(LISTING_RENAMED, "kept".to_string())]
        );
    }
}
