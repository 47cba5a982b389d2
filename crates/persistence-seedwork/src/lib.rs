//! Persistence seedwork: the transaction and event-ordering engine every
//! bounded context is built on.
//!
//! The moving parts, outermost first:
//! - [`UnitOfWork`] owns one transaction's lifecycle: it opens a store
//!   session, hands a transaction-scoped [`Repository`] to the caller's
//!   business function, commits or aborts, and — only after a durable
//!   commit — drains the staged integration events through the
//!   integration bus.
//! - [`Repository`] translates between aggregates and documents via a
//!   [`TypeConverter`], dispatches buffered domain events through the
//!   domain bus on every save (inside the open transaction), and stages
//!   integration events for the unit of work.
//! - [`InitializedUnitOfWork`] fixes the passport and adds the
//!   fetch-mutate-save call shape keyed by aggregate id.
//!
//! The ordering invariants, which the tests in this crate pin down:
//! domain events dispatch before `save` returns and before commit;
//! integration events dispatch if and only if the transaction committed,
//! in aggregate-save order; a rollback discards everything undispatched.

pub mod converter;
pub mod error;
pub mod initialized;
pub mod repository;
pub mod unit_of_work;

#[cfg(test)]
pub(crate) mod test_support;

pub use converter::TypeConverter;
pub use error::PersistenceError;
pub use initialized::InitializedUnitOfWork;
pub use repository::Repository;
pub use unit_of_work::UnitOfWork;
