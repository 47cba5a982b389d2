//! Document store capability for the persistence seedwork.
//!
//! The unit of work consumes exactly four store operations — find by id,
//! upsert, delete, and a begin/commit/abort session — and delegates all
//! isolation and conflict detection to the backing store. This crate
//! provides:
//! - [`DocumentStore`]: the trait the seedwork is generic over
//! - [`InMemoryDocumentStore`]: buffered-session store for tests
//! - [`PostgresDocumentStore`]: JSONB-backed store over sqlx

pub mod config;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod record;
pub mod store;

pub use common::AggregateId;
pub use config::StoreConfig;
pub use error::{DocStoreError, Result};
pub use memory::{InMemoryDocumentStore, InMemorySession};
pub use postgres::PostgresDocumentStore;
pub use record::DocumentRecord;
pub use store::DocumentStore;
