//! Shared vocabulary types used across the persistence seedwork.
//!
//! These types sit below both the document store and the domain layers:
//! [`AggregateId`] identifies an aggregate (and its backing document), and
//! [`EventKind`] is the stable tag events are registered and dispatched by.

mod types;

pub use types::{AggregateId, EventKind};
