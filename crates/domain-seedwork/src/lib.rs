//! Domain seedwork: the base contract every aggregate root is built on.
//!
//! This crate provides:
//! - [`AggregateRoot`] and [`AggregateBase`]: event buffering, the deleted
//!   tombstone, the modified flag, and the `on_save` hook
//! - [`Event`]: the shape shared by domain and integration events
//! - [`EventBus`]: handler registration and sequential dispatch, keyed by
//!   [`EventKind`]; constructed explicitly and threaded through the
//!   application rather than living as a process-wide singleton
//! - [`DomainError`]: the validation / permission error taxonomy raised by
//!   aggregate business methods

pub mod aggregate;
pub mod bus;
pub mod error;
pub mod event;

pub use aggregate::{AggregateBase, AggregateRoot, Passport};
pub use bus::{EventBus, HandlerError};
pub use common::{AggregateId, EventKind};
pub use error::{DispatchError, DomainError};
pub use event::Event;
