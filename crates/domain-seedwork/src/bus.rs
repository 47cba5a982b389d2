//! Event bus: handler registration and sequential dispatch.

use std::collections::HashMap;
use std::sync::Arc;

use futures_core::future::BoxFuture;

use common::EventKind;

use crate::error::DispatchError;
use crate::event::Event;

/// Error type handlers report failures with.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

type Handler = Arc<dyn Fn(Event) -> BoxFuture<'static, Result<(), HandlerError>> + Send + Sync>;

/// Dispatches events to handlers registered by [`EventKind`].
///
/// Two instances exist per application: a domain bus, whose handlers run
/// inside the open transaction during save, and an integration bus, whose
/// handlers run only after commit. The bus itself is identical in both
/// roles; only who dispatches into it, and when, differs.
///
/// Handlers for one dispatch run sequentially in registration order; the
/// first handler error aborts the remaining loop and propagates to the
/// caller. Buses are registered at startup and then shared immutably.
pub struct EventBus {
    name: &'static str,
    handlers: HashMap<EventKind, Vec<Handler>>,
}

impl EventBus {
    /// Creates an empty bus. The name shows up in spans and metrics.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            handlers: HashMap::new(),
        }
    }

    /// Returns the bus name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Registers a handler for an event kind.
    ///
    /// Multiple handlers may register for the same kind; they run in
    /// registration order at dispatch time.
    pub fn register<F, Fut>(&mut self, kind: EventKind, handler: F)
    where
        F: Fn(Event) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        self.handlers
            .entry(kind)
            .or_default()
            .push(Arc::new(move |event| Box::pin(handler(event))));
    }

    /// Returns how many handlers are registered for a kind.
    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.handlers.get(&kind).map_or(0, Vec::len)
    }

    /// Dispatches one event to every handler registered for its kind.
    ///
    /// Awaits each handler before invoking the next; a handler error stops
    /// the loop and propagates. Dispatching a kind with no handlers is a
    /// no-op.
    #[tracing::instrument(skip(self, event), fields(bus = self.name, kind = %event.kind))]
    pub async fn dispatch(&self, event: &Event) -> Result<(), DispatchError> {
        let Some(handlers) = self.handlers.get(&event.kind) else {
            tracing::trace!("no handlers registered");
            return Ok(());
        };

        for handler in handlers {
            handler(event.clone()).await.map_err(|source| {
                tracing::warn!(error = %source, "handler failed");
                DispatchError {
                    kind: event.kind,
                    source,
                }
            })?;
        }

        metrics::counter!("events_dispatched", "bus" => self.name).increment(1);
        Ok(())
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("name", &self.name)
            .field("kinds", &self.handlers.len())
            .finish()
    }
}
