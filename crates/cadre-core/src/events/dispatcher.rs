//! Synchronous event dispatch, free when no handler is registered.

use std::sync::Arc;

use super::handler::ResolutionEventHandler;
use super::types::*;

/// Synchronous event dispatcher wrapping a list of handlers.
///
/// When no handlers are registered, `emit` iterates over an empty Vec.
#[derive(Clone, Default)]
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn ResolutionEventHandler>>,
}

impl EventDispatcher {
    /// Create a new empty dispatcher.
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Register an event handler.
    pub fn register(&mut self, handler: Arc<dyn ResolutionEventHandler>) {
        self.handlers.push(handler);
    }

    /// Returns the number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Emit an event to all registered handlers.
    /// A handler that panics is logged and does not prevent subsequent
    /// handlers from receiving the event.
    fn emit<F: Fn(&dyn ResolutionEventHandler)>(&self, f: F) {
        for handler in &self.handlers {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                f(handler.as_ref());
            }));
            if result.is_err() {
                tracing::warn!("resolution event handler panicked; continuing");
            }
        }
    }

    pub fn emit_resolution_started(&self, event: &ResolutionStartedEvent) {
        self.emit(|h| h.on_resolution_started(event));
    }

    pub fn emit_capability_resolved(&self, event: &CapabilityResolvedEvent) {
        self.emit(|h| h.on_capability_resolved(event));
    }

    pub fn emit_capability_injected(&self, event: &CapabilityInjectedEvent) {
        self.emit(|h| h.on_capability_injected(event));
    }

    pub fn emit_binding_deferred(&self, event: &BindingDeferredEvent) {
        self.emit(|h| h.on_binding_deferred(event));
    }

    pub fn emit_registry_frozen(&self, event: &RegistryFrozenEvent) {
        self.emit(|h| h.on_registry_frozen(event));
    }

    pub fn emit_resolution_failed(&self, event: &ResolutionFailedEvent) {
        self.emit(|h| h.on_resolution_failed(event));
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
