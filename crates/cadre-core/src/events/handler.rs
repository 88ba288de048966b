//! ResolutionEventHandler trait, all methods with no-op defaults.

use super::types::*;

/// Trait for observing a resolution run.
///
/// All methods have no-op default implementations, so handlers only need
/// to override the events they care about.
pub trait ResolutionEventHandler: Send + Sync {
    fn on_resolution_started(&self, _event: &ResolutionStartedEvent) {}
    fn on_capability_resolved(&self, _event: &CapabilityResolvedEvent) {}
    fn on_capability_injected(&self, _event: &CapabilityInjectedEvent) {}
    fn on_binding_deferred(&self, _event: &BindingDeferredEvent) {}
    fn on_registry_frozen(&self, _event: &RegistryFrozenEvent) {}
    fn on_resolution_failed(&self, _event: &ResolutionFailedEvent) {}
}
