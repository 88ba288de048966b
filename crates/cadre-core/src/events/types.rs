//! Event payload types for resolution lifecycle events.

/// Resolution phase reported in events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseLabel {
    Structural,
    Finalize,
}

impl PhaseLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Structural => "structural",
            Self::Finalize => "finalize",
        }
    }
}

/// Payload for `on_resolution_started`.
#[derive(Debug, Clone)]
pub struct ResolutionStartedEvent {
    pub definitions: usize,
    pub capabilities: usize,
}

/// Payload for `on_capability_resolved`.
#[derive(Debug, Clone)]
pub struct CapabilityResolvedEvent {
    pub definition: String,
    pub capability: String,
    pub phase: PhaseLabel,
}

/// Payload for `on_capability_injected`.
#[derive(Debug, Clone)]
pub struct CapabilityInjectedEvent {
    pub source_definition: String,
    pub source_capability: String,
    pub target_definition: String,
    pub injected: String,
}

/// Payload for `on_binding_deferred`.
#[derive(Debug, Clone)]
pub struct BindingDeferredEvent {
    pub definition: String,
    pub capability: String,
    pub target: String,
    pub shape: String,
}

/// Payload for `on_registry_frozen`.
#[derive(Debug, Clone)]
pub struct RegistryFrozenEvent {
    pub definitions: usize,
    pub capabilities: usize,
    pub work_items: usize,
    pub duration_ms: u64,
}

/// Payload for `on_resolution_failed`.
#[derive(Debug, Clone)]
pub struct ResolutionFailedEvent {
    pub error_code: String,
    pub message: String,
}
