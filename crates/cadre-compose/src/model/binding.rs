//! Typed cross-definition requirements.

use cadre_core::types::{CapabilityId, DefinitionId};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{CapabilityKind, Definition};
use crate::registry::Registry;

/// The capability shape a binding requires on its target definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityShape {
    pub kind: CapabilityKind,
    /// Restrict the match to one instance name.
    pub instance: Option<String>,
    /// A further capability the target must also carry.
    pub requires: Option<CapabilityKind>,
}

impl CapabilityShape {
    pub fn of(kind: CapabilityKind) -> Self {
        Self {
            kind,
            instance: None,
            requires: None,
        }
    }

    pub fn instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    pub fn requiring(mut self, kind: CapabilityKind) -> Self {
        self.requires = Some(kind);
        self
    }

    /// First capability on `definition` matching this shape.
    pub fn find_in(&self, definition: &Definition) -> Option<CapabilityId> {
        if let Some(required) = self.requires {
            if !definition.carries(required) {
                return None;
            }
        }
        match &self.instance {
            Some(instance) => definition.lookup_instance(self.kind, instance),
            None => definition.lookup(self.kind),
        }
    }
}

impl fmt::Display for CapabilityShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.instance {
            Some(instance) => write!(f, "{}", self.kind.label(instance))?,
            None => write!(f, "{}", self.kind)?,
        }
        if let Some(required) = self.requires {
            write!(f, " with {}", required)?;
        }
        Ok(())
    }
}

/// Resolution state of a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingState {
    /// Satisfied by this capability on the target.
    Bound(CapabilityId),
    /// Not yet satisfied; re-checked at freeze.
    Deferred,
}

/// "Capability `source` requires definition `target` to carry `shape`."
#[derive(Debug, Clone)]
pub struct Binding {
    pub source: CapabilityId,
    pub target: DefinitionId,
    pub shape: CapabilityShape,
    pub state: BindingState,
}

impl Binding {
    /// Current state against `registry`; a bound binding stays bound because
    /// capabilities are never removed.
    pub fn evaluate(&self, registry: &Registry) -> BindingState {
        match self.state {
            BindingState::Bound(found) => BindingState::Bound(found),
            BindingState::Deferred => self
                .shape
                .find_in(registry.definition(self.target))
                .map(BindingState::Bound)
                .unwrap_or(BindingState::Deferred),
        }
    }
}
