//! Definitions: ordered, kind-indexed containers of capabilities.

use cadre_core::types::{CapabilityId, DefinitionId, FxHashMap};

use super::CapabilityKind;

/// A business entity being modeled.
///
/// Capability order is insertion order and is preserved into emission.
#[derive(Debug, Clone)]
pub struct Definition {
    pub(crate) id: DefinitionId,
    pub(crate) name: String,
    pub(crate) module: String,
    pub(crate) capabilities: Vec<CapabilityId>,
    pub(crate) index: FxHashMap<(CapabilityKind, String), CapabilityId>,
    pub(crate) first_of_kind: FxHashMap<CapabilityKind, CapabilityId>,
}

impl Definition {
    pub(crate) fn new(id: DefinitionId, name: String, module: String) -> Self {
        Self {
            id,
            name,
            module,
            capabilities: Vec::new(),
            index: FxHashMap::default(),
            first_of_kind: FxHashMap::default(),
        }
    }

    pub fn id(&self) -> DefinitionId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    /// Attached capabilities in insertion order.
    pub fn capabilities(&self) -> &[CapabilityId] {
        &self.capabilities
    }

    /// First capability of `kind`, if any.
    pub fn lookup(&self, kind: CapabilityKind) -> Option<CapabilityId> {
        self.first_of_kind.get(&kind).copied()
    }

    pub fn lookup_instance(&self, kind: CapabilityKind, instance: &str) -> Option<CapabilityId> {
        self.index.get(&(kind, instance.to_string())).copied()
    }

    pub fn carries(&self, kind: CapabilityKind) -> bool {
        self.first_of_kind.contains_key(&kind)
    }

    /// Number of capabilities of `kind`.
    pub fn count_of(&self, kind: CapabilityKind) -> usize {
        self.index.keys().filter(|(k, _)| *k == kind).count()
    }

    /// Append a capability; returns false when kind+instance is taken.
    pub(crate) fn push(&mut self, kind: CapabilityKind, instance: &str, id: CapabilityId) -> bool {
        let key = (kind, instance.to_string());
        if self.index.contains_key(&key) {
            return false;
        }
        self.index.insert(key, id);
        self.first_of_kind.entry(kind).or_insert(id);
        self.capabilities.push(id);
        true
    }
}
