//! Append-only work queues for the two resolution phases.

use std::collections::VecDeque;

use cadre_core::events::types::PhaseLabel;
use cadre_core::types::{CapabilityId, DefinitionId};

use crate::model::CapabilityState;
use crate::registry::Registry;

/// Resolution phase of a work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Structural,
    Finalize,
}

impl Phase {
    pub fn label(&self) -> PhaseLabel {
        match self {
            Self::Structural => PhaseLabel::Structural,
            Self::Finalize => PhaseLabel::Finalize,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkItem {
    pub definition: DefinitionId,
    pub capability: CapabilityId,
    pub phase: Phase,
}

/// Pending work in deterministic order.
///
/// Items are only ever appended; `next` always prefers structural work.
#[derive(Debug, Default)]
pub struct Worklist {
    structural: VecDeque<WorkItem>,
    finalize: VecDeque<WorkItem>,
}

impl Worklist {
    /// Seed with every pending capability: definition registration order,
    /// then capability insertion order.
    pub fn seed(registry: &Registry) -> Self {
        let mut worklist = Self::default();
        for definition in registry.definitions() {
            for capability in registry.capabilities_of(definition.id()) {
                if capability.state() == CapabilityState::Pending {
                    worklist.schedule(WorkItem {
                        definition: definition.id(),
                        capability: capability.id(),
                        phase: Phase::Structural,
                    });
                }
            }
        }
        worklist
    }

    pub fn schedule(&mut self, item: WorkItem) {
        match item.phase {
            Phase::Structural => self.structural.push_back(item),
            Phase::Finalize => self.finalize.push_back(item),
        }
    }

    pub fn next(&mut self) -> Option<WorkItem> {
        self.structural
            .pop_front()
            .or_else(|| self.finalize.pop_front())
    }

    pub fn is_empty(&self) -> bool {
        self.structural.is_empty() && self.finalize.is_empty()
    }
}
