//! The mutation surface a capability callback is handed.

use cadre_core::errors::{ComposeError, ComposeResult, ResolutionError};
use cadre_core::events::types::{BindingDeferredEvent, CapabilityInjectedEvent};
use cadre_core::events::EventDispatcher;
use cadre_core::types::{AccessorId, BindingId, CapabilityId, DefinitionId, HelperId};

use super::run_context::{HelperDecl, HelperKind, RunContext};
use super::worklist::{Phase, WorkItem, Worklist};
use crate::model::behavior::downcast_behavior;
use crate::model::{
    Accessor, AdvicePosition, BindingState, Capability, CapabilityKind, CapabilityMode,
    CapabilityShape, CapabilitySpec, Definition, Field, Rule,
};
use crate::registry::Registry;

/// Everything one phase callback of one capability may see and do.
///
/// Reads are unrestricted. Writes land on the capability itself, or on a
/// definition the capability owns or declared as a target.
pub struct PhaseContext<'a> {
    registry: &'a mut Registry,
    worklist: &'a mut Worklist,
    run: &'a mut RunContext,
    events: &'a EventDispatcher,
    definition: DefinitionId,
    capability: CapabilityId,
    phase: Phase,
}

impl<'a> PhaseContext<'a> {
    pub(crate) fn new(
        registry: &'a mut Registry,
        worklist: &'a mut Worklist,
        run: &'a mut RunContext,
        events: &'a EventDispatcher,
        item: WorkItem,
    ) -> Self {
        Self {
            registry,
            worklist,
            run,
            events,
            definition: item.definition,
            capability: item.capability,
            phase: item.phase,
        }
    }

    pub fn registry(&self) -> &Registry {
        &*self.registry
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn definition_id(&self) -> DefinitionId {
        self.definition
    }

    pub fn definition_name(&self) -> &str {
        self.registry.definition(self.definition).name()
    }

    pub fn capability_id(&self) -> CapabilityId {
        self.capability
    }

    /// Definition `id`, or `UnknownDefinitionId` naming this capability.
    pub fn definition_of(&self, id: DefinitionId) -> ComposeResult<&Definition> {
        self.registry.checked_definition(id, || {
            format!("{} on {}", self.this().label(), self.definition_name())
        })
    }

    /// The capability whose callback is running.
    pub fn this(&self) -> &Capability {
        self.registry.capability(self.capability)
    }

    /// Sealed mode of this capability; only available while finalizing.
    pub fn mode(&self) -> Option<&CapabilityMode> {
        self.this().mode()
    }

    /// A structurally resolved sibling of `kind` on the owning definition.
    pub fn sibling(&self, kind: CapabilityKind) -> ComposeResult<&Capability> {
        let definition = self.registry.definition(self.definition);
        let Some(id) = definition.lookup(kind) else {
            return Err(self.missing(kind, "no such capability is attached"));
        };
        let sibling = self.registry.capability(id);
        if !sibling.is_resolved() {
            return Err(self.missing(kind, "sibling has not completed its structural phase"));
        }
        Ok(sibling)
    }

    /// A resolved sibling viewed as its concrete behavior type.
    pub fn sibling_behavior<T: 'static>(&self, kind: CapabilityKind) -> ComposeResult<&T> {
        let sibling = self.sibling(kind)?;
        downcast_behavior::<T>(sibling.behavior())
            .ok_or_else(|| self.missing(kind, "sibling does not expose the expected behavior"))
    }

    /// Accessor named `name` on `definition`.
    pub fn require_accessor(&self, definition: DefinitionId, name: &str) -> ComposeResult<AccessorId> {
        let target = self.definition_of(definition)?.name();
        self.registry
            .find_accessor(definition, name)
            .ok_or_else(|| {
                ResolutionError::UnknownAccessor {
                    definition: self.definition_name().to_string(),
                    capability: self.this().label(),
                    accessor: format!("{target}.{name}"),
                }
                .into()
            })
    }

    pub fn declare_field(&mut self, field: Field) -> ComposeResult<()> {
        self.registry.push_field(self.capability, field)
    }

    pub fn declare_accessor(&mut self, accessor: Accessor) -> ComposeResult<AccessorId> {
        self.registry.push_accessor(self.capability, accessor)
    }

    /// Attach before/after advice to an accessor, possibly owned by another
    /// capability. Declaration order is chain order.
    pub fn advise(
        &mut self,
        target: AccessorId,
        position: AdvicePosition,
        name: impl Into<String>,
    ) -> ComposeResult<()> {
        let target_definition = self
            .registry
            .accessor(target)
            .owner
            .map(|owner| self.registry.capability(owner).owner());
        if let Some(target_definition) = target_definition {
            self.ensure_entitled(target_definition)?;
        }
        self.registry
            .push_advice(target, self.capability, name.into(), position);
        Ok(())
    }

    /// Require `target` to carry `shape`, now or by freeze.
    pub fn bind(
        &mut self,
        target: DefinitionId,
        shape: CapabilityShape,
    ) -> ComposeResult<BindingId> {
        self.definition_of(target)?;
        let (id, state) = self.registry.push_binding(self.capability, target, shape);
        if state == BindingState::Deferred {
            self.run.stats.deferred_bindings += 1;
            let binding = self.registry.binding(id);
            self.events.emit_binding_deferred(&BindingDeferredEvent {
                definition: self.definition_name().to_string(),
                capability: self.this().label(),
                target: self.registry.definition(target).name().to_string(),
                shape: binding.shape.to_string(),
            });
        }
        Ok(id)
    }

    /// Attach a new capability to `target` and schedule its structural phase.
    pub fn inject(&mut self, target: DefinitionId, spec: CapabilitySpec) -> ComposeResult<CapabilityId> {
        self.ensure_entitled(target)?;
        let injected = self.registry.insert_capability(target, spec)?;
        self.registry
            .capability_mut(self.capability)
            .injections
            .push((target, injected));
        self.worklist.schedule(WorkItem {
            definition: target,
            capability: injected,
            phase: Phase::Structural,
        });
        self.run.stats.injections += 1;

        let label = self.registry.capability_label(injected);
        tracing::debug!(
            source = %self.this().label(),
            target = self.registry.definition(target).name(),
            injected = %label,
            "capability injected"
        );
        self.events.emit_capability_injected(&CapabilityInjectedEvent {
            source_definition: self.definition_name().to_string(),
            source_capability: self.this().label(),
            target_definition: self.registry.definition(target).name().to_string(),
            injected: label,
        });
        Ok(injected)
    }

    /// Inject unless `target` already carries the same kind and instance.
    pub fn ensure_injected(
        &mut self,
        target: DefinitionId,
        spec: CapabilitySpec,
    ) -> ComposeResult<CapabilityId> {
        self.ensure_entitled(target)?;
        let existing = self
            .registry
            .definition(target)
            .lookup_instance(spec.kind(), spec.instance_name());
        match existing {
            Some(id) => Ok(id),
            None => self.inject(target, spec),
        }
    }

    /// Attach a rule to this capability; only legal before its rules seal.
    pub fn attach_rule(&mut self, rule: Rule) -> ComposeResult<()> {
        self.registry.push_rule(self.capability, rule)
    }

    /// Shared helper for `key`, declared on first request.
    pub fn helper(&mut self, key: &str, kind: HelperKind) -> HelperId {
        let definition = self.definition_name().to_string();
        let id = self.run.helper(key, || HelperDecl {
            key: key.to_string(),
            definition,
            kind,
        });
        let helpers = &mut self.registry.capability_mut(self.capability).helpers;
        if !helpers.contains(&id) {
            helpers.push(id);
        }
        id
    }

    fn ensure_entitled(&self, target: DefinitionId) -> ComposeResult<()> {
        let target_name = self.definition_of(target)?.name();
        if self.this().may_mutate(target) {
            return Ok(());
        }
        Err(ResolutionError::UnauthorizedTarget {
            definition: self.definition_name().to_string(),
            capability: self.this().label(),
            target: target_name.to_string(),
        }
        .into())
    }

    fn missing(&self, kind: CapabilityKind, reason: &str) -> ComposeError {
        ResolutionError::MissingDependency {
            definition: self.definition_name().to_string(),
            capability: self.this().label(),
            dependency: kind.as_str().to_string(),
            reason: reason.to_string(),
        }
        .into()
    }
}
