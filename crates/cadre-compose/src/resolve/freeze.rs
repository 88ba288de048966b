//! Post-fixpoint audit: ownership, bindings, rule checks, then capture.

use cadre_core::config::ResolutionConfig;
use cadre_core::errors::{ComposeResult, ModelError, ResolutionError, RuleError};
use cadre_core::types::{BindingId, CapabilityId, DefinitionId};

use super::run_context::RunContext;
use crate::frozen::FrozenModel;
use crate::model::BindingState;
use crate::registry::Registry;

/// Validate the drained registry and snapshot it.
pub(crate) fn freeze(
    registry: &mut Registry,
    run: RunContext,
    config: &ResolutionConfig,
) -> ComposeResult<FrozenModel> {
    audit_ownership(registry)?;
    settle_bindings(registry)?;
    if config.effective_check_rules() {
        check_rules(registry)?;
    }
    let (helpers, stats) = run.into_parts();
    Ok(FrozenModel::capture(registry, helpers, stats))
}

fn audit_ownership(registry: &Registry) -> ComposeResult<()> {
    for definition in registry.definitions() {
        for id in definition.capabilities() {
            ensure_owner(registry, definition.id(), *id)?;
        }
    }
    for definition in registry.definitions() {
        for cap in registry.capabilities_of(definition.id()) {
            for (target, injected) in cap.injections() {
                ensure_owner(registry, *target, *injected)?;
            }
        }
    }
    Ok(())
}

fn ensure_owner(registry: &Registry, expected: DefinitionId, id: CapabilityId) -> ComposeResult<()> {
    let cap = registry.capability(id);
    if cap.owner() == expected {
        return Ok(());
    }
    Err(ModelError::InconsistentOwnership {
        definition: registry.definition_name(expected).to_string(),
        capability: cap.label(),
        declared_owner: registry.definition_name(cap.owner()).to_string(),
    }
    .into())
}

/// Re-check every deferred binding against the final registry.
fn settle_bindings(registry: &mut Registry) -> ComposeResult<()> {
    for index in 0..registry.bindings().len() {
        let id = BindingId::from_index(index);
        let binding = registry.binding(id);
        match binding.evaluate(registry) {
            BindingState::Bound(found) => {
                registry.binding_mut(id).state = BindingState::Bound(found);
            }
            BindingState::Deferred => {
                let source = registry.capability(binding.source);
                return Err(ResolutionError::UnresolvedBinding {
                    definition: registry.definition_name(source.owner()).to_string(),
                    capability: source.label(),
                    target: registry.definition_name(binding.target).to_string(),
                    shape: binding.shape.to_string(),
                }
                .into());
            }
        }
    }
    Ok(())
}

fn check_rules(registry: &Registry) -> ComposeResult<()> {
    for definition in registry.definitions() {
        for cap in registry.capabilities_of(definition.id()) {
            for rule in cap.rules() {
                if let Err(message) = cap.behavior().check_rule(rule, cap, registry) {
                    return Err(RuleError::RuleValidationFailure {
                        rule: rule.name.clone(),
                        definition: definition.name().to_string(),
                        capability: cap.label(),
                        message,
                    }
                    .into());
                }
            }
        }
    }
    Ok(())
}
