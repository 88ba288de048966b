//! The fixpoint driver.

use std::sync::Arc;
use std::time::Instant;

use cadre_core::config::{CadreConfig, ResolutionConfig};
use cadre_core::errors::{CadreErrorCode, ComposeResult, ModelError, ResolutionError};
use cadre_core::events::types::{
    CapabilityResolvedEvent, RegistryFrozenEvent, ResolutionFailedEvent, ResolutionStartedEvent,
};
use cadre_core::events::{EventDispatcher, ResolutionEventHandler};
use cadre_core::types::CapabilityId;

use super::context::PhaseContext;
use super::freeze;
use super::run_context::RunContext;
use super::worklist::{Phase, WorkItem, Worklist};
use crate::frozen::FrozenModel;
use crate::model::{CapabilityMode, CapabilityState};
use crate::registry::Registry;

/// Resolves a registry to a frozen model.
///
/// A resolver holds no per-run state and may be reused across registries.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    config: ResolutionConfig,
    events: EventDispatcher,
}

impl Resolver {
    pub fn new(config: ResolutionConfig) -> Self {
        Self {
            config,
            events: EventDispatcher::new(),
        }
    }

    pub fn from_config(config: &CadreConfig) -> Self {
        Self::new(config.resolution.clone())
    }

    /// Register a lifecycle event handler.
    pub fn with_handler(mut self, handler: Arc<dyn ResolutionEventHandler>) -> Self {
        self.events.register(handler);
        self
    }

    pub fn config(&self) -> &ResolutionConfig {
        &self.config
    }

    /// Run both phases to a fixpoint and freeze the registry.
    ///
    /// A frozen registry returns its cached model without invoking any
    /// callback. A failed run poisons the registry.
    pub fn resolve(&self, registry: &mut Registry) -> ComposeResult<FrozenModel> {
        if let Some(model) = registry.frozen_model() {
            tracing::debug!("registry already frozen, returning cached model");
            return Ok(model.clone());
        }
        if registry.is_poisoned() {
            return Err(ModelError::RegistryPoisoned.into());
        }

        let start = Instant::now();
        self.events.emit_resolution_started(&ResolutionStartedEvent {
            definitions: registry.definition_count(),
            capabilities: registry.capability_count(),
        });

        match self.run(registry) {
            Ok(model) => {
                let duration_ms = start.elapsed().as_millis() as u64;
                tracing::info!(
                    definitions = model.definitions.len(),
                    capabilities = model.capability_count(),
                    work_items = model.stats.work_items,
                    injections = model.stats.injections,
                    duration_ms,
                    "registry frozen"
                );
                self.events.emit_registry_frozen(&RegistryFrozenEvent {
                    definitions: model.definitions.len(),
                    capabilities: model.capability_count(),
                    work_items: model.stats.work_items,
                    duration_ms,
                });
                registry.freeze(model.clone());
                Ok(model)
            }
            Err(err) => {
                registry.poison();
                tracing::warn!(code = err.error_code(), error = %err, "resolution failed");
                self.events.emit_resolution_failed(&ResolutionFailedEvent {
                    error_code: err.error_code().to_string(),
                    message: err.to_string(),
                });
                Err(err)
            }
        }
    }

    fn run(&self, registry: &mut Registry) -> ComposeResult<FrozenModel> {
        let limit = self.config.effective_max_iterations();
        let mut worklist = Worklist::seed(registry);
        let mut run = RunContext::new();

        while let Some(item) = worklist.next() {
            if run.stats.work_items >= limit {
                return Err(ResolutionError::ResolutionDidNotConverge {
                    limit,
                    definition: registry.definition_name(item.definition).to_string(),
                    capability: registry.capability_label(item.capability),
                }
                .into());
            }
            run.stats.work_items += 1;

            match item.phase {
                Phase::Structural => self.structural(registry, &mut worklist, &mut run, item)?,
                Phase::Finalize => self.finalize(registry, &mut worklist, &mut run, item)?,
            }
        }

        freeze::freeze(registry, run, &self.config)
    }

    fn structural(
        &self,
        registry: &mut Registry,
        worklist: &mut Worklist,
        run: &mut RunContext,
        item: WorkItem,
    ) -> ComposeResult<()> {
        if registry.capability(item.capability).state() != CapabilityState::Pending {
            return Ok(());
        }
        check_dependencies(registry, item)?;

        let behavior = Arc::clone(&registry.capability(item.capability).behavior);
        behavior.resolve(&mut PhaseContext::new(registry, worklist, run, &self.events, item))?;

        // Rules seal here; the mode is fixed for finalize and emission.
        let cap = registry.capability_mut(item.capability);
        cap.mode = Some(CapabilityMode::decide(cap.kind, &cap.rules));
        cap.state = CapabilityState::Resolved;

        worklist.schedule(WorkItem {
            phase: Phase::Finalize,
            ..item
        });
        run.stats.structural_runs += 1;
        self.report(registry, item);
        Ok(())
    }

    fn finalize(
        &self,
        registry: &mut Registry,
        worklist: &mut Worklist,
        run: &mut RunContext,
        item: WorkItem,
    ) -> ComposeResult<()> {
        if registry.capability(item.capability).state() != CapabilityState::Resolved {
            return Ok(());
        }

        let behavior = Arc::clone(&registry.capability(item.capability).behavior);
        behavior.finalize(&mut PhaseContext::new(registry, worklist, run, &self.events, item))?;

        registry.capability_mut(item.capability).state = CapabilityState::Finalized;
        run.stats.finalize_runs += 1;
        self.report(registry, item);
        Ok(())
    }

    fn report(&self, registry: &Registry, item: WorkItem) {
        let definition = registry.definition_name(item.definition);
        let capability = registry.capability_label(item.capability);
        tracing::debug!(
            definition,
            capability = %capability,
            phase = item.phase.label().as_str(),
            "capability resolved"
        );
        self.events.emit_capability_resolved(&CapabilityResolvedEvent {
            definition: definition.to_string(),
            capability,
            phase: item.phase.label(),
        });
    }
}

/// Every declared dependency must name a sibling that is attached and has
/// already completed its structural phase. The driver never reorders work to
/// satisfy a dependency.
fn check_dependencies(registry: &mut Registry, item: WorkItem) -> ComposeResult<()> {
    let definition = registry.definition(item.definition);
    let cap = registry.capability(item.capability);

    let mut resolved: Vec<CapabilityId> = Vec::with_capacity(cap.dependencies().len());
    for dependency in cap.dependencies() {
        let reason = match definition.lookup(dependency.kind) {
            Some(id) if registry.capability(id).is_resolved() => {
                resolved.push(id);
                continue;
            }
            Some(_) => "attached after its dependent; it must be attached first",
            None => "no such capability is attached",
        };
        return Err(ResolutionError::MissingDependency {
            definition: definition.name().to_string(),
            capability: cap.label(),
            dependency: dependency.kind.as_str().to_string(),
            reason: reason.to_string(),
        }
        .into());
    }

    let cap = registry.capability_mut(item.capability);
    for (dependency, id) in cap.dependencies.iter_mut().zip(resolved) {
        dependency.resolved = Some(id);
    }
    Ok(())
}
