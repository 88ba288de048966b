//! Emission hooks handed to a downstream code sink.
//!
//! The sink owns the bodies; this module owns the call order. Each hook kind
//! is one full pass over every capability of every definition, in registry
//! order, and the passes run declaration, dependents, helper.

use cadre_core::config::EmissionConfig;
use cadre_core::errors::{ComposeResult, EmitError};

use crate::frozen::{FrozenCapability, FrozenDefinition, FrozenModel};

/// The three per-capability emission hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmissionHook {
    Declaration,
    Dependents,
    Helper,
}

impl EmissionHook {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Declaration => "declaration",
            Self::Dependents => "dependents",
            Self::Helper => "helper",
        }
    }
}

impl std::fmt::Display for EmissionHook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Consumer of a frozen model.
pub trait CodeSink {
    /// Structural declaration contributed by one capability.
    fn write_declaration(
        &mut self,
        definition: &FrozenDefinition,
        capability: &FrozenCapability,
    ) -> Result<(), EmitError>;

    /// Dependent and import declarations of one capability.
    fn write_dependents(
        &mut self,
        definition: &FrozenDefinition,
        capability: &FrozenCapability,
    ) -> Result<(), EmitError>;

    /// Helper files. Called for every capability; most declare none, so
    /// the default writes nothing.
    fn write_helper(
        &mut self,
        _definition: &FrozenDefinition,
        _capability: &FrozenCapability,
    ) -> Result<(), EmitError> {
        Ok(())
    }
}

impl FrozenModel {
    /// Drive `sink` through the emission passes.
    pub fn emit(&self, sink: &mut dyn CodeSink, config: &EmissionConfig) -> ComposeResult<()> {
        let mut hooks = vec![EmissionHook::Declaration, EmissionHook::Dependents];
        if config.effective_write_helpers() {
            hooks.push(EmissionHook::Helper);
        }

        for hook in hooks {
            let mut calls = 0usize;
            for definition in &self.definitions {
                for capability in &definition.capabilities {
                    let result = match hook {
                        EmissionHook::Declaration => sink.write_declaration(definition, capability),
                        EmissionHook::Dependents => sink.write_dependents(definition, capability),
                        EmissionHook::Helper => sink.write_helper(definition, capability),
                    };
                    result?;
                    calls += 1;
                }
            }
            tracing::debug!(hook = hook.as_str(), calls, "emission pass complete");
        }
        Ok(())
    }
}
