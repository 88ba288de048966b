//! The capability behavior protocol invoked by the resolution driver.

use std::any::Any;
use std::fmt;

use cadre_core::errors::ComposeResult;
use cadre_core::types::DefinitionId;

use super::{Capability, CapabilityKind, Rule};
use crate::registry::Registry;
use crate::resolve::PhaseContext;

/// Upcast to `Any` for typed sibling access.
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Phase callbacks and static declarations of one capability.
///
/// `resolve` runs once in the structural phase, after every declared
/// dependency has completed its own structural phase. `finalize` runs once
/// after all structural work in the registry has drained. Both may inject
/// capabilities through the context; neither may mutate state outside the
/// owning definition and the declared `targets`.
pub trait CapabilityBehavior: AsAny + fmt::Debug + Send + Sync {
    fn kind(&self) -> CapabilityKind;

    /// Sibling kinds that must be resolved before `resolve` runs.
    fn dependencies(&self) -> Vec<CapabilityKind> {
        Vec::new()
    }

    /// Foreign definitions this capability may mutate.
    fn targets(&self) -> Vec<DefinitionId> {
        Vec::new()
    }

    fn resolve(&self, _cx: &mut PhaseContext<'_>) -> ComposeResult<()> {
        Ok(())
    }

    fn finalize(&self, _cx: &mut PhaseContext<'_>) -> ComposeResult<()> {
        Ok(())
    }

    /// Check one rule attached to `capability` against the resolved registry
    /// before the model freezes. `Err` carries the failure message.
    fn check_rule(
        &self,
        _rule: &Rule,
        _capability: &Capability,
        _registry: &Registry,
    ) -> Result<(), String> {
        Ok(())
    }
}

/// Downcast a behavior to its concrete type.
pub fn downcast_behavior<T: 'static>(behavior: &dyn CapabilityBehavior) -> Option<&T> {
    let any: &dyn Any = AsAny::as_any(behavior);
    any.downcast_ref::<T>()
}
