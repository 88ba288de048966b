use cadre_core::errors::ComposeResult;

use super::accessors::UPDATE;
use crate::model::{
    Accessor, AdvicePosition, CapabilityBehavior, CapabilityKind, Field, FieldType, TypeRef,
};
use crate::resolve::PhaseContext;

/// Optimistic-locking version counter, bumped after every update.
#[derive(Debug, Clone, Default)]
pub struct Versioned;

impl CapabilityBehavior for Versioned {
    fn kind(&self) -> CapabilityKind {
        CapabilityKind::Versioned
    }

    fn dependencies(&self) -> Vec<CapabilityKind> {
        vec![CapabilityKind::HasIdentity]
    }

    fn resolve(&self, cx: &mut PhaseContext<'_>) -> ComposeResult<()> {
        cx.declare_field(Field::new("version", FieldType::Integer))?;
        cx.declare_accessor(Accessor::new("get_version").returns(TypeRef::Integer))?;
        let update = cx.require_accessor(cx.definition_id(), UPDATE)?;
        cx.advise(update, AdvicePosition::After, "bump_version")?;
        Ok(())
    }
}
