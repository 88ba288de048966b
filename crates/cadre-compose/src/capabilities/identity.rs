use cadre_core::errors::ComposeResult;

use super::accessors::{CREATE, DELETE, UPDATE};
use crate::model::{Accessor, CapabilityBehavior, CapabilityKind, Field, FieldType, TypeRef};
use crate::resolve::PhaseContext;

/// Primary key and the basic persistence operations every other built-in
/// capability builds on.
#[derive(Debug, Clone, Default)]
pub struct HasIdentity;

impl CapabilityBehavior for HasIdentity {
    fn kind(&self) -> CapabilityKind {
        CapabilityKind::HasIdentity
    }

    fn resolve(&self, cx: &mut PhaseContext<'_>) -> ComposeResult<()> {
        cx.declare_field(Field::new("id", FieldType::Identifier).indexed())?;
        cx.declare_accessor(Accessor::new("get_id").returns(TypeRef::Identifier))?;
        cx.declare_accessor(
            Accessor::new("find_by_id")
                .argument("id", TypeRef::Identifier)
                .returns(TypeRef::SelfType)
                .unique(true),
        )?;
        cx.declare_accessor(Accessor::new(CREATE).returns(TypeRef::SelfType).mutating())?;
        cx.declare_accessor(Accessor::new(UPDATE).mutating())?;
        cx.declare_accessor(Accessor::new(DELETE).mutating())?;
        Ok(())
    }
}
