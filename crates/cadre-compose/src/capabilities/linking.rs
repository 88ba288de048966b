//! Parent/child composition: the child points at its parent, and the parent
//! learns about each child definition through an injected capability.

use cadre_core::errors::ComposeResult;
use cadre_core::types::DefinitionId;

use super::accessors::DELETE;
use super::snake_case;
use crate::model::{
    Accessor, AdvicePosition, CapabilityBehavior, CapabilityKind, CapabilityShape,
    CapabilitySpec, Field, FieldType, TypeRef,
};
use crate::resolve::PhaseContext;

/// Child side of a parent/child relation.
#[derive(Debug, Clone)]
pub struct LinkedToParent {
    parent: DefinitionId,
}

impl LinkedToParent {
    pub fn new(parent: DefinitionId) -> Self {
        Self { parent }
    }

    pub fn parent(&self) -> DefinitionId {
        self.parent
    }
}

impl CapabilityBehavior for LinkedToParent {
    fn kind(&self) -> CapabilityKind {
        CapabilityKind::LinkedToParent
    }

    fn dependencies(&self) -> Vec<CapabilityKind> {
        vec![CapabilityKind::HasIdentity]
    }

    fn targets(&self) -> Vec<DefinitionId> {
        vec![self.parent]
    }

    fn resolve(&self, cx: &mut PhaseContext<'_>) -> ComposeResult<()> {
        let child = cx.definition_id();
        let child_name = cx.definition_name().to_string();
        let parent_name = cx.definition_of(self.parent)?.name().to_string();

        // A named instance gets its own column so one child may link to
        // several parents, or to the same parent more than once.
        let role = match cx.this().instance() {
            "" => "parent".to_string(),
            instance => snake_case(instance),
        };

        cx.declare_field(
            Field::new(
                format!("{role}_id"),
                FieldType::Reference {
                    definition: parent_name.clone(),
                },
            )
            .indexed(),
        )?;
        cx.declare_accessor(
            Accessor::new(format!("get_{role}")).returns(TypeRef::Definition(parent_name)),
        )?;
        cx.bind(self.parent, CapabilityShape::of(CapabilityKind::HasIdentity))?;

        // One companion per child definition, however many links it declares.
        cx.ensure_injected(
            self.parent,
            CapabilitySpec::new(LinkedFromChildren::new(child))
                .instance(child_name)
                .owned_by(self.parent),
        )?;
        Ok(())
    }
}

/// Parent side of a parent/child relation, injected by [`LinkedToParent`].
#[derive(Debug, Clone)]
pub struct LinkedFromChildren {
    child: DefinitionId,
}

impl LinkedFromChildren {
    pub fn new(child: DefinitionId) -> Self {
        Self { child }
    }

    pub fn child(&self) -> DefinitionId {
        self.child
    }
}

impl CapabilityBehavior for LinkedFromChildren {
    fn kind(&self) -> CapabilityKind {
        CapabilityKind::LinkedFromChildren
    }

    fn resolve(&self, cx: &mut PhaseContext<'_>) -> ComposeResult<()> {
        let child_name = cx.definition_of(self.child)?.name().to_string();
        cx.declare_accessor(
            Accessor::new(format!("list_{}", snake_case(&child_name)))
                .returns(TypeRef::List(Box::new(TypeRef::Definition(child_name)))),
        )?;
        Ok(())
    }

    fn finalize(&self, cx: &mut PhaseContext<'_>) -> ComposeResult<()> {
        let Some(delete) = cx.registry().find_accessor(cx.definition_id(), DELETE) else {
            return Ok(());
        };
        let child_name = cx.definition_of(self.child)?.name();
        let advice = format!("cascade_delete_{}", snake_case(child_name));
        cx.advise(delete, AdvicePosition::After, advice)?;
        Ok(())
    }
}
