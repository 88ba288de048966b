use cadre_core::errors::ComposeResult;
use cadre_core::types::DefinitionId;

use super::accessors::TRANSITION;
use super::lifecycle::Lifecycle;
use crate::model::{
    Accessor, AdvicePosition, CapabilityBehavior, CapabilityKind, CapabilityShape, Field,
    FieldType, TypeRef,
};
use crate::resolve::PhaseContext;

/// Assignment of lifecycle work to an instance of another definition.
#[derive(Debug, Clone)]
pub struct Workflow {
    assignee: DefinitionId,
}

impl Workflow {
    pub fn new(assignee: DefinitionId) -> Self {
        Self { assignee }
    }

    pub fn assignee(&self) -> DefinitionId {
        self.assignee
    }
}

impl CapabilityBehavior for Workflow {
    fn kind(&self) -> CapabilityKind {
        CapabilityKind::Workflow
    }

    fn dependencies(&self) -> Vec<CapabilityKind> {
        vec![CapabilityKind::Lifecycle]
    }

    fn resolve(&self, cx: &mut PhaseContext<'_>) -> ComposeResult<()> {
        let lifecycle = cx.sibling_behavior::<Lifecycle>(CapabilityKind::Lifecycle)?;
        let enumeration = Lifecycle::enumeration_name(cx.definition_name());
        let has_states = !lifecycle.states().is_empty();
        let assignee = cx.definition_of(self.assignee)?.name().to_string();

        cx.declare_field(
            Field::new(
                "assignee_id",
                FieldType::Reference {
                    definition: assignee.clone(),
                },
            )
            .indexed(),
        )?;
        cx.declare_accessor(
            Accessor::new("get_assignee").returns(TypeRef::Definition(assignee)),
        )?;

        let mut advance = Accessor::new("advance").mutating();
        if has_states {
            advance = advance.returns(TypeRef::Enumeration(enumeration));
        }
        cx.declare_accessor(advance)?;

        let transition = cx.require_accessor(cx.definition_id(), TRANSITION)?;
        cx.advise(transition, AdvicePosition::After, "notify_assignee")?;

        cx.bind(self.assignee, CapabilityShape::of(CapabilityKind::HasIdentity))?;
        Ok(())
    }
}
