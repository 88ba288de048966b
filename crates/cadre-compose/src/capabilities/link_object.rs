//! Association definitions joining two other definitions.

use serde::{Deserialize, Serialize};

use cadre_core::errors::{ComposeResult, ResolutionError};
use cadre_core::types::DefinitionId;

use super::snake_case;
use crate::model::{
    Accessor, CapabilityBehavior, CapabilityKind, CapabilityMode, CapabilityShape,
    CapabilitySpec, Field, FieldType, LinkMultiplicity, TypeRef,
};
use crate::resolve::{HelperKind, PhaseContext};

/// Which end of a link a definition sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkSide {
    Left,
    Right,
}

/// Makes its owning definition a link between `left` and `right`.
#[derive(Debug, Clone)]
pub struct LinkObject {
    left: DefinitionId,
    right: DefinitionId,
}

impl LinkObject {
    pub fn new(left: DefinitionId, right: DefinitionId) -> Self {
        Self { left, right }
    }

    pub fn left(&self) -> DefinitionId {
        self.left
    }

    pub fn right(&self) -> DefinitionId {
        self.right
    }

    /// Instance name of the `GenericLink` injected on `side`. The right end of
    /// a self-link gets its own instance so both ends can coexist.
    pub fn end_instance(&self, link: &str, side: LinkSide) -> String {
        match side {
            LinkSide::Right if self.left == self.right => format!("{link}Inverse"),
            _ => link.to_string(),
        }
    }
}

impl CapabilityBehavior for LinkObject {
    fn kind(&self) -> CapabilityKind {
        CapabilityKind::LinkObject
    }

    fn dependencies(&self) -> Vec<CapabilityKind> {
        vec![CapabilityKind::HasIdentity]
    }

    fn targets(&self) -> Vec<DefinitionId> {
        vec![self.left, self.right]
    }

    fn resolve(&self, cx: &mut PhaseContext<'_>) -> ComposeResult<()> {
        let link = cx.definition_id();
        let link_name = cx.definition_name().to_string();
        let left_name = cx.definition_of(self.left)?.name().to_string();
        let right_name = cx.definition_of(self.right)?.name().to_string();

        for (column, end) in [("left_id", &left_name), ("right_id", &right_name)] {
            cx.declare_field(
                Field::new(
                    column,
                    FieldType::Reference {
                        definition: end.clone(),
                    },
                )
                .indexed(),
            )?;
        }
        cx.bind(self.left, CapabilityShape::of(CapabilityKind::HasIdentity))?;
        cx.bind(self.right, CapabilityShape::of(CapabilityKind::HasIdentity))?;
        cx.helper(
            &format!("{link_name}Table"),
            HelperKind::LinkTable {
                left: left_name,
                right: right_name,
            },
        );

        for (target, side) in [(self.left, LinkSide::Left), (self.right, LinkSide::Right)] {
            cx.inject(
                target,
                CapabilitySpec::new(GenericLink::new(link, side))
                    .instance(self.end_instance(&link_name, side)),
            )?;
        }
        Ok(())
    }

    fn finalize(&self, cx: &mut PhaseContext<'_>) -> ComposeResult<()> {
        let multiplicity = cx
            .mode()
            .and_then(CapabilityMode::multiplicity)
            .unwrap_or(LinkMultiplicity::ManyToMany);

        let left_name = cx.definition_of(self.left)?.name().to_string();
        let right_name = cx.definition_of(self.right)?.name().to_string();
        cx.declare_accessor(finder(
            "find_by_left",
            &left_name,
            multiplicity.left_unique(),
        ))?;
        cx.declare_accessor(finder(
            "find_by_right",
            &right_name,
            multiplicity.right_unique(),
        ))?;
        Ok(())
    }
}

fn finder(name: &str, end: &str, unique: bool) -> Accessor {
    let result = if unique {
        TypeRef::SelfType
    } else {
        TypeRef::List(Box::new(TypeRef::SelfType))
    };
    Accessor::new(name)
        .argument(format!("{}_id", snake_case(end)), TypeRef::Identifier)
        .returns(result)
        .unique(unique)
}

/// One end of a link, injected by [`LinkObject`] onto each joined definition.
#[derive(Debug, Clone)]
pub struct GenericLink {
    link: DefinitionId,
    side: LinkSide,
}

impl GenericLink {
    pub fn new(link: DefinitionId, side: LinkSide) -> Self {
        Self { link, side }
    }

    pub fn link(&self) -> DefinitionId {
        self.link
    }

    pub fn side(&self) -> LinkSide {
        self.side
    }
}

impl CapabilityBehavior for GenericLink {
    fn kind(&self) -> CapabilityKind {
        CapabilityKind::GenericLink
    }

    fn finalize(&self, cx: &mut PhaseContext<'_>) -> ComposeResult<()> {
        let link = cx.definition_of(self.link)?;
        let link_name = link.name().to_string();
        let Some(link_object) = link.lookup(CapabilityKind::LinkObject) else {
            return Err(ResolutionError::MissingDependency {
                definition: cx.definition_name().to_string(),
                capability: cx.this().label(),
                dependency: CapabilityKind::LinkObject.as_str().to_string(),
                reason: format!("link definition {link_name} carries no link object"),
            }
            .into());
        };
        let multiplicity = cx
            .registry()
            .capability(link_object)
            .mode()
            .and_then(CapabilityMode::multiplicity)
            .unwrap_or(LinkMultiplicity::ManyToMany);

        // This end reaches at most one link when the link is bounded from here.
        let unique = match self.side {
            LinkSide::Left => multiplicity.left_unique(),
            LinkSide::Right => multiplicity.right_unique(),
        };
        let instance = match cx.this().instance() {
            "" => link_name.clone(),
            instance => instance.to_string(),
        };
        let result = if unique {
            TypeRef::Definition(link_name)
        } else {
            TypeRef::List(Box::new(TypeRef::Definition(link_name)))
        };
        cx.declare_accessor(
            Accessor::new(format!("list_{}", snake_case(&instance)))
                .returns(result)
                .unique(unique),
        )?;
        Ok(())
    }
}
