//! State machines over a closed set of states.

use cadre_core::errors::ComposeResult;

use super::accessors::{CREATE, TRANSITION};
use crate::model::{
    Accessor, AdvicePosition, Capability, CapabilityBehavior, CapabilityKind, Field, FieldType,
    Rule, RuleKind, TypeRef,
};
use crate::registry::Registry;
use crate::resolve::{HelperKind, PhaseContext};

/// Storage length of the `state` enumeration column.
const STATE_LENGTH: u32 = 64;

#[derive(Debug, Clone)]
pub struct Lifecycle {
    states: Vec<String>,
    initial: Option<String>,
}

impl Lifecycle {
    pub fn new<I, S>(states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            states: states.into_iter().map(Into::into).collect(),
            initial: None,
        }
    }

    /// State newly created instances enter.
    pub fn initial(mut self, state: impl Into<String>) -> Self {
        self.initial = Some(state.into());
        self
    }

    pub fn states(&self) -> &[String] {
        &self.states
    }

    pub fn initial_state(&self) -> Option<&str> {
        self.initial.as_deref()
    }

    pub fn has_state(&self, state: &str) -> bool {
        self.states.iter().any(|s| s == state)
    }

    /// Name of the helper enumeration for `definition`.
    pub fn enumeration_name(definition: &str) -> String {
        format!("{definition}State")
    }
}

impl CapabilityBehavior for Lifecycle {
    fn kind(&self) -> CapabilityKind {
        CapabilityKind::Lifecycle
    }

    fn dependencies(&self) -> Vec<CapabilityKind> {
        vec![CapabilityKind::HasIdentity]
    }

    fn resolve(&self, cx: &mut PhaseContext<'_>) -> ComposeResult<()> {
        let enumeration = Self::enumeration_name(cx.definition_name());
        cx.helper(
            &enumeration,
            HelperKind::StateEnumeration {
                states: self.states.clone(),
            },
        );

        cx.declare_field(
            Field::new(
                "state",
                FieldType::Enumeration {
                    name: enumeration.clone(),
                },
            )
            .with_length(STATE_LENGTH)
            .indexed(),
        )?;
        cx.declare_accessor(
            Accessor::new("get_state").returns(TypeRef::Enumeration(enumeration.clone())),
        )?;
        cx.declare_accessor(
            Accessor::new(TRANSITION)
                .argument("target", TypeRef::Enumeration(enumeration))
                .mutating(),
        )?;

        if self.initial.is_some() {
            let create = cx.require_accessor(cx.definition_id(), CREATE)?;
            cx.advise(create, AdvicePosition::Before, "enter_initial_state")?;
        }
        Ok(())
    }

    fn check_rule(
        &self,
        rule: &Rule,
        _capability: &Capability,
        _registry: &Registry,
    ) -> Result<(), String> {
        let RuleKind::TransitionGuard { from, to } = &rule.kind else {
            return Ok(());
        };
        for state in [from, to] {
            if !self.has_state(state) {
                return Err(format!(
                    "transition {from} -> {to} references undeclared state `{state}`"
                ));
            }
        }
        Ok(())
    }
}
