//! Display names, either supplied by the user or computed from a pattern.

use cadre_core::errors::ComposeResult;

use super::accessors::CREATE;
use crate::model::{
    Accessor, AdvicePosition, Capability, CapabilityBehavior, CapabilityKind, CapabilityMode,
    Field, FieldType, NamingMode, Rule, RuleKind, TypeRef,
};
use crate::registry::Registry;
use crate::resolve::{HelperKind, PhaseContext};

/// Placeholder every auto-naming pattern may use besides field names.
pub const SEQUENCE_PLACEHOLDER: &str = "seq";

/// Default storage length of the `name` field.
const NAME_LENGTH: u32 = 255;

#[derive(Debug, Clone, Default)]
pub struct Named;

impl CapabilityBehavior for Named {
    fn kind(&self) -> CapabilityKind {
        CapabilityKind::Named
    }

    fn dependencies(&self) -> Vec<CapabilityKind> {
        vec![CapabilityKind::HasIdentity]
    }

    fn resolve(&self, cx: &mut PhaseContext<'_>) -> ComposeResult<()> {
        cx.declare_field(
            Field::new("name", FieldType::String)
                .with_length(NAME_LENGTH)
                .indexed(),
        )?;
        cx.declare_accessor(Accessor::new("get_name").returns(TypeRef::String))?;
        Ok(())
    }

    fn finalize(&self, cx: &mut PhaseContext<'_>) -> ComposeResult<()> {
        let (naming, unique) = match cx.mode() {
            Some(CapabilityMode::Naming { naming, unique }) => (naming.clone(), *unique),
            _ => (NamingMode::Explicit, false),
        };

        cx.declare_accessor(
            Accessor::new("find_by_name")
                .argument("name", TypeRef::String)
                .returns(if unique {
                    TypeRef::SelfType
                } else {
                    TypeRef::List(Box::new(TypeRef::SelfType))
                })
                .unique(unique),
        )?;

        match naming {
            NamingMode::Explicit => {
                cx.declare_accessor(
                    Accessor::new("set_name")
                        .argument("name", TypeRef::String)
                        .mutating(),
                )?;
            }
            NamingMode::AutoGenerated { pattern } => {
                let create = cx.require_accessor(cx.definition_id(), CREATE)?;
                cx.advise(create, AdvicePosition::Before, "compute_name")?;
                let key = format!("{}NamePattern", cx.definition_name());
                cx.helper(&key, HelperKind::NamePattern { pattern });
            }
        }
        Ok(())
    }

    fn check_rule(
        &self,
        rule: &Rule,
        capability: &Capability,
        registry: &Registry,
    ) -> Result<(), String> {
        let RuleKind::AutoNaming { pattern } = &rule.kind else {
            return Ok(());
        };
        let patterns = capability
            .rules()
            .iter()
            .filter(|r| matches!(r.kind, RuleKind::AutoNaming { .. }))
            .count();
        if patterns > 1 {
            return Err(format!(
                "{patterns} auto-naming rules attached; a name is computed from one pattern"
            ));
        }
        for placeholder in placeholders(pattern)? {
            if placeholder == SEQUENCE_PLACEHOLDER {
                continue;
            }
            let known = registry
                .capabilities_of(capability.owner())
                .any(|cap| cap.fields().iter().any(|f| f.name == placeholder));
            if !known {
                return Err(format!(
                    "pattern `{pattern}` references unknown field `{placeholder}`"
                ));
            }
        }
        Ok(())
    }
}

/// `{placeholder}` names in a naming pattern, in order.
pub fn placeholders(pattern: &str) -> Result<Vec<&str>, String> {
    let mut found = Vec::new();
    let mut rest = pattern;
    while let Some(open) = rest.find(['{', '}']) {
        if rest[open..].starts_with('}') {
            return Err(format!("pattern `{pattern}` has an unmatched `}}`"));
        }
        let after = &rest[open + 1..];
        let close = after
            .find(['{', '}'])
            .filter(|i| after[*i..].starts_with('}'))
            .ok_or_else(|| format!("pattern `{pattern}` has an unclosed `{{`"))?;
        let name = &after[..close];
        if name.is_empty() {
            return Err(format!("pattern `{pattern}` has an empty placeholder"));
        }
        found.push(name);
        rest = &after[close + 1..];
    }
    Ok(found)
}
