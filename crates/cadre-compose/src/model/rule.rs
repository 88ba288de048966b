//! Rules decorating a single capability instance, and the behavior mode
//! derived from them.

use serde::{Deserialize, Serialize};

use super::CapabilityKind;

/// Sealed rule vocabulary, matched exhaustively at every point of use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "rule")]
pub enum RuleKind {
    /// Names are computed from `pattern` instead of supplied by the user.
    AutoNaming { pattern: String },
    /// At most one instance per name.
    UniqueName,
    /// A lifecycle transition that must reference declared states.
    TransitionGuard { from: String, to: String },
    /// A left-side instance links to at most one right-side instance.
    MaxOneLinkFromLeft,
    /// A right-side instance links to at most one left-side instance.
    MaxOneLinkFromRight,
    /// Designer-supplied rule with no engine-side semantics.
    Custom { decorates: CapabilityKind },
}

/// A named rule attached to exactly one capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    pub user_implemented: bool,
    pub kind: RuleKind,
}

impl Rule {
    pub fn new(name: impl Into<String>, kind: RuleKind) -> Self {
        let user_implemented = matches!(kind, RuleKind::Custom { .. });
        Self {
            name: name.into(),
            user_implemented,
            kind,
        }
    }

    pub fn auto_naming(pattern: impl Into<String>) -> Self {
        Self::new(
            "AutoNaming",
            RuleKind::AutoNaming {
                pattern: pattern.into(),
            },
        )
    }

    pub fn unique_name() -> Self {
        Self::new("UniqueName", RuleKind::UniqueName)
    }

    pub fn transition_guard(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::new(
            "TransitionGuard",
            RuleKind::TransitionGuard {
                from: from.into(),
                to: to.into(),
            },
        )
    }

    pub fn max_one_link_from_left() -> Self {
        Self::new("MaxOneLinkFromLeft", RuleKind::MaxOneLinkFromLeft)
    }

    pub fn max_one_link_from_right() -> Self {
        Self::new("MaxOneLinkFromRight", RuleKind::MaxOneLinkFromRight)
    }

    pub fn custom(name: impl Into<String>, decorates: CapabilityKind) -> Self {
        Self::new(name, RuleKind::Custom { decorates })
    }

    /// The only capability kind this rule may decorate.
    pub fn decorates(&self) -> CapabilityKind {
        match &self.kind {
            RuleKind::AutoNaming { .. } | RuleKind::UniqueName => CapabilityKind::Named,
            RuleKind::TransitionGuard { .. } => CapabilityKind::Lifecycle,
            RuleKind::MaxOneLinkFromLeft | RuleKind::MaxOneLinkFromRight => {
                CapabilityKind::LinkObject
            }
            RuleKind::Custom { decorates } => *decorates,
        }
    }
}

/// How a naming capability obtains its value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum NamingMode {
    Explicit,
    AutoGenerated { pattern: String },
}

/// Cardinality of a link object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkMultiplicity {
    ManyToMany,
    OneFromLeft,
    OneFromRight,
    OneToOne,
}

impl LinkMultiplicity {
    /// Whether a left-side instance reaches at most one right-side instance.
    pub fn left_unique(&self) -> bool {
        matches!(self, Self::OneFromLeft | Self::OneToOne)
    }

    pub fn right_unique(&self) -> bool {
        matches!(self, Self::OneFromRight | Self::OneToOne)
    }
}

/// Generation-time behavior switch, decided once when a capability's rule
/// set is sealed at the end of its structural phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "variant")]
pub enum CapabilityMode {
    Plain,
    Naming { naming: NamingMode, unique: bool },
    Link { multiplicity: LinkMultiplicity },
}

impl CapabilityMode {
    pub fn decide(kind: CapabilityKind, rules: &[Rule]) -> Self {
        match kind {
            CapabilityKind::Named => {
                let mut naming = NamingMode::Explicit;
                let mut unique = false;
                for rule in rules {
                    match &rule.kind {
                        // A second pattern is rejected at freeze by `Named`.
                        RuleKind::AutoNaming { pattern } => {
                            naming = NamingMode::AutoGenerated {
                                pattern: pattern.clone(),
                            };
                        }
                        RuleKind::UniqueName => unique = true,
                        RuleKind::TransitionGuard { .. }
                        | RuleKind::MaxOneLinkFromLeft
                        | RuleKind::MaxOneLinkFromRight
                        | RuleKind::Custom { .. } => {}
                    }
                }
                Self::Naming { naming, unique }
            }
            CapabilityKind::LinkObject => {
                let left = rules
                    .iter()
                    .any(|r| matches!(r.kind, RuleKind::MaxOneLinkFromLeft));
                let right = rules
                    .iter()
                    .any(|r| matches!(r.kind, RuleKind::MaxOneLinkFromRight));
                let multiplicity = match (left, right) {
                    (true, true) => LinkMultiplicity::OneToOne,
                    (true, false) => LinkMultiplicity::OneFromLeft,
                    (false, true) => LinkMultiplicity::OneFromRight,
                    (false, false) => LinkMultiplicity::ManyToMany,
                };
                Self::Link { multiplicity }
            }
            _ => Self::Plain,
        }
    }

    pub fn naming(&self) -> Option<&NamingMode> {
        match self {
            Self::Naming { naming, .. } => Some(naming),
            _ => None,
        }
    }

    pub fn multiplicity(&self) -> Option<LinkMultiplicity> {
        match self {
            Self::Link { multiplicity } => Some(*multiplicity),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_without_rules_is_explicit() {
        let mode = CapabilityMode::decide(CapabilityKind::Named, &[]);
        assert_eq!(mode.naming(), Some(&NamingMode::Explicit));
    }

    #[test]
    fn auto_naming_switches_mode() {
        let rules = vec![Rule::auto_naming("INV-{seq}"), Rule::unique_name()];
        let mode = CapabilityMode::decide(CapabilityKind::Named, &rules);
        assert_eq!(
            mode,
            CapabilityMode::Naming {
                naming: NamingMode::AutoGenerated {
                    pattern: "INV-{seq}".into()
                },
                unique: true,
            }
        );
    }

    #[test]
    fn link_rules_combine_into_one_to_one() {
        let rules = vec![Rule::max_one_link_from_left(), Rule::max_one_link_from_right()];
        let mode = CapabilityMode::decide(CapabilityKind::LinkObject, &rules);
        assert_eq!(mode.multiplicity(), Some(LinkMultiplicity::OneToOne));
    }

    #[test]
    fn custom_rule_is_user_implemented() {
        let rule = Rule::custom("AuditTrail", CapabilityKind::Versioned);
        assert!(rule.user_implemented);
        assert_eq!(rule.decorates(), CapabilityKind::Versioned);
        assert!(!Rule::unique_name().user_implemented);
    }
}
