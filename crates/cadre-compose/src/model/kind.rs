//! Closed vocabulary of capability kinds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Every capability kind the engine knows how to compose.
///
/// Lookups on a definition are keyed by this enum; the string tag is only
/// used for diagnostics and serialized output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CapabilityKind {
    HasIdentity,
    Named,
    Versioned,
    Lifecycle,
    Workflow,
    LinkedToParent,
    LinkedFromChildren,
    LinkObject,
    GenericLink,
}

impl CapabilityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HasIdentity => "HasIdentity",
            Self::Named => "Named",
            Self::Versioned => "Versioned",
            Self::Lifecycle => "Lifecycle",
            Self::Workflow => "Workflow",
            Self::LinkedToParent => "LinkedToParent",
            Self::LinkedFromChildren => "LinkedFromChildren",
            Self::LinkObject => "LinkObject",
            Self::GenericLink => "GenericLink",
        }
    }

    pub fn all() -> &'static [CapabilityKind] {
        &[
            Self::HasIdentity,
            Self::Named,
            Self::Versioned,
            Self::Lifecycle,
            Self::Workflow,
            Self::LinkedToParent,
            Self::LinkedFromChildren,
            Self::LinkObject,
            Self::GenericLink,
        ]
    }

    /// Diagnostic label for an instance of this kind: `Kind` or `Kind[instance]`.
    pub fn label(&self, instance: &str) -> String {
        if instance.is_empty() {
            self.as_str().to_string()
        } else {
            format!("{}[{}]", self.as_str(), instance)
        }
    }
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
