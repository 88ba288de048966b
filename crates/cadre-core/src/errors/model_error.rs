//! Structural model errors: registry shape and ownership.

use super::error_code::{self, CadreErrorCode};

/// Errors raised while assembling or mutating the definition registry.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Definition {name} is already registered")]
    DuplicateDefinition { name: String },

    #[error("Unknown definition: {name}")]
    UnknownDefinition { name: String },

    /// `referrer` names the capability, and its definition once known.
    #[error("{referrer} refers to definition #{id}, which this registry does not hold")]
    UnknownDefinitionId { id: u32, referrer: String },

    #[error("Duplicate capability {kind}[{instance}] on {definition}")]
    DuplicateCapability {
        definition: String,
        kind: String,
        instance: String,
    },

    #[error("Field {field} declared by {capability} already exists on {definition}")]
    DuplicateField {
        definition: String,
        capability: String,
        field: String,
    },

    #[error("Accessor {accessor} declared by {capability} already exists on {definition}")]
    DuplicateAccessor {
        definition: String,
        capability: String,
        accessor: String,
    },

    #[error("{capability} declares owner {declared_owner} but is attached to {definition}")]
    InconsistentOwnership {
        definition: String,
        capability: String,
        declared_owner: String,
    },

    #[error("Registry is frozen; cannot {operation}")]
    RegistryFrozen { operation: String },

    #[error("Registry was poisoned by a failed resolution run")]
    RegistryPoisoned,
}

impl CadreErrorCode for ModelError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateCapability { .. } => error_code::DUPLICATE_CAPABILITY,
            Self::InconsistentOwnership { .. } => error_code::INCONSISTENT_OWNERSHIP,
            _ => error_code::MODEL_ERROR,
        }
    }
}
