//! Resolution driver errors.

use super::error_code::{self, CadreErrorCode};

/// Errors raised by the fixpoint driver or by a capability callback
/// violating the resolution protocol.
#[derive(Debug, thiserror::Error)]
pub enum ResolutionError {
    #[error("{capability} on {definition} requires {dependency}: {reason}")]
    MissingDependency {
        definition: String,
        capability: String,
        dependency: String,
        reason: String,
    },

    #[error("{capability} on {definition} requires {target} to carry {shape}, which never appeared")]
    UnresolvedBinding {
        definition: String,
        capability: String,
        target: String,
        shape: String,
    },

    #[error("{capability} on {definition} references unknown accessor {accessor}")]
    UnknownAccessor {
        definition: String,
        capability: String,
        accessor: String,
    },

    #[error("{capability} on {definition} may not mutate {target}")]
    UnauthorizedTarget {
        definition: String,
        capability: String,
        target: String,
    },

    #[error("Resolution did not converge after {limit} work items (last: {capability} on {definition})")]
    ResolutionDidNotConverge {
        limit: usize,
        definition: String,
        capability: String,
    },
}

impl CadreErrorCode for ResolutionError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingDependency { .. } => error_code::MISSING_DEPENDENCY,
            Self::UnresolvedBinding { .. } => error_code::UNRESOLVED_BINDING,
            Self::UnknownAccessor { .. } => error_code::UNKNOWN_ACCESSOR,
            Self::UnauthorizedTarget { .. } => error_code::UNAUTHORIZED_TARGET,
            Self::ResolutionDidNotConverge { .. } => error_code::DID_NOT_CONVERGE,
        }
    }
}
