//! Rule attachment and validation errors.

use super::error_code::{self, CadreErrorCode};

/// Errors raised when attaching or checking a rule.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("Rule {rule} decorates {expected}, not {capability} on {definition}")]
    RuleTypeMismatch {
        rule: String,
        expected: String,
        definition: String,
        capability: String,
    },

    #[error("Rule {rule} on {capability} of {definition} failed: {message}")]
    RuleValidationFailure {
        rule: String,
        definition: String,
        capability: String,
        message: String,
    },

    #[error("Cannot attach rule {rule}: rules of {capability} on {definition} are sealed")]
    RuleSetSealed {
        rule: String,
        definition: String,
        capability: String,
    },
}

impl CadreErrorCode for RuleError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::RuleTypeMismatch { .. } => error_code::RULE_TYPE_MISMATCH,
            Self::RuleValidationFailure { .. } => error_code::RULE_VALIDATION_FAILURE,
            Self::RuleSetSealed { .. } => error_code::RULE_SET_SEALED,
        }
    }
}
