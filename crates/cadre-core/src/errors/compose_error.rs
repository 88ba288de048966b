//! Top-level composition error.

use super::error_code::CadreErrorCode;
use super::{ConfigError, EmitError, ModelError, ResolutionError, RuleError};

/// Errors that can abort a composition run.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Resolution error: {0}")]
    Resolution(#[from] ResolutionError),

    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Emission error: {0}")]
    Emit(#[from] EmitError),
}

impl CadreErrorCode for ComposeError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Model(e) => e.error_code(),
            Self::Resolution(e) => e.error_code(),
            Self::Rule(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::Emit(e) => e.error_code(),
        }
    }
}

/// Result alias used across the composition engine.
pub type ComposeResult<T> = Result<T, ComposeError>;
