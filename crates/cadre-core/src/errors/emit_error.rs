//! Emission errors reported by code sinks.

use super::error_code::{self, CadreErrorCode};

/// Errors a code sink may report from one of its hooks.
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error("{hook} hook failed for {capability} on {definition}: {message}")]
    SinkFailed {
        hook: String,
        definition: String,
        capability: String,
        message: String,
    },
}

impl CadreErrorCode for EmitError {
    fn error_code(&self) -> &'static str {
        error_code::EMIT_ERROR
    }
}
