//! CadreErrorCode trait for structured diagnostics.

/// Trait for attaching a stable code to every Cadre error.
/// Every error enum implements this so a host tool can group
/// failures without parsing messages.
pub trait CadreErrorCode {
    /// Returns the error code string (e.g., "MISSING_DEPENDENCY").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted diagnostic string: `[ERROR_CODE] message`.
    fn diagnostic_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

// Error code constants.
pub const MODEL_ERROR: &str = "MODEL_ERROR";
pub const DUPLICATE_CAPABILITY: &str = "DUPLICATE_CAPABILITY";
pub const INCONSISTENT_OWNERSHIP: &str = "INCONSISTENT_OWNERSHIP";
pub const MISSING_DEPENDENCY: &str = "MISSING_DEPENDENCY";
pub const UNRESOLVED_BINDING: &str = "UNRESOLVED_BINDING";
pub const UNKNOWN_ACCESSOR: &str = "UNKNOWN_ACCESSOR";
pub const UNAUTHORIZED_TARGET: &str = "UNAUTHORIZED_TARGET";
pub const DID_NOT_CONVERGE: &str = "DID_NOT_CONVERGE";
pub const RULE_TYPE_MISMATCH: &str = "RULE_TYPE_MISMATCH";
pub const RULE_VALIDATION_FAILURE: &str = "RULE_VALIDATION_FAILURE";
pub const RULE_SET_SEALED: &str = "RULE_SET_SEALED";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const EMIT_ERROR: &str = "EMIT_ERROR";
