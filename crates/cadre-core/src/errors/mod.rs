//! Error handling for Cadre.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod compose_error;
pub mod config_error;
pub mod emit_error;
pub mod error_code;
pub mod model_error;
pub mod resolution_error;
pub mod rule_error;

pub use compose_error::{ComposeError, ComposeResult};
pub use config_error::ConfigError;
pub use emit_error::EmitError;
pub use error_code::CadreErrorCode;
pub use model_error::ModelError;
pub use resolution_error::ResolutionError;
pub use rule_error::RuleError;
