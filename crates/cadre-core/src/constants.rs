//! Shared constants for the Cadre composition engine.

/// Cadre version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default cap on work items processed by one resolution run.
pub const DEFAULT_MAX_ITERATIONS: usize = 10_000;

/// Rule checks run at freeze by default.
pub const DEFAULT_CHECK_RULES: bool = true;

/// The optional helper emission hook runs by default.
pub const DEFAULT_WRITE_HELPERS: bool = true;

/// Project-level config file name, looked up in the model root.
pub const PROJECT_CONFIG_FILE: &str = "cadre.toml";

/// Environment variable read by `init_tracing`.
pub const LOG_ENV_VAR: &str = "CADRE_LOG";
