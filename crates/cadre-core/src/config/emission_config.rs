//! Emission configuration.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_WRITE_HELPERS;

/// Configuration for the emission passes handed to a code sink.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct EmissionConfig {
    /// Run the optional helper hook. Default: true.
    pub write_helpers: Option<bool>,
}

impl EmissionConfig {
    pub fn effective_write_helpers(&self) -> bool {
        self.write_helpers.unwrap_or(DEFAULT_WRITE_HELPERS)
    }
}
