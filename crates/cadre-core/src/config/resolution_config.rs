//! Resolution driver configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CHECK_RULES, DEFAULT_MAX_ITERATIONS};

/// Configuration for the fixpoint resolution driver.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ResolutionConfig {
    /// Work items one run may process before giving up. Default: 10 000.
    pub max_iterations: Option<usize>,
    /// Run rule checks at freeze. Default: true.
    pub check_rules: Option<bool>,
}

impl ResolutionConfig {
    /// Returns the effective iteration cap, defaulting to 10 000.
    pub fn effective_max_iterations(&self) -> usize {
        self.max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS)
    }

    /// Returns whether rule checks run at freeze, defaulting to true.
    pub fn effective_check_rules(&self) -> bool {
        self.check_rules.unwrap_or(DEFAULT_CHECK_RULES)
    }
}
