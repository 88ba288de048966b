//! State scoped to one resolution run.

use serde::{Deserialize, Serialize};

use cadre_core::types::{FxHashMap, HelperId};

use crate::frozen::ResolutionStats;

/// What a shared helper artifact describes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "helper")]
pub enum HelperKind {
    StateEnumeration { states: Vec<String> },
    LinkTable { left: String, right: String },
    NamePattern { pattern: String },
}

/// A helper artifact shared by every capability that asks for the same key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelperDecl {
    pub key: String,
    /// Definition whose capability first declared the helper.
    pub definition: String,
    pub kind: HelperKind,
}

/// Helper cache and counters for one run. Created by the driver and
/// threaded through every callback; nothing here outlives the run.
#[derive(Debug, Default)]
pub struct RunContext {
    helpers: Vec<HelperDecl>,
    by_key: FxHashMap<String, HelperId>,
    pub(crate) stats: ResolutionStats,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the helper for `key`, declaring it with `make` on first use.
    pub fn helper(&mut self, key: &str, make: impl FnOnce() -> HelperDecl) -> HelperId {
        if let Some(id) = self.by_key.get(key) {
            return *id;
        }
        let id = HelperId::from_index(self.helpers.len());
        let decl = make();
        debug_assert_eq!(decl.key, key);
        self.helpers.push(decl);
        self.by_key.insert(key.to_string(), id);
        id
    }

    pub fn helpers(&self) -> &[HelperDecl] {
        &self.helpers
    }

    pub(crate) fn into_parts(self) -> (Vec<HelperDecl>, ResolutionStats) {
        (self.helpers, self.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helper_is_declared_once_per_key() {
        let mut run = RunContext::new();
        let make = || HelperDecl {
            key: "OrderState".into(),
            definition: "Order".into(),
            kind: HelperKind::StateEnumeration {
                states: vec!["open".into(), "closed".into()],
            },
        };
        let first = run.helper("OrderState", make);
        let second = run.helper("OrderState", || unreachable!("cached"));
        assert_eq!(first, second);
        assert_eq!(run.helpers().len(), 1);
    }
}
