//! Shared data structures for Cadre.
//! FxHashMap, SmallVec aliases, index-based ID types.

pub mod collections;
pub mod identifiers;

pub use collections::{FxHashMap, SmallVec4};
pub use identifiers::{AccessorId, BindingId, CapabilityId, DefinitionId, HelperId};
