//! Index-based ID types for registry arenas.
//!
//! Each ID wraps a `u32` arena index. A `CapabilityId` cannot be
//! accidentally used where a `DefinitionId` is expected.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u32);

        impl $name {
            /// Create an ID from an arena index.
            pub fn from_index(index: usize) -> Self {
                Self(index as u32)
            }

            /// The arena index this ID points at.
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl From<u32> for $name {
            fn from(raw: u32) -> Self {
                Self(raw)
            }
        }
    };
}

define_id!(
    /// Registered definition.
    DefinitionId
);

define_id!(
    /// Attached capability instance.
    CapabilityId
);

define_id!(
    /// Accessor contributed by a capability.
    AccessorId
);

define_id!(
    /// Cross-definition binding.
    BindingId
);

define_id!(
    /// Helper declared through the per-run context.
    HelperId
);
