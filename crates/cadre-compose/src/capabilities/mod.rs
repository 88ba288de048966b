//! Built-in capability behaviors.
//!
//! Each behavior contributes fields and accessors to its owning definition
//! and, for the linking kinds, injects companion capabilities on the
//! definitions it points at.

pub mod identity;
pub mod lifecycle;
pub mod link_object;
pub mod linking;
pub mod naming;
pub mod versioning;
pub mod workflow;

pub use identity::HasIdentity;
pub use lifecycle::Lifecycle;
pub use link_object::{GenericLink, LinkObject, LinkSide};
pub use linking::{LinkedFromChildren, LinkedToParent};
pub use naming::Named;
pub use versioning::Versioned;
pub use workflow::Workflow;

/// Accessor names other capabilities attach advice to.
pub mod accessors {
    pub const CREATE: &str = "create";
    pub const UPDATE: &str = "update";
    pub const DELETE: &str = "delete";
    pub const TRANSITION: &str = "transition";
}

/// `LineItem` -> `line_item`, `HTTPRoute` -> `http_route`.
pub(crate) fn snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1);
            let boundary = match prev {
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_uppercase() => next.is_some_and(|n| n.is_lowercase()),
                _ => false,
            };
            if boundary && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else if *c == '-' || *c == ' ' {
            out.push('_');
        } else {
            out.push(*c);
        }
    }
    out
}
