//! Two-phase fixpoint resolution.
//!
//! The [`Resolver`] drains a [`Worklist`] of (definition, capability, phase)
//! items. Structural items always run before finalize items, so a finalize
//! callback sees every capability structurally resolved, including ones
//! injected by earlier finalize callbacks. Once both queues are empty the
//! registry is audited, bindings and rules are checked, and the model freezes.

pub mod context;
pub mod driver;
pub mod freeze;
pub mod run_context;
pub mod worklist;

pub use context::PhaseContext;
pub use driver::Resolver;
pub use run_context::{HelperDecl, HelperKind, RunContext};
pub use worklist::{Phase, WorkItem, Worklist};
