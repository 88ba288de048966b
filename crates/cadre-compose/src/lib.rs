//! # cadre-compose
//!
//! Capability composition and fixpoint resolution.
//!
//! Designers register [`Definition`]s, attach [`CapabilitySpec`]s, and hand
//! the [`Registry`] to a [`Resolver`]. The resolver runs every capability
//! through its structural phase, then its finalize phase, re-iterating while
//! callbacks inject new capabilities, and returns a [`FrozenModel`] that a
//! [`CodeSink`] consumes through three ordered emission passes.

pub mod capabilities;
pub mod emit;
pub mod frozen;
pub mod model;
pub mod registry;
pub mod resolve;

pub use emit::{CodeSink, EmissionHook};
pub use frozen::{FrozenModel, ResolutionStats};
pub use model::{
    Accessor, AdvicePosition, Capability, CapabilityBehavior, CapabilityKind, CapabilityMode,
    CapabilityShape, CapabilitySpec, Definition, Field, FieldType, Rule, RuleKind, TypeRef,
};
pub use registry::Registry;
pub use resolve::{PhaseContext, Resolver};
