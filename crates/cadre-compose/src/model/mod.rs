//! The declarative model: definitions, capabilities, and the small value
//! types capabilities contribute.

pub mod accessor;
pub mod behavior;
pub mod binding;
pub mod capability;
pub mod definition;
pub mod field;
pub mod kind;
pub mod rule;

pub use accessor::{Accessor, Advice, AdvicePosition, Argument, TypeRef};
pub use behavior::CapabilityBehavior;
pub use binding::{Binding, BindingState, CapabilityShape};
pub use capability::{Capability, CapabilitySpec, CapabilityState, Dependency};
pub use definition::Definition;
pub use field::{Field, FieldType};
pub use kind::CapabilityKind;
pub use rule::{CapabilityMode, LinkMultiplicity, NamingMode, Rule, RuleKind};
