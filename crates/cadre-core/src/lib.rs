//! # cadre-core
//!
//! Foundation crate for the Cadre composition engine.
//! Defines shared types, errors, config, events, tracing, and constants.
//! `cadre-compose` and every downstream code sink depend on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod events;
pub mod tracing;
pub mod types;

// Re-export the most commonly used types at the crate root.
pub use config::CadreConfig;
pub use errors::{CadreErrorCode, ComposeError, ComposeResult};
pub use types::{AccessorId, BindingId, CapabilityId, DefinitionId, HelperId};
