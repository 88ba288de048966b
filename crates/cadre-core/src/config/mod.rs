//! Configuration system for Cadre.
//! TOML-based, layered resolution: overrides > env > project > user > defaults.

pub mod cadre_config;
pub mod emission_config;
pub mod resolution_config;

pub use cadre_config::{CadreConfig, ConfigOverrides};
pub use emission_config::EmissionConfig;
pub use resolution_config::ResolutionConfig;
