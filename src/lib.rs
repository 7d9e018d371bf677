//! singleton-config - process-wide configuration with a closed schema
//!
//! Each configuration type gets exactly one shared registry. Keys must be
//! registered before they can be assigned, values can be saved to and loaded
//! from JSON through optional per-key hooks, and `Display` lists the current
//! state.

pub mod config;
pub mod types;

pub use config::{
    instance, ConfigRegistry, ConfigValue, Configuration, EnumValue, HookTable, KeyOrder,
    SharedConfig,
};
pub use types::{ConfigError, Result};
