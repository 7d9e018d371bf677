//! Configuration registry
//!
//! - `registry`: closed schema and the assignment gate
//! - `hooks`: per-key save/load transforms and property mutators
//! - `singleton`: one shared registry per configuration type
//! - `loader`: JSON load/save
//! - `render`: human-readable listing

mod hooks;
mod loader;
mod registry;
mod render;
mod singleton;
mod value;

pub use hooks::{HookTable, LoadHook, Mutator, SaveHook};
pub use registry::ConfigRegistry;
pub use render::KeyOrder;
pub use singleton::{instance, Configuration, SharedConfig};
pub use value::{ConfigValue, EnumValue};
