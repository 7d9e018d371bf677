//! Per-key save/load hooks and property mutators
//!
//! Hooks are keyed by the public key name and looked up when a save, load
//! or assignment happens, so a hook may be defined before or after its key
//! is registered.

use crate::config::{ConfigRegistry, ConfigValue};
use crate::types::Result;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Produces the JSON form of a key from the current configuration
pub type SaveHook = Arc<dyn Fn(&ConfigRegistry) -> Result<Value> + Send + Sync>;

/// Consumes a loaded JSON value and performs the assignment itself
pub type LoadHook = Arc<dyn Fn(&mut ConfigRegistry, Value) -> Result<()> + Send + Sync>;

/// Validating setter behind a property-style key
pub type Mutator = Arc<dyn Fn(&mut ConfigRegistry, ConfigValue) -> Result<()> + Send + Sync>;

#[derive(Default, Clone)]
pub struct HookTable {
    save: HashMap<String, SaveHook>,
    load: HashMap<String, LoadHook>,
    mutators: HashMap<String, Mutator>,
}

impl HookTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_save<F>(&mut self, name: &str, hook: F) -> &mut Self
    where
        F: Fn(&ConfigRegistry) -> Result<Value> + Send + Sync + 'static,
    {
        self.save.insert(name.to_string(), Arc::new(hook));
        self
    }

    pub fn on_load<F>(&mut self, name: &str, hook: F) -> &mut Self
    where
        F: Fn(&mut ConfigRegistry, Value) -> Result<()> + Send + Sync + 'static,
    {
        self.load.insert(name.to_string(), Arc::new(hook));
        self
    }

    /// Define the setter used by [`ConfigRegistry::add_property`] for `name`.
    pub fn mutator<F>(&mut self, name: &str, mutator: F) -> &mut Self
    where
        F: Fn(&mut ConfigRegistry, ConfigValue) -> Result<()> + Send + Sync + 'static,
    {
        self.mutators.insert(name.to_string(), Arc::new(mutator));
        self
    }

    pub fn save_hook(&self, name: &str) -> Option<SaveHook> {
        self.save.get(name).cloned()
    }

    pub fn load_hook(&self, name: &str) -> Option<LoadHook> {
        self.load.get(name).cloned()
    }

    pub fn get_mutator(&self, name: &str) -> Option<Mutator> {
        self.mutators.get(name).cloned()
    }

    pub fn has_mutator(&self, name: &str) -> bool {
        self.mutators.contains_key(name)
    }
}

impl std::fmt::Debug for HookTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut save: Vec<&String> = self.save.keys().collect();
        let mut load: Vec<&String> = self.load.keys().collect();
        let mut mutators: Vec<&String> = self.mutators.keys().collect();
        save.sort();
        load.sort();
        mutators.sort();

        f.debug_struct("HookTable")
            .field("save", &save)
            .field("load", &load)
            .field("mutators", &mutators)
            .finish()
    }
}
