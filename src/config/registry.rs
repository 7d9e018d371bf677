//! Schema-enforcing configuration registry
//!
//! Every key must be registered with [`ConfigRegistry::add_config`] or
//! [`ConfigRegistry::add_property`] before it can be assigned. All writes go
//! through [`ConfigRegistry::set`], which rejects unknown names.

use crate::config::{ConfigValue, HookTable};
use crate::types::{ConfigError, Result};
use std::collections::{HashMap, HashSet};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gate {
    /// Bootstrap is running; any name may be assigned
    Suspended,
    Armed,
}

#[derive(Debug)]
pub struct ConfigRegistry {
    /// Fully qualified name of the owning configuration type
    type_name: String,

    /// Registered keys in registration order
    keys: Vec<String>,

    /// Internal names backing property-style keys
    private_keys: HashSet<String>,

    /// Public names registered as properties
    properties: HashSet<String>,

    values: HashMap<String, ConfigValue>,

    hooks: HookTable,

    gate: Gate,
}

impl ConfigRegistry {
    /// Create an empty registry with the gate armed.
    pub fn new(type_name: impl Into<String>) -> Self {
        let mut registry = Self::bootstrapping(type_name, HookTable::new());
        registry.arm();
        registry
    }

    /// Registry whose gate stays open until [`ConfigRegistry::arm`] is called.
    pub(crate) fn bootstrapping(type_name: impl Into<String>, hooks: HookTable) -> Self {
        Self {
            type_name: type_name.into(),
            keys: Vec::new(),
            private_keys: HashSet::new(),
            properties: HashSet::new(),
            values: HashMap::new(),
            hooks,
            gate: Gate::Suspended,
        }
    }

    pub(crate) fn arm(&mut self) {
        self.gate = Gate::Armed;
    }

    /// Internal name that stores the value of property `name`.
    pub fn private_name(name: &str) -> String {
        format!("_{}", name)
    }

    /// Register `name` and assign its default value.
    pub fn add_config(&mut self, name: &str, default_value: impl Into<ConfigValue>) -> Result<()> {
        self.ensure_unregistered(name)?;

        debug!("Registering config '{}' on {}", name, self.type_name);
        self.keys.push(name.to_string());
        self.set(name, default_value)
    }

    /// Register `name` as a property-style key.
    ///
    /// The default is stored under [`ConfigRegistry::private_name`] and later
    /// assignments to `name` are routed through the mutator defined for it in
    /// the hook table. Fails with [`ConfigError::MissingMutator`] if no
    /// mutator exists yet, in which case nothing is registered.
    pub fn add_property(&mut self, name: &str, default_value: impl Into<ConfigValue>) -> Result<()> {
        let private = Self::private_name(name);
        self.ensure_unregistered(name)?;
        self.ensure_unregistered(&private)?;

        if !self.hooks.has_mutator(name) {
            return Err(ConfigError::MissingMutator(name.to_string()));
        }

        debug!(
            "Registering property '{}' (stored as '{}') on {}",
            name, private, self.type_name
        );
        self.keys.push(name.to_string());
        self.private_keys.insert(private.clone());
        self.set(&private, default_value)?;
        self.properties.insert(name.to_string());

        Ok(())
    }

    fn ensure_unregistered(&self, name: &str) -> Result<()> {
        if self.has_config(name) || self.private_keys.contains(name) {
            return Err(ConfigError::AlreadyRegistered(name.to_string()));
        }
        Ok(())
    }

    /// Assign `value` to `name`.
    ///
    /// Property keys are forwarded to their mutator. Anything else must be a
    /// registered or internal key, otherwise [`ConfigError::UnknownAttribute`]
    /// is returned and nothing changes.
    pub fn set(&mut self, name: &str, value: impl Into<ConfigValue>) -> Result<()> {
        let value = value.into();

        if self.properties.contains(name) {
            let mutator = self
                .hooks
                .get_mutator(name)
                .ok_or_else(|| ConfigError::MissingMutator(name.to_string()))?;
            debug!("Dispatching '{}' to its mutator", name);
            return mutator(self, value);
        }

        if self.gate == Gate::Suspended || self.is_assignable(name) {
            self.values.insert(name.to_string(), value);
            return Ok(());
        }

        debug!("Rejected assignment to unknown config '{}' on {}", name, self.type_name);
        Err(ConfigError::UnknownAttribute(name.to_string()))
    }

    fn is_assignable(&self, name: &str) -> bool {
        self.has_config(name) || self.private_keys.contains(name)
    }

    /// Current value of `name`; property keys resolve to their internal slot.
    pub fn get(&self, name: &str) -> Option<&ConfigValue> {
        if self.properties.contains(name) {
            self.values.get(&Self::private_name(name))
        } else {
            self.values.get(name)
        }
    }

    /// Whether `name` is part of the schema. Internal keys are not.
    pub fn has_config(&self, name: &str) -> bool {
        self.keys.iter().any(|k| k == name)
    }

    pub fn is_property(&self, name: &str) -> bool {
        self.properties.contains(name)
    }

    /// Registered keys in registration order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn hooks(&self) -> &HookTable {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut HookTable {
        &mut self.hooks
    }
}
