//! One shared registry per configuration type
//!
//! The first call to [`instance`] for a type builds its registry, runs the
//! type's bootstrap with the gate suspended, then arms the gate and caches
//! the handle. Later calls return the same handle.

use crate::config::{ConfigRegistry, HookTable};
use crate::types::Result;
use once_cell::sync::OnceCell;
use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use tracing::{debug, info};

/// A concrete configuration type.
///
/// Implementors describe their hooks and register their keys; the shared
/// registry itself is obtained through [`Configuration::instance`].
pub trait Configuration: 'static {
    /// Define save/load hooks and property mutators for this type.
    fn define_hooks(_hooks: &mut HookTable) {}

    /// Register keys. Runs once, when the shared instance is created.
    fn bootstrap(config: &mut ConfigRegistry) -> Result<()>;

    fn instance() -> Result<SharedConfig>
    where
        Self: Sized,
    {
        instance::<Self>()
    }
}

/// Handle to the process-wide registry of one configuration type
#[derive(Debug, Clone)]
pub struct SharedConfig(Arc<Mutex<ConfigRegistry>>);

impl SharedConfig {
    /// Lock the registry. A poisoned lock is recovered, since every write
    /// either completes or is rejected before mutating.
    pub fn lock(&self) -> MutexGuard<'_, ConfigRegistry> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether both handles refer to the same registry
    pub fn ptr_eq(&self, other: &SharedConfig) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Per-type cell; concurrent first callers wait on it while one of them
/// runs the bootstrap.
type Slot = Arc<OnceCell<SharedConfig>>;

static INSTANCES: OnceLock<Mutex<HashMap<TypeId, Slot>>> = OnceLock::new();

fn instances() -> MutexGuard<'static, HashMap<TypeId, Slot>> {
    INSTANCES
        .get_or_init(|| Mutex::new(HashMap::new()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// Get or create the shared registry for `C`.
///
/// The bootstrap of `C` runs exactly once, even under concurrent first
/// access. A failing bootstrap is returned to the caller and nothing is
/// cached, so the next call retries.
pub fn instance<C: Configuration>() -> Result<SharedConfig> {
    let slot = Arc::clone(instances().entry(TypeId::of::<C>()).or_default());

    if let Some(shared) = slot.get() {
        debug!("Reusing shared configuration {}", type_name::<C>());
        return Ok(shared.clone());
    }

    // The cache lock is released here so a bootstrap may look up other
    // configuration types.
    slot.get_or_try_init(|| {
        let registry = build::<C>()?;
        info!(
            "Created shared configuration {} with {} key(s)",
            registry.type_name(),
            registry.len()
        );
        Ok(SharedConfig(Arc::new(Mutex::new(registry))))
    })
    .cloned()
}

fn build<C: Configuration>() -> Result<ConfigRegistry> {
    let mut hooks = HookTable::new();
    C::define_hooks(&mut hooks);

    let mut registry = ConfigRegistry::bootstrapping(type_name::<C>(), hooks);
    C::bootstrap(&mut registry)?;
    registry.arm();

    Ok(registry)
}
