//! Format-keyed engine registry.
//!
//! An explicit, constructible object rather than a process-wide global, so
//! issuers, verifiers, and tests each wire their own isolated instance.
//! Registration typically happens once at startup; reads are frequent and
//! concurrent.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use credkit_core::ProofFormat;

use crate::engine::ProofEngine;

/// Maps a proof format id to the engine that handles it.
#[derive(Default)]
pub struct EngineRegistry {
    engines: RwLock<HashMap<ProofFormat, Arc<dyn ProofEngine>>>,
}

impl EngineRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an engine under its own format id, replacing any previous
    /// engine for that format.
    pub fn register(&self, engine: Arc<dyn ProofEngine>) {
        self.write().insert(engine.format(), engine);
    }

    /// Remove and return the engine for a format.
    pub fn unregister(&self, format: ProofFormat) -> Option<Arc<dyn ProofEngine>> {
        self.write().remove(&format)
    }

    /// Look up the engine for a format.
    pub fn get(&self, format: ProofFormat) -> Option<Arc<dyn ProofEngine>> {
        self.read().get(&format).cloned()
    }

    /// Whether a format has an engine.
    pub fn contains(&self, format: ProofFormat) -> bool {
        self.read().contains_key(&format)
    }

    /// The registered format ids.
    pub fn formats(&self) -> Vec<ProofFormat> {
        self.read().keys().copied().collect()
    }

    /// Whether no engine is registered at all.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Drop every registration.
    pub fn clear(&self) {
        self.write().clear();
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<ProofFormat, Arc<dyn ProofEngine>>> {
        self.engines.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<ProofFormat, Arc<dyn ProofEngine>>> {
        self.engines.write().unwrap_or_else(PoisonError::into_inner)
    }
}
