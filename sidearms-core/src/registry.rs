//! Character → weapon memory registry.
//!
//! The registry is the only way to reach a [`WeaponMemory`]. It lives for a
//! campaign: populated from save data (or empty) when a campaign loads,
//! handed back as [`SaveData`] when it unloads. Between those points
//! [`Registry::memory_for_character`] looks memories up, creating them on
//! first access and running the repair pass on loaded ones.
//!
//! "No memory" is a normal answer: no character, subsystem disabled, an
//! external combat system in charge, or no campaign loaded.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::SidearmsConfig;
use crate::host::{Character, WeaponCatalog};
use crate::memory::WeaponMemory;
use crate::types::CharacterId;

/// Everything the subsystem persists for one campaign.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    /// Weapon memory per character.
    #[serde(default)]
    pub memories: BTreeMap<CharacterId, WeaponMemory>,
}

impl SaveData {
    /// Create empty save data.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Catalog handle shared between the registry and its callers.
pub type SharedCatalog = Arc<dyn WeaponCatalog + Send + Sync>;

/// Lookup-or-create access to weapon memories.
pub struct Registry {
    config: SidearmsConfig,
    catalog: SharedCatalog,
    save_data: Option<SaveData>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("config", &self.config)
            .field("save_data", &self.save_data)
            .finish_non_exhaustive()
    }
}

impl Registry {
    /// Create a registry with no campaign loaded.
    #[must_use]
    pub fn new(config: SidearmsConfig, catalog: SharedCatalog) -> Self {
        Self {
            config,
            catalog,
            save_data: None,
        }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &SidearmsConfig {
        &self.config
    }

    /// The catalog used for classification and repair.
    #[must_use]
    pub fn catalog(&self) -> &(dyn WeaponCatalog + Send + Sync) {
        self.catalog.as_ref()
    }

    /// A clone of the shared catalog handle.
    #[must_use]
    pub fn shared_catalog(&self) -> SharedCatalog {
        Arc::clone(&self.catalog)
    }

    // ------------------------------------------------------------------
    // Campaign lifecycle
    // ------------------------------------------------------------------

    /// Begin a campaign with no memories.
    pub fn start_new_campaign(&mut self) {
        self.load_campaign(SaveData::new());
    }

    /// Begin a campaign from loaded save data, replacing any current one.
    ///
    /// Loaded memories are repaired lazily, on their first lookup.
    pub fn load_campaign(&mut self, save: SaveData) {
        info!(memories = save.memories.len(), "Sidearms campaign loaded");
        self.save_data = Some(save);
    }

    /// End the campaign, returning its save data.
    pub fn unload_campaign(&mut self) -> Option<SaveData> {
        let save = self.save_data.take();
        if let Some(save) = &save {
            info!(memories = save.memories.len(), "Sidearms campaign unloaded");
        }
        save
    }

    /// Current save data, for persisting mid-campaign.
    #[must_use]
    pub fn save_data(&self) -> Option<&SaveData> {
        self.save_data.as_ref()
    }

    /// Whether lookups can return memories right now.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.config.is_active() && self.save_data.is_some()
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    /// The weapon memory of `character`, created if missing.
    ///
    /// A new memory remembers what the character carries when
    /// `fill_existing_if_creating` is set. An existing memory gets its
    /// one-shot repair pass before being returned.
    ///
    /// A freshly filled memory is not repaired yet: carried weapons that do
    /// not resolve stay remembered until the next lookup repairs it.
    pub fn memory_for_character(
        &mut self,
        character: Option<&dyn Character>,
        fill_existing_if_creating: bool,
    ) -> Option<&mut WeaponMemory> {
        let character = character?;
        if !self.config.is_active() {
            return None;
        }
        let catalog = self.catalog.as_ref();
        let save = self.save_data.as_mut()?;

        match save.memories.entry(character.id()) {
            Entry::Occupied(entry) => {
                let memory = entry.into_mut();
                let report = memory.null_checks(character, catalog);
                if !report.is_clean() {
                    debug!(character = %character.id(), ?report, "Repaired loaded weapon memory");
                }
                Some(memory)
            }
            Entry::Vacant(entry) => Some(entry.insert(WeaponMemory::new(
                character,
                fill_existing_if_creating,
                &self.config.defaults,
                catalog,
            ))),
        }
    }

    /// Read a memory without creating or repairing it.
    #[must_use]
    pub fn peek(&self, id: CharacterId) -> Option<&WeaponMemory> {
        self.save_data.as_ref()?.memories.get(&id)
    }

    /// Drop the memory of a character that left the simulation for good.
    pub fn forget_character(&mut self, id: CharacterId) -> Option<WeaponMemory> {
        let removed = self.save_data.as_mut()?.memories.remove(&id);
        if removed.is_some() {
            debug!(character = %id, "Forgot weapon memory");
        }
        removed
    }

    /// Number of memories in the current campaign.
    #[must_use]
    pub fn len(&self) -> usize {
        self.save_data.as_ref().map_or(0, |s| s.memories.len())
    }

    /// Whether the current campaign has no memories.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// SharedRegistry
// ---------------------------------------------------------------------------

/// A [`Registry`] behind one exclusive lock, for hosts that touch it from
/// more than one thread. Lookup-or-create and the caller's work happen under
/// the same lock.
#[derive(Debug, Clone)]
pub struct SharedRegistry {
    inner: Arc<Mutex<Registry>>,
}

impl SharedRegistry {
    /// Wrap a registry.
    #[must_use]
    pub fn new(registry: Registry) -> Self {
        Self {
            inner: Arc::new(Mutex::new(registry)),
        }
    }

    /// Run `f` on the memory of `character`, if one is available.
    pub fn with_memory<R>(
        &self,
        character: Option<&dyn Character>,
        fill_existing_if_creating: bool,
        f: impl FnOnce(&mut WeaponMemory, &dyn WeaponCatalog) -> R,
    ) -> Option<R> {
        let mut registry = self.inner.lock();
        let catalog = registry.shared_catalog();
        let memory = registry.memory_for_character(character, fill_existing_if_creating)?;
        Some(f(memory, &*catalog))
    }

    /// Lock the registry for lifecycle operations.
    pub fn lock(&self) -> MutexGuard<'_, Registry> {
        self.inner.lock()
    }
}
