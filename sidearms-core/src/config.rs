//! Configuration for the sidearms subsystem.
//!
//! Maps directly to `sidearms.toml`. Every field has a serde default, so an
//! empty file yields [`SidearmsConfig::default`].

use serde::{Deserialize, Serialize};

use crate::types::{FactionRole, PrimaryWeaponMode};

/// Top-level sidearms configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SidearmsConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Default primary weapon policy per faction role.
    #[serde(default)]
    pub defaults: WeaponModeDefaults,
    /// Compatibility switches for other combat systems.
    #[serde(default)]
    pub compat: CompatConfig,
    /// Save store settings.
    #[serde(default)]
    pub persistence: PersistenceConfig,
}

impl SidearmsConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `SidearmsError::Config` if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> crate::error::Result<Self> {
        toml::from_str(toml_str).map_err(|e| crate::SidearmsError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Whether weapon memories should be handed out at all.
    ///
    /// False when the subsystem is switched off or an incompatible combat
    /// system has taken over weapon selection.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.general.enabled && !self.compat.combat_override_active
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General system settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Whether the sidearms subsystem is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Emit logs as JSON lines instead of human-readable text.
    #[serde(default)]
    pub json_logs: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

/// Primary weapon mode given to freshly created memories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponModeDefaults {
    /// Mode for colonists.
    #[serde(default = "default_colonist_mode")]
    pub colonist_weapon_mode: PrimaryWeaponMode,
    /// Mode for everyone else.
    #[serde(default = "default_npc_mode")]
    pub npc_weapon_mode: PrimaryWeaponMode,
}

impl WeaponModeDefaults {
    /// The configured mode for `role`, possibly `ByGenerated`.
    #[must_use]
    pub fn mode_for(&self, role: FactionRole) -> PrimaryWeaponMode {
        match role {
            FactionRole::Colonist => self.colonist_weapon_mode,
            FactionRole::Npc => self.npc_weapon_mode,
        }
    }
}

impl Default for WeaponModeDefaults {
    fn default() -> Self {
        Self {
            colonist_weapon_mode: PrimaryWeaponMode::BySkill,
            npc_weapon_mode: PrimaryWeaponMode::ByGenerated,
        }
    }
}

/// Compatibility with other combat systems.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompatConfig {
    /// An external combat overhaul owns weapon selection; every registry
    /// lookup answers "no memory".
    #[serde(default)]
    pub combat_override_active: bool,
}

/// Save store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Enable SQLite WAL mode.
    #[serde(default = "default_true")]
    pub wal_mode: bool,
    /// Store a CRC-32 of each record and verify it on load.
    #[serde(default = "default_true")]
    pub checksum_enabled: bool,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            wal_mode: true,
            checksum_enabled: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_true() -> bool { true }
fn default_log_level() -> String { "info".to_string() }
fn default_colonist_mode() -> PrimaryWeaponMode { PrimaryWeaponMode::BySkill }
fn default_npc_mode() -> PrimaryWeaponMode { PrimaryWeaponMode::ByGenerated }
