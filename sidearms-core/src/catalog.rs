//! In-memory weapon definition catalog.
//!
//! [`DefCatalog`] is the stock [`WeaponCatalog`]: a table of weapon
//! definitions with their kind and the materials they may be made from.
//! Hosts can fill it from their own def database or load it from TOML:
//!
//! ```toml
//! [weapons.Gun_Revolver]
//! kind = "ranged"
//!
//! [weapons.MeleeWeapon_Knife]
//! kind = "melee"
//! materials = ["Steel", "Plasteel"]
//! ```

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SidearmsError};
use crate::host::WeaponCatalog;
use crate::types::{DefKey, MaterialKey, WeaponIdentity, WeaponKind};

/// A weapon definition as the catalog knows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponDef {
    /// Ranged or melee.
    pub kind: WeaponKind,
    /// Materials this definition can be made from. Empty for non-stuffable
    /// weapons.
    #[serde(default)]
    pub materials: BTreeSet<MaterialKey>,
}

/// Table of known weapon definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefCatalog {
    #[serde(default)]
    weapons: BTreeMap<DefKey, WeaponDef>,
}

impl DefCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a catalog from a TOML string.
    ///
    /// # Errors
    /// Returns `SidearmsError::Config` if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| SidearmsError::Config(e.to_string()))
    }

    /// Load a catalog from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Register (or replace) a weapon definition.
    pub fn register<I, M>(&mut self, def: impl Into<String>, kind: WeaponKind, materials: I)
    where
        I: IntoIterator<Item = M>,
        M: Into<String>,
    {
        let materials = materials.into_iter().map(MaterialKey::new).collect();
        self.weapons
            .insert(DefKey::new(def), WeaponDef { kind, materials });
    }

    /// Builder-style [`DefCatalog::register`].
    #[must_use]
    pub fn with_weapon<I, M>(mut self, def: impl Into<String>, kind: WeaponKind, materials: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<String>,
    {
        self.register(def, kind, materials);
        self
    }

    /// Drop a definition, e.g. when the content that provided it is unloaded.
    pub fn remove(&mut self, def: &str) -> Option<WeaponDef> {
        self.weapons.remove(&DefKey::new(def))
    }

    /// Look up a definition.
    #[must_use]
    pub fn get(&self, def: &DefKey) -> Option<&WeaponDef> {
        self.weapons.get(def)
    }

    /// Number of registered definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.weapons.len()
    }

    /// Whether no definitions are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weapons.is_empty()
    }
}

impl WeaponCatalog for DefCatalog {
    fn classify(&self, weapon: &WeaponIdentity) -> Result<WeaponKind> {
        let def = self
            .weapons
            .get(&weapon.def)
            .ok_or_else(|| SidearmsError::UnknownWeaponDef(weapon.def.0.clone()))?;

        if let Some(material) = &weapon.material {
            if !def.materials.contains(material) {
                return Err(SidearmsError::UnknownMaterial {
                    def: weapon.def.0.clone(),
                    material: material.0.clone(),
                });
            }
        }

        Ok(def.kind)
    }
}
