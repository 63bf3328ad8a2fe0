//! Core type definitions for the sidearms weapon memory.
//!
//! All persisted types are plain values with structural equality; the
//! serialized shapes match the save layout hosts already have on disk.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Identity Types
// ---------------------------------------------------------------------------

/// Stable identifier of a character in the host simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharacterId(pub i64);

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Key of a weapon definition (e.g. `"Gun_Revolver"`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DefKey(pub String);

impl DefKey {
    /// Create a definition key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The raw key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DefKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Key of a material ("stuff") definition (e.g. `"Steel"`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialKey(pub String);

impl MaterialKey {
    /// Create a material key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The raw key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MaterialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A weapon type: its definition plus the material it is made from.
///
/// Identifies a kind of weapon, never a particular item. Two identities
/// are equal iff definition and material match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeaponIdentity {
    /// Weapon definition key.
    pub def: DefKey,
    /// Material key, `None` for weapons not made from stuff.
    #[serde(rename = "stuff", default, skip_serializing_if = "Option::is_none")]
    pub material: Option<MaterialKey>,
}

impl WeaponIdentity {
    /// A weapon that is not made from any material.
    #[must_use]
    pub fn new(def: impl Into<String>) -> Self {
        Self {
            def: DefKey::new(def),
            material: None,
        }
    }

    /// A weapon made from `material`.
    #[must_use]
    pub fn with_material(def: impl Into<String>, material: impl Into<String>) -> Self {
        Self {
            def: DefKey::new(def),
            material: Some(MaterialKey::new(material)),
        }
    }
}

impl fmt::Display for WeaponIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.material {
            Some(material) => write!(f, "{} ({})", self.def, material),
            None => write!(f, "{}", self.def),
        }
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Combat category of a weapon definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponKind {
    /// Fires projectiles.
    Ranged,
    /// Used in close combat.
    Melee,
}

/// Which faction role a character plays; selects the default primary mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FactionRole {
    /// A player-controlled colonist.
    Colonist,
    /// Any other character (raiders, traders, visitors).
    Npc,
}

/// Policy for choosing ranged versus melee when nothing forces the choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PrimaryWeaponMode {
    /// Prefer a ranged primary.
    Ranged,
    /// Prefer a melee primary.
    Melee,
    /// Decide by the character's skills.
    #[default]
    BySkill,
    /// Follow whatever the character was generated with. Resolved into one
    /// of the other modes when a memory is created.
    ByGenerated,
}

impl PrimaryWeaponMode {
    /// Resolve `ByGenerated` from the kind of the currently equipped weapon.
    ///
    /// Other modes are returned unchanged. With nothing equipped, or an
    /// equipped weapon that cannot be classified, falls back to `BySkill`.
    #[must_use]
    pub fn resolve_generated(self, equipped: Option<WeaponKind>) -> Self {
        match self {
            Self::ByGenerated => match equipped {
                Some(WeaponKind::Ranged) => Self::Ranged,
                Some(WeaponKind::Melee) => Self::Melee,
                None => Self::BySkill,
            },
            other => other,
        }
    }
}

impl fmt::Display for PrimaryWeaponMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ranged => write!(f, "Ranged"),
            Self::Melee => write!(f, "Melee"),
            Self::BySkill => write!(f, "BySkill"),
            Self::ByGenerated => write!(f, "ByGenerated"),
        }
    }
}

// ---------------------------------------------------------------------------
// Overrides
// ---------------------------------------------------------------------------

/// A weapon choice that is either "no weapon" or a specific weapon type.
///
/// Replaces a pair of "unarmed" flag and weapon field, so both can never be
/// set at once.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WeaponOverride {
    /// Fight with bare hands.
    Unarmed,
    /// Use this weapon type.
    Weapon(WeaponIdentity),
}

impl WeaponOverride {
    /// The weapon, if this override names one.
    #[must_use]
    pub fn weapon(&self) -> Option<&WeaponIdentity> {
        match self {
            Self::Unarmed => None,
            Self::Weapon(weapon) => Some(weapon),
        }
    }

    /// Whether this override is `Unarmed`.
    #[must_use]
    pub fn is_unarmed(&self) -> bool {
        matches!(self, Self::Unarmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_equality_is_structural() {
        let a = WeaponIdentity::with_material("MeleeWeapon_Knife", "Steel");
        let b = WeaponIdentity::with_material("MeleeWeapon_Knife", "Steel");
        let c = WeaponIdentity::with_material("MeleeWeapon_Knife", "Plasteel");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, WeaponIdentity::new("MeleeWeapon_Knife"));
    }

    #[test]
    fn identity_serializes_with_stuff_key() {
        let knife = WeaponIdentity::with_material("MeleeWeapon_Knife", "Steel");
        let json = serde_json::to_string(&knife).expect("serialize");
        assert_eq!(json, r#"{"def":"MeleeWeapon_Knife","stuff":"Steel"}"#);

        let revolver: WeaponIdentity =
            serde_json::from_str(r#"{"def":"Gun_Revolver"}"#).expect("deserialize");
        assert_eq!(revolver, WeaponIdentity::new("Gun_Revolver"));
    }

    #[test]
    fn by_generated_resolves_from_equipped_kind() {
        let mode = PrimaryWeaponMode::ByGenerated;
        assert_eq!(mode.resolve_generated(Some(WeaponKind::Ranged)), PrimaryWeaponMode::Ranged);
        assert_eq!(mode.resolve_generated(Some(WeaponKind::Melee)), PrimaryWeaponMode::Melee);
        assert_eq!(mode.resolve_generated(None), PrimaryWeaponMode::BySkill);
        assert_eq!(
            PrimaryWeaponMode::Melee.resolve_generated(Some(WeaponKind::Ranged)),
            PrimaryWeaponMode::Melee
        );
    }

    #[test]
    fn override_accessors() {
        let pistol = WeaponIdentity::new("Gun_Autopistol");
        assert!(WeaponOverride::Unarmed.is_unarmed());
        assert_eq!(WeaponOverride::Unarmed.weapon(), None);
        assert_eq!(WeaponOverride::Weapon(pistol.clone()).weapon(), Some(&pistol));
    }

    #[test]
    fn character_id_is_transparent() {
        let json = serde_json::to_string(&CharacterId(42)).expect("serialize");
        assert_eq!(json, "42");
    }
}
