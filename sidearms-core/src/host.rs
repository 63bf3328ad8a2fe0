//! Interfaces to the host simulation.
//!
//! The weapon memory never owns characters or weapon definitions. It reads
//! them through these traits, which a host implements over its own entity
//! model.

use crate::error::Result;
use crate::types::{CharacterId, FactionRole, WeaponIdentity, WeaponKind};

/// Read-only view of a character as seen by the weapon memory.
pub trait Character {
    /// Stable identifier used as the registry key.
    fn id(&self) -> CharacterId;

    /// Display label, used only in diagnostics.
    fn label(&self) -> &str;

    /// Whether the character is in drafted (combat-ready) mode.
    fn is_drafted(&self) -> bool;

    /// Whether the character is dead.
    fn is_dead(&self) -> bool {
        false
    }

    /// Faction role, selects the default primary weapon mode.
    fn faction_role(&self) -> FactionRole;

    /// The weapon type currently in the primary equipment slot.
    fn primary(&self) -> Option<WeaponIdentity>;

    /// Every weapon the character carries, the primary included.
    fn carried_weapons(&self) -> Vec<WeaponIdentity>;
}

/// Resolves weapon identities against the host's loaded definitions.
pub trait WeaponCatalog {
    /// Classify a weapon identity.
    ///
    /// # Errors
    /// Fails when the definition or the material no longer exists, which
    /// marks the identity as malformed.
    fn classify(&self, weapon: &WeaponIdentity) -> Result<WeaponKind>;

    /// Whether `weapon` still resolves.
    fn resolves(&self, weapon: &WeaponIdentity) -> bool {
        self.classify(weapon).is_ok()
    }

    /// Classification, or `None` when the weapon does not resolve.
    fn kind_of(&self, weapon: &WeaponIdentity) -> Option<WeaponKind> {
        self.classify(weapon).ok()
    }
}

/// An owned copy of the character state the weapon memory reads.
///
/// Hosts whose entities live inside an ECS can copy the relevant parts out
/// once per call site instead of implementing [`Character`] on a borrow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PawnSnapshot {
    /// Character identifier.
    pub id: CharacterId,
    /// Display label.
    pub label: String,
    /// Drafted status.
    pub drafted: bool,
    /// Whether the character is dead.
    pub dead: bool,
    /// Faction role.
    pub role: FactionRole,
    /// Weapon in the primary slot.
    pub primary: Option<WeaponIdentity>,
    /// Weapons carried in the inventory, excluding the primary.
    pub inventory: Vec<WeaponIdentity>,
}

impl PawnSnapshot {
    /// A living, undrafted, unarmed colonist with an empty inventory.
    #[must_use]
    pub fn colonist(id: i64, label: impl Into<String>) -> Self {
        Self {
            id: CharacterId(id),
            label: label.into(),
            drafted: false,
            dead: false,
            role: FactionRole::Colonist,
            primary: None,
            inventory: Vec::new(),
        }
    }

    /// Same as [`PawnSnapshot::colonist`] but for a non-colonist.
    #[must_use]
    pub fn npc(id: i64, label: impl Into<String>) -> Self {
        Self {
            role: FactionRole::Npc,
            ..Self::colonist(id, label)
        }
    }

    /// Builder-style setter for the primary weapon.
    #[must_use]
    pub fn wielding(mut self, weapon: WeaponIdentity) -> Self {
        self.primary = Some(weapon);
        self
    }

    /// Builder-style setter adding an inventory weapon.
    #[must_use]
    pub fn carrying(mut self, weapon: WeaponIdentity) -> Self {
        self.inventory.push(weapon);
        self
    }

    /// Builder-style setter for drafted status.
    #[must_use]
    pub fn drafted(mut self, drafted: bool) -> Self {
        self.drafted = drafted;
        self
    }
}

impl Character for PawnSnapshot {
    fn id(&self) -> CharacterId {
        self.id
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn is_drafted(&self) -> bool {
        self.drafted
    }

    fn is_dead(&self) -> bool {
        self.dead
    }

    fn faction_role(&self) -> FactionRole {
        self.role
    }

    fn primary(&self) -> Option<WeaponIdentity> {
        self.primary.clone()
    }

    fn carried_weapons(&self) -> Vec<WeaponIdentity> {
        self.primary
            .iter()
            .chain(self.inventory.iter())
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carried_weapons_include_primary_first() {
        let pawn = PawnSnapshot::colonist(1, "Engie")
            .wielding(WeaponIdentity::new("Gun_Revolver"))
            .carrying(WeaponIdentity::with_material("MeleeWeapon_Knife", "Steel"));

        let carried = pawn.carried_weapons();
        assert_eq!(carried.len(), 2);
        assert_eq!(carried[0], WeaponIdentity::new("Gun_Revolver"));
    }

    #[test]
    fn npc_builder_sets_role() {
        let pawn = PawnSnapshot::npc(7, "Raider");
        assert_eq!(pawn.faction_role(), FactionRole::Npc);
        assert!(!pawn.is_drafted());
        assert!(pawn.carried_weapons().is_empty());
    }
}
