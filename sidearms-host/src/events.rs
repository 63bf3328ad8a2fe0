//! Equipment events and player choices.
//!
//! Events describe what happened to a character's equipment; choices are
//! explicit orders from the player. Both are plain data so the host can
//! queue, log, or replay them before they reach a weapon memory.

use serde::{Deserialize, Serialize};
use sidearms_core::types::{PrimaryWeaponMode, WeaponIdentity};

/// Something that happened to a character's equipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SidearmEvent {
    /// A weapon was equipped as the primary.
    PrimaryEquipped {
        /// The equipped weapon.
        weapon: WeaponIdentity,
    },
    /// A weapon was added to the inventory as a sidearm.
    SidearmPickedUp {
        /// The picked-up weapon.
        weapon: WeaponIdentity,
    },
    /// A sidearm left the inventory.
    SidearmDropped {
        /// The dropped weapon.
        weapon: WeaponIdentity,
        /// Dropped on purpose (player order) rather than lost or destroyed.
        intentional: bool,
    },
    /// The character left drafted mode.
    Undrafted,
}

impl SidearmEvent {
    /// The weapon this event concerns, if any.
    #[must_use]
    pub fn weapon(&self) -> Option<&WeaponIdentity> {
        match self {
            Self::PrimaryEquipped { weapon }
            | Self::SidearmPickedUp { weapon }
            | Self::SidearmDropped { weapon, .. } => Some(weapon),
            Self::Undrafted => None,
        }
    }

    /// Short name used in log fields.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::PrimaryEquipped { .. } => "primary_equipped",
            Self::SidearmPickedUp { .. } => "sidearm_picked_up",
            Self::SidearmDropped { .. } => "sidearm_dropped",
            Self::Undrafted => "undrafted",
        }
    }
}

/// An explicit player order about which weapon to use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerChoice {
    /// Force fighting unarmed.
    ForceUnarmed {
        /// Applies to the drafted context.
        drafted: bool,
    },
    /// Force a specific weapon type.
    ForceWeapon {
        /// The forced weapon.
        weapon: WeaponIdentity,
        /// Applies to the drafted context.
        drafted: bool,
    },
    /// Clear whichever force is set.
    ClearForce {
        /// Applies to the drafted context.
        drafted: bool,
    },
    /// Make a ranged weapon type the default.
    PreferRanged {
        /// The preferred weapon.
        weapon: WeaponIdentity,
    },
    /// Make a melee weapon type the preference.
    PreferMelee {
        /// The preferred weapon.
        weapon: WeaponIdentity,
    },
    /// Prefer fighting unarmed in melee.
    PreferUnarmed,
    /// Drop the default ranged weapon.
    ClearRangedPreference,
    /// Drop the melee preference, unarmed or weapon.
    ClearMeleePreference,
    /// Change the primary weapon policy.
    SetPrimaryMode {
        /// The new mode; `ByGenerated` is resolved from current equipment.
        mode: PrimaryWeaponMode,
    },
}

impl PlayerChoice {
    /// Short name used in log fields.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::ForceUnarmed { .. } => "force_unarmed",
            Self::ForceWeapon { .. } => "force_weapon",
            Self::ClearForce { .. } => "clear_force",
            Self::PreferRanged { .. } => "prefer_ranged",
            Self::PreferMelee { .. } => "prefer_melee",
            Self::PreferUnarmed => "prefer_unarmed",
            Self::ClearRangedPreference => "clear_ranged_preference",
            Self::ClearMeleePreference => "clear_melee_preference",
            Self::SetPrimaryMode { .. } => "set_primary_mode",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_weapon_accessor() {
        let knife = WeaponIdentity::new("MeleeWeapon_Knife");
        let event = SidearmEvent::SidearmDropped {
            weapon: knife.clone(),
            intentional: true,
        };
        assert_eq!(event.weapon(), Some(&knife));
        assert_eq!(event.name(), "sidearm_dropped");
        assert!(SidearmEvent::Undrafted.weapon().is_none());
    }

    #[test]
    fn choices_serialize_with_variant_tags() {
        let choice = PlayerChoice::ForceWeapon {
            weapon: WeaponIdentity::new("Gun_Revolver"),
            drafted: true,
        };
        let json = serde_json::to_value(&choice).expect("serialize");
        assert_eq!(json["ForceWeapon"]["drafted"], true);
        assert_eq!(json["ForceWeapon"]["weapon"]["def"], "Gun_Revolver");

        let back: PlayerChoice = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, choice);
    }
}
