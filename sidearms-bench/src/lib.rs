//! Shared fixtures for the sidearms benchmark suite.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]

use std::sync::Arc;

use sidearms_core::catalog::DefCatalog;
use sidearms_core::config::SidearmsConfig;
use sidearms_core::host::PawnSnapshot;
use sidearms_core::registry::Registry;
use sidearms_core::types::{WeaponIdentity, WeaponKind};

/// Ranged weapon defs in the bench catalog.
pub const RANGED: [&str; 4] = ["Gun_Revolver", "Gun_Autopistol", "Gun_BoltActionRifle", "Gun_ChargeRifle"];
/// Melee weapon defs in the bench catalog.
pub const MELEE: [&str; 3] = ["MeleeWeapon_Knife", "MeleeWeapon_Club", "MeleeWeapon_LongSword"];
/// Materials every melee def accepts.
pub const MATERIALS: [&str; 3] = ["Steel", "Plasteel", "WoodLog"];

/// A catalog with every bench weapon registered.
#[must_use]
pub fn catalog() -> DefCatalog {
    let mut catalog = DefCatalog::new();
    for def in RANGED {
        catalog.register(def, WeaponKind::Ranged, Vec::<String>::new());
    }
    for def in MELEE {
        catalog.register(def, WeaponKind::Melee, MATERIALS);
    }
    catalog
}

/// The `i`-th weapon in a fixed rotation over the catalog.
#[must_use]
pub fn weapon(i: usize) -> WeaponIdentity {
    if i % 2 == 0 {
        WeaponIdentity::new(RANGED[i / 2 % RANGED.len()])
    } else {
        WeaponIdentity::with_material(MELEE[i / 2 % MELEE.len()], MATERIALS[i % MATERIALS.len()])
    }
}

/// A colonist wielding one weapon and carrying `sidearms` more.
#[must_use]
pub fn armed_colonist(id: i64, sidearms: usize) -> PawnSnapshot {
    (1..=sidearms).fold(
        PawnSnapshot::colonist(id, format!("Colonist {id}")).wielding(weapon(0)),
        |pawn, i| pawn.carrying(weapon(i)),
    )
}

/// A registry with a running campaign and `characters` populated memories.
#[must_use]
pub fn populated_registry(characters: i64, sidearms: usize) -> Registry {
    let mut registry = Registry::new(SidearmsConfig::default(), Arc::new(catalog()));
    registry.start_new_campaign();
    for id in 0..characters {
        let pawn = armed_colonist(id, sidearms);
        let _ = registry.memory_for_character(Some(&pawn), true);
    }
    registry
}
