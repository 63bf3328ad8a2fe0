//! Systems that route equipment events and player choices into weapon
//! memories.
//!
//! Each entry point looks up the character's memory through the
//! [`Registry`] and reports `false` when none is available (no campaign
//! loaded, subsystem disabled, or a combat overhaul in charge).

use sidearms_core::host::Character;
use sidearms_core::registry::Registry;
use tracing::{debug, trace};

use crate::events::{PlayerChoice, SidearmEvent};

/// Feed one equipment event into the character's weapon memory.
///
/// A memory created here starts empty: the event itself already accounts
/// for the weapon that caused it.
pub fn apply_event(registry: &mut Registry, character: &dyn Character, event: &SidearmEvent) -> bool {
    let catalog = registry.shared_catalog();
    let Some(memory) = registry.memory_for_character(Some(character), false) else {
        trace!(character = %character.id(), event = event.name(), "No weapon memory available");
        return false;
    };

    match event {
        SidearmEvent::PrimaryEquipped { weapon } => memory.inform_of_added_primary(weapon, &*catalog),
        SidearmEvent::SidearmPickedUp { weapon } => memory.inform_of_added_sidearm(weapon),
        SidearmEvent::SidearmDropped { weapon, intentional } => {
            memory.inform_of_dropped_sidearm(weapon, *intentional);
        }
        SidearmEvent::Undrafted => memory.inform_of_undraft(),
    }

    debug!(character = %character.id(), event = event.name(), "Applied sidearm event");
    true
}

/// Feed a batch of events in order. Returns how many reached a memory.
pub fn apply_events(
    registry: &mut Registry,
    character: &dyn Character,
    events: &[SidearmEvent],
) -> usize {
    let mut applied = 0;
    for event in events {
        if apply_event(registry, character, event) {
            applied += 1;
        }
    }
    applied
}

/// Record a player's weapon choice for the character.
///
/// A memory created here remembers what the character already carries.
pub fn apply_choice(registry: &mut Registry, character: &dyn Character, choice: &PlayerChoice) -> bool {
    let catalog = registry.shared_catalog();
    let Some(memory) = registry.memory_for_character(Some(character), true) else {
        trace!(character = %character.id(), choice = choice.name(), "No weapon memory available");
        return false;
    };

    match choice {
        PlayerChoice::ForceUnarmed { drafted } => memory.set_unarmed_as_forced(*drafted),
        PlayerChoice::ForceWeapon { weapon, drafted } => {
            memory.set_weapon_as_forced(weapon.clone(), *drafted);
        }
        PlayerChoice::ClearForce { drafted } => memory.unset_forced_weapon(*drafted),
        PlayerChoice::PreferRanged { weapon } => {
            memory.set_ranged_weapon_type_as_default(weapon.clone(), &*catalog);
        }
        PlayerChoice::PreferMelee { weapon } => {
            memory.set_melee_weapon_type_as_preferred(weapon.clone(), &*catalog);
        }
        PlayerChoice::PreferUnarmed => memory.set_unarmed_as_preferred_melee(&*catalog),
        PlayerChoice::ClearRangedPreference => memory.unset_ranged_weapon_default(),
        PlayerChoice::ClearMeleePreference => memory.unset_melee_weapon_preference(),
        PlayerChoice::SetPrimaryMode { mode } => {
            memory.set_primary_weapon_mode(*mode, character, &*catalog);
        }
    }

    debug!(character = %character.id(), choice = choice.name(), "Recorded player weapon choice");
    true
}

/// Whether the character's current weapon is a deliberate choice.
///
/// False when no memory is available.
pub fn is_current_weapon_forced(
    registry: &mut Registry,
    character: &dyn Character,
    include_preferences: bool,
) -> bool {
    let catalog = registry.shared_catalog();
    registry
        .memory_for_character(Some(character), true)
        .is_some_and(|memory| memory.is_current_weapon_forced(character, &*catalog, include_preferences))
}
