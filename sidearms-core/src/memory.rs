//! Per-character weapon memory.
//!
//! A [`WeaponMemory`] remembers, for one character:
//!
//! - **Forced** choices — hard overrides, one for the undrafted context and
//!   one for the drafted context. Each is unarmed or a specific weapon.
//! - **Preferences** — a preferred melee choice (unarmed or a weapon) and a
//!   default ranged weapon, consulted when nothing is forced.
//! - **Remembered weapons** — every weapon instance the character is known
//!   to carry as a sidearm, in acquisition order, duplicates included.
//!
//! ```text
//!  equip / pick up / drop / undraft           player choices
//!          │                                        │
//!          ▼                                        ▼
//!  ┌───────────────┐   forget last instance   ┌──────────────┐
//!  │  remembered   │ ───────────────────────▶ │ preferences  │
//!  └───────────────┘                          └──────┬───────┘
//!                                                    │ supersede stale
//!                                                    ▼
//!                                             ┌──────────────┐
//!                                             │ forced (x2)  │
//!                                             └──────────────┘
//! ```
//!
//! Memories come back from save data possibly referring to weapon
//! definitions that no longer exist. [`WeaponMemory::null_checks`] is the
//! one-shot repair pass that drops those references before first use.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::WeaponModeDefaults;
use crate::host::{Character, WeaponCatalog};
use crate::types::{CharacterId, PrimaryWeaponMode, WeaponIdentity, WeaponKind, WeaponOverride};

// ---------------------------------------------------------------------------
// WeaponMemory
// ---------------------------------------------------------------------------

/// Weapon preferences and remembered sidearms of a single character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WeaponMemoryRecord", into = "WeaponMemoryRecord")]
pub struct WeaponMemory {
    owner: Option<CharacterId>,
    /// `None` only when save data lacked the list; the repair pass rebuilds it.
    remembered: Option<Vec<WeaponIdentity>>,
    forced: Option<WeaponOverride>,
    forced_while_drafted: Option<WeaponOverride>,
    preferred_melee: Option<WeaponOverride>,
    default_ranged: Option<WeaponIdentity>,
    primary_weapon_mode: PrimaryWeaponMode,
    null_checked: bool,
}

impl WeaponMemory {
    /// Create a memory for `owner`.
    ///
    /// With `fill_existing`, every weapon the owner currently carries is
    /// remembered. The primary weapon mode comes from `defaults` for the
    /// owner's faction role, with `ByGenerated` resolved from the equipped
    /// weapon.
    #[must_use]
    pub fn new(
        owner: &dyn Character,
        fill_existing: bool,
        defaults: &WeaponModeDefaults,
        catalog: &dyn WeaponCatalog,
    ) -> Self {
        let remembered = if fill_existing {
            owner.carried_weapons()
        } else {
            Vec::new()
        };
        let primary_weapon_mode = defaults
            .mode_for(owner.faction_role())
            .resolve_generated(equipped_kind(owner, catalog));

        debug!(
            character = %owner.id(),
            label = owner.label(),
            remembered = remembered.len(),
            mode = %primary_weapon_mode,
            "Created weapon memory"
        );

        Self {
            owner: Some(owner.id()),
            remembered: Some(remembered),
            forced: None,
            forced_while_drafted: None,
            preferred_melee: None,
            default_ranged: None,
            primary_weapon_mode,
            null_checked: false,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// The character this memory belongs to, unset right after loading
    /// inconsistent save data.
    #[must_use]
    pub fn owner(&self) -> Option<CharacterId> {
        self.owner
    }

    /// Remembered weapon instances in acquisition order.
    #[must_use]
    pub fn remembered_weapons(&self) -> &[WeaponIdentity] {
        self.remembered.as_deref().unwrap_or(&[])
    }

    /// How many instances of `weapon` are remembered.
    #[must_use]
    pub fn remembered_count(&self, weapon: &WeaponIdentity) -> usize {
        self.remembered_weapons()
            .iter()
            .filter(|w| *w == weapon)
            .count()
    }

    /// The forced override for the drafted or undrafted context.
    #[must_use]
    pub fn forced_override(&self, drafted: bool) -> Option<&WeaponOverride> {
        self.forced_slot(drafted).as_ref()
    }

    /// Whether unarmed is forced in the given context.
    #[must_use]
    pub fn forced_unarmed(&self, drafted: bool) -> bool {
        self.forced_override(drafted)
            .is_some_and(WeaponOverride::is_unarmed)
    }

    /// The forced weapon in the given context.
    #[must_use]
    pub fn forced_weapon(&self, drafted: bool) -> Option<&WeaponIdentity> {
        self.forced_override(drafted).and_then(WeaponOverride::weapon)
    }

    /// The preferred melee choice, unarmed or a weapon.
    #[must_use]
    pub fn preferred_melee(&self) -> Option<&WeaponOverride> {
        self.preferred_melee.as_ref()
    }

    /// Whether fighting unarmed is the melee preference.
    #[must_use]
    pub fn preferred_unarmed(&self) -> bool {
        self.preferred_melee
            .as_ref()
            .is_some_and(WeaponOverride::is_unarmed)
    }

    /// The preferred melee weapon.
    #[must_use]
    pub fn preferred_melee_weapon(&self) -> Option<&WeaponIdentity> {
        self.preferred_melee.as_ref().and_then(WeaponOverride::weapon)
    }

    /// The default ranged weapon.
    #[must_use]
    pub fn default_ranged_weapon(&self) -> Option<&WeaponIdentity> {
        self.default_ranged.as_ref()
    }

    /// Ranged-versus-melee policy. Never `ByGenerated` once repaired.
    #[must_use]
    pub fn primary_weapon_mode(&self) -> PrimaryWeaponMode {
        self.primary_weapon_mode
    }

    /// Replace the primary weapon mode. `ByGenerated` is resolved against
    /// the owner's equipped weapon before it is stored.
    pub fn set_primary_weapon_mode(
        &mut self,
        mode: PrimaryWeaponMode,
        owner: &dyn Character,
        catalog: &dyn WeaponCatalog,
    ) {
        self.primary_weapon_mode = mode.resolve_generated(equipped_kind(owner, catalog));
    }

    /// Whether the post-load repair pass still has to run.
    #[must_use]
    pub fn needs_repair(&self) -> bool {
        !self.null_checked
    }

    // ------------------------------------------------------------------
    // Override resolution
    // ------------------------------------------------------------------

    /// Whether the weapon `owner` currently wields (or the lack of one) is a
    /// deliberate choice.
    ///
    /// A drafted character is checked against the drafted override first;
    /// the undrafted override applies in either context. With
    /// `include_preferences`, the melee preference and ranged default also
    /// count. Dead characters never have a forced weapon.
    #[must_use]
    pub fn is_current_weapon_forced(
        &self,
        owner: &dyn Character,
        catalog: &dyn WeaponCatalog,
        include_preferences: bool,
    ) -> bool {
        if owner.is_dead() {
            return false;
        }
        let drafted = owner.is_drafted();

        match owner.primary() {
            None => {
                (drafted && self.forced_unarmed(true))
                    || self.forced_unarmed(false)
                    || (include_preferences && self.preferred_unarmed())
            }
            Some(current) => {
                if (drafted && self.forced_weapon(true) == Some(&current))
                    || self.forced_weapon(false) == Some(&current)
                {
                    return true;
                }
                if !include_preferences {
                    return false;
                }
                match catalog.kind_of(&current) {
                    Some(WeaponKind::Melee) => self.preferred_melee_weapon() == Some(&current),
                    Some(WeaponKind::Ranged) => self.default_ranged.as_ref() == Some(&current),
                    None => false,
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Forced overrides
    // ------------------------------------------------------------------

    /// Force fighting unarmed in the given context.
    pub fn set_unarmed_as_forced(&mut self, drafted: bool) {
        *self.forced_slot_mut(drafted) = Some(WeaponOverride::Unarmed);
    }

    /// Force `weapon` in the given context.
    pub fn set_weapon_as_forced(&mut self, weapon: WeaponIdentity, drafted: bool) {
        *self.forced_slot_mut(drafted) = Some(WeaponOverride::Weapon(weapon));
    }

    /// Lift a forced unarmed choice. Clears the whole override of that
    /// context.
    pub fn unset_unarmed_as_forced(&mut self, drafted: bool) {
        *self.forced_slot_mut(drafted) = None;
    }

    /// Lift a forced weapon. Clears the whole override of that context.
    pub fn unset_forced_weapon(&mut self, drafted: bool) {
        *self.forced_slot_mut(drafted) = None;
    }

    // ------------------------------------------------------------------
    // Preferences
    // ------------------------------------------------------------------

    /// Make `weapon` the default ranged weapon.
    ///
    /// A different ranged weapon forced in the undrafted context is lifted.
    /// The drafted override is left alone.
    pub fn set_ranged_weapon_type_as_default(
        &mut self,
        weapon: WeaponIdentity,
        catalog: &dyn WeaponCatalog,
    ) {
        if self.undrafted_forced_other(&weapon, WeaponKind::Ranged, catalog) {
            self.unset_forced_weapon(false);
        }
        self.default_ranged = Some(weapon);
    }

    /// Make `weapon` the preferred melee weapon.
    ///
    /// A different melee weapon or unarmed forced in the undrafted context
    /// is lifted.
    pub fn set_melee_weapon_type_as_preferred(
        &mut self,
        weapon: WeaponIdentity,
        catalog: &dyn WeaponCatalog,
    ) {
        if self.undrafted_forced_other(&weapon, WeaponKind::Melee, catalog)
            || self.forced_unarmed(false)
        {
            self.unset_forced_weapon(false);
        }
        self.preferred_melee = Some(WeaponOverride::Weapon(weapon));
    }

    /// Prefer fighting unarmed over any melee weapon.
    ///
    /// A melee weapon forced in the undrafted context is lifted.
    pub fn set_unarmed_as_preferred_melee(&mut self, catalog: &dyn WeaponCatalog) {
        self.preferred_melee = Some(WeaponOverride::Unarmed);
        let forced_melee = self
            .forced_weapon(false)
            .is_some_and(|w| catalog.kind_of(w) == Some(WeaponKind::Melee));
        if forced_melee {
            self.unset_forced_weapon(false);
        }
    }

    /// Forget the default ranged weapon.
    pub fn unset_ranged_weapon_default(&mut self) {
        self.default_ranged = None;
    }

    /// Forget the melee preference, unarmed included.
    pub fn unset_melee_weapon_preference(&mut self) {
        self.preferred_melee = None;
    }

    // ------------------------------------------------------------------
    // Event hooks
    // ------------------------------------------------------------------

    /// The character left drafted mode; drafted overrides do not survive it.
    pub fn inform_of_undraft(&mut self) {
        self.forced_while_drafted = None;
    }

    /// A weapon was equipped as primary.
    ///
    /// It is remembered like any sidearm and becomes the standing preference
    /// of its category. A weapon the catalog cannot classify is neither
    /// remembered nor applied, unlike other sidearms, which are recorded
    /// unconditionally; a remembered identity must always resolve.
    pub fn inform_of_added_primary(&mut self, weapon: &WeaponIdentity, catalog: &dyn WeaponCatalog) {
        let kind = match catalog.classify(weapon) {
            Ok(kind) => kind,
            Err(e) => {
                warn!(
                    character = ?self.owner,
                    weapon = %weapon,
                    error = %e,
                    "Equipped primary could not be classified, not remembering it"
                );
                return;
            }
        };

        self.inform_of_added_sidearm(weapon);
        match kind {
            WeaponKind::Ranged => self.set_ranged_weapon_type_as_default(weapon.clone(), catalog),
            WeaponKind::Melee => self.set_melee_weapon_type_as_preferred(weapon.clone(), catalog),
        }
    }

    /// A weapon instance was added to the character's sidearms.
    pub fn inform_of_added_sidearm(&mut self, weapon: &WeaponIdentity) {
        self.remembered
            .get_or_insert_with(Vec::new)
            .push(weapon.clone());
    }

    /// A sidearm left the character's inventory.
    ///
    /// Only intentional drops are forgotten; a weapon lost to destruction
    /// stays remembered so its type is still preferred.
    pub fn inform_of_dropped_sidearm(&mut self, weapon: &WeaponIdentity, intentional: bool) {
        if intentional {
            self.forget_sidearm_memory(weapon);
        }
    }

    /// Forget one remembered instance of `weapon`.
    ///
    /// Once no instance is left, `weapon` also stops being the preferred
    /// melee weapon or default ranged weapon.
    pub fn forget_sidearm_memory(&mut self, weapon: &WeaponIdentity) {
        if let Some(remembered) = self.remembered.as_mut() {
            if let Some(index) = remembered.iter().position(|w| w == weapon) {
                remembered.remove(index);
            }
        }

        if self.remembered_count(weapon) > 0 {
            return;
        }
        if self.preferred_melee_weapon() == Some(weapon) {
            debug!(character = ?self.owner, weapon = %weapon, "Last instance gone, clearing melee preference");
            self.preferred_melee = None;
        }
        if self.default_ranged.as_ref() == Some(weapon) {
            debug!(character = ?self.owner, weapon = %weapon, "Last instance gone, clearing ranged default");
            self.default_ranged = None;
        }
    }

    // ------------------------------------------------------------------
    // Repair pass
    // ------------------------------------------------------------------

    /// Sanitize state after loading. Runs once; later calls return an empty
    /// report without touching anything.
    ///
    /// Reattaches a missing owner, rebuilds a missing remembered list from
    /// what `owner` carries, drops remembered weapons and cleared fields
    /// that no longer resolve, and resolves a persisted `ByGenerated` mode.
    /// Every action is logged as a warning.
    pub fn null_checks(&mut self, owner: &dyn Character, catalog: &dyn WeaponCatalog) -> RepairReport {
        let mut report = RepairReport::default();
        if self.null_checked {
            return report;
        }

        if self.owner.is_none() {
            warn!(
                character = %owner.id(),
                label = owner.label(),
                "Weapon memory did not know which character it belongs to, reattaching"
            );
            self.owner = Some(owner.id());
            report.owner_reattached = true;
        }

        let remembered = self.remembered.get_or_insert_with(|| {
            warn!(
                label = owner.label(),
                "Remembered weapons list was missing, regenerating from carried weapons"
            );
            report.remembered_regenerated = true;
            owner.carried_weapons()
        });
        remembered.retain(|weapon| {
            let resolves = catalog.resolves(weapon);
            if !resolves {
                warn!(
                    label = owner.label(),
                    weapon = %weapon,
                    "A remembered weapon had a missing def or malformed data, removing"
                );
                report.remembered_dropped += 1;
            }
            resolves
        });

        if self.preferred_melee_weapon().is_some_and(|w| !catalog.resolves(w)) {
            warn!(
                label = owner.label(),
                "Melee weapon preference had a missing def or malformed data, removing"
            );
            self.preferred_melee = None;
            report.cleared_fields.push(RepairedField::PreferredMeleeWeapon);
        }
        if self.default_ranged.as_ref().is_some_and(|w| !catalog.resolves(w)) {
            warn!(
                label = owner.label(),
                "Ranged weapon preference had a missing def or malformed data, removing"
            );
            self.default_ranged = None;
            report.cleared_fields.push(RepairedField::DefaultRangedWeapon);
        }
        for (drafted, field) in [
            (false, RepairedField::ForcedWeapon),
            (true, RepairedField::ForcedWeaponWhileDrafted),
        ] {
            if self.forced_weapon(drafted).is_some_and(|w| !catalog.resolves(w)) {
                warn!(
                    label = owner.label(),
                    drafted,
                    "Forced weapon had a missing def or malformed data, removing"
                );
                *self.forced_slot_mut(drafted) = None;
                report.cleared_fields.push(field);
            }
        }

        if self.primary_weapon_mode == PrimaryWeaponMode::ByGenerated {
            let resolved = self
                .primary_weapon_mode
                .resolve_generated(equipped_kind(owner, catalog));
            warn!(
                label = owner.label(),
                resolved = %resolved,
                "Saved primary weapon mode was still ByGenerated, resolving"
            );
            self.primary_weapon_mode = resolved;
            report.generated_mode_resolved = true;
        }

        self.null_checked = true;
        report
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn forced_slot(&self, drafted: bool) -> &Option<WeaponOverride> {
        if drafted {
            &self.forced_while_drafted
        } else {
            &self.forced
        }
    }

    fn forced_slot_mut(&mut self, drafted: bool) -> &mut Option<WeaponOverride> {
        if drafted {
            &mut self.forced_while_drafted
        } else {
            &mut self.forced
        }
    }

    /// Undrafted context forces a weapon of `kind` that is not `weapon`.
    fn undrafted_forced_other(
        &self,
        weapon: &WeaponIdentity,
        kind: WeaponKind,
        catalog: &dyn WeaponCatalog,
    ) -> bool {
        self.forced_weapon(false)
            .is_some_and(|forced| forced != weapon && catalog.kind_of(forced) == Some(kind))
    }
}

fn equipped_kind(owner: &dyn Character, catalog: &dyn WeaponCatalog) -> Option<WeaponKind> {
    owner.primary().and_then(|w| catalog.kind_of(&w))
}

// ---------------------------------------------------------------------------
// Repair report
// ---------------------------------------------------------------------------

/// A single-weapon field the repair pass can clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairedField {
    /// The preferred melee weapon.
    PreferredMeleeWeapon,
    /// The default ranged weapon.
    DefaultRangedWeapon,
    /// The undrafted forced weapon.
    ForcedWeapon,
    /// The drafted forced weapon.
    ForcedWeaponWhileDrafted,
}

/// What a repair pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairReport {
    /// The owner reference was missing and got reattached.
    pub owner_reattached: bool,
    /// The remembered list was missing and got rebuilt.
    pub remembered_regenerated: bool,
    /// Remembered entries dropped for not resolving.
    pub remembered_dropped: usize,
    /// Weapon fields cleared for not resolving.
    pub cleared_fields: Vec<RepairedField>,
    /// A persisted `ByGenerated` mode was resolved.
    pub generated_mode_resolved: bool,
}

impl RepairReport {
    /// Whether the pass changed nothing.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}

// ---------------------------------------------------------------------------
// Save layout
// ---------------------------------------------------------------------------

/// Flat save layout of a [`WeaponMemory`], field for field as hosts store it.
///
/// The two preference keys keep their historical misspelling.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WeaponMemoryRecord {
    #[serde(default)]
    owner: Option<CharacterId>,
    #[serde(default)]
    remembered_weapons: Option<Vec<WeaponIdentity>>,
    #[serde(default)]
    forced_weapon: Option<WeaponIdentity>,
    #[serde(default)]
    forced_unarmed: bool,
    #[serde(default)]
    forced_weapon_while_drafted: Option<WeaponIdentity>,
    #[serde(default)]
    forced_unarmed_while_drafted: bool,
    #[serde(default)]
    preferred_unarmed: bool,
    #[serde(rename = "prefferedRangedWeapon", default)]
    preferred_ranged_weapon: Option<WeaponIdentity>,
    #[serde(rename = "prefferedMeleeWeapon", default)]
    preferred_melee_weapon: Option<WeaponIdentity>,
    #[serde(default)]
    primary_weapon_mode: PrimaryWeaponMode,
}

/// Unarmed wins when a record sets both halves of a pair.
fn override_from_pair(unarmed: bool, weapon: Option<WeaponIdentity>) -> Option<WeaponOverride> {
    if unarmed {
        Some(WeaponOverride::Unarmed)
    } else {
        weapon.map(WeaponOverride::Weapon)
    }
}

fn pair_from_override(choice: Option<WeaponOverride>) -> (bool, Option<WeaponIdentity>) {
    match choice {
        Some(WeaponOverride::Unarmed) => (true, None),
        Some(WeaponOverride::Weapon(weapon)) => (false, Some(weapon)),
        None => (false, None),
    }
}

impl From<WeaponMemoryRecord> for WeaponMemory {
    fn from(record: WeaponMemoryRecord) -> Self {
        Self {
            owner: record.owner,
            remembered: record.remembered_weapons,
            forced: override_from_pair(record.forced_unarmed, record.forced_weapon),
            forced_while_drafted: override_from_pair(
                record.forced_unarmed_while_drafted,
                record.forced_weapon_while_drafted,
            ),
            preferred_melee: override_from_pair(
                record.preferred_unarmed,
                record.preferred_melee_weapon,
            ),
            default_ranged: record.preferred_ranged_weapon,
            primary_weapon_mode: record.primary_weapon_mode,
            null_checked: false,
        }
    }
}

impl From<WeaponMemory> for WeaponMemoryRecord {
    fn from(memory: WeaponMemory) -> Self {
        let (forced_unarmed, forced_weapon) = pair_from_override(memory.forced);
        let (forced_unarmed_while_drafted, forced_weapon_while_drafted) =
            pair_from_override(memory.forced_while_drafted);
        let (preferred_unarmed, preferred_melee_weapon) =
            pair_from_override(memory.preferred_melee);

        Self {
            owner: memory.owner,
            remembered_weapons: memory.remembered,
            forced_weapon,
            forced_unarmed,
            forced_weapon_while_drafted,
            forced_unarmed_while_drafted,
            preferred_unarmed,
            preferred_ranged_weapon: memory.default_ranged,
            preferred_melee_weapon,
            primary_weapon_mode: memory.primary_weapon_mode,
        }
    }
}
