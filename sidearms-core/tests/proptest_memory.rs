//! Property-Based Tests for Sidearms Core
//!
//! Uses `proptest` to drive weapon memories through random sequences of
//! mutations and events, checking the invariants that must hold after any
//! of them.

use proptest::prelude::*;

use sidearms_core::catalog::DefCatalog;
use sidearms_core::config::WeaponModeDefaults;
use sidearms_core::host::PawnSnapshot;
use sidearms_core::memory::WeaponMemory;
use sidearms_core::types::{WeaponIdentity, WeaponKind, WeaponOverride};

const WEAPONS: [&str; 5] = [
    "Gun_Revolver",
    "Gun_Autopistol",
    "MeleeWeapon_Knife",
    "MeleeWeapon_Club",
    "Gun_Removed",
];

fn catalog() -> DefCatalog {
    DefCatalog::new()
        .with_weapon("Gun_Revolver", WeaponKind::Ranged, Vec::<String>::new())
        .with_weapon("Gun_Autopistol", WeaponKind::Ranged, Vec::<String>::new())
        .with_weapon("MeleeWeapon_Knife", WeaponKind::Melee, Vec::<String>::new())
        .with_weapon("MeleeWeapon_Club", WeaponKind::Melee, Vec::<String>::new())
}

/// One call into the weapon memory.
#[derive(Debug, Clone)]
enum Op {
    ForceUnarmed(bool),
    ForceWeapon(usize, bool),
    UnsetUnarmed(bool),
    UnsetWeapon(bool),
    PreferRanged(usize),
    PreferMelee(usize),
    PreferUnarmed,
    UnsetRanged,
    UnsetMelee,
    Undraft,
    AddPrimary(usize),
    AddSidearm(usize),
    Drop(usize, bool),
    Forget(usize),
}

fn weapon(i: usize) -> WeaponIdentity {
    WeaponIdentity::new(WEAPONS[i % WEAPONS.len()])
}

fn arb_choice() -> impl Strategy<Value = Op> {
    let w = 0..WEAPONS.len();
    prop_oneof![
        any::<bool>().prop_map(Op::ForceUnarmed),
        (w.clone(), any::<bool>()).prop_map(|(i, d)| Op::ForceWeapon(i, d)),
        any::<bool>().prop_map(Op::UnsetUnarmed),
        any::<bool>().prop_map(Op::UnsetWeapon),
        w.clone().prop_map(Op::PreferRanged),
        w.prop_map(Op::PreferMelee),
        Just(Op::PreferUnarmed),
        Just(Op::UnsetRanged),
        Just(Op::UnsetMelee),
    ]
}

fn arb_event() -> impl Strategy<Value = Op> {
    let w = 0..WEAPONS.len();
    prop_oneof![
        Just(Op::Undraft),
        w.clone().prop_map(Op::AddPrimary),
        w.clone().prop_map(Op::AddSidearm),
        (w.clone(), any::<bool>()).prop_map(|(i, b)| Op::Drop(i, b)),
        w.prop_map(Op::Forget),
    ]
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![arb_choice(), arb_event()]
}

fn apply(memory: &mut WeaponMemory, op: &Op, catalog: &DefCatalog) {
    match *op {
        Op::ForceUnarmed(d) => memory.set_unarmed_as_forced(d),
        Op::ForceWeapon(i, d) => memory.set_weapon_as_forced(weapon(i), d),
        Op::UnsetUnarmed(d) => memory.unset_unarmed_as_forced(d),
        Op::UnsetWeapon(d) => memory.unset_forced_weapon(d),
        Op::PreferRanged(i) => memory.set_ranged_weapon_type_as_default(weapon(i), catalog),
        Op::PreferMelee(i) => memory.set_melee_weapon_type_as_preferred(weapon(i), catalog),
        Op::PreferUnarmed => memory.set_unarmed_as_preferred_melee(catalog),
        Op::UnsetRanged => memory.unset_ranged_weapon_default(),
        Op::UnsetMelee => memory.unset_melee_weapon_preference(),
        Op::Undraft => memory.inform_of_undraft(),
        Op::AddPrimary(i) => memory.inform_of_added_primary(&weapon(i), catalog),
        Op::AddSidearm(i) => memory.inform_of_added_sidearm(&weapon(i)),
        Op::Drop(i, intentional) => memory.inform_of_dropped_sidearm(&weapon(i), intentional),
        Op::Forget(i) => memory.forget_sidearm_memory(&weapon(i)),
    }
}

fn fresh() -> WeaponMemory {
    let pawn = PawnSnapshot::colonist(1, "Engie");
    WeaponMemory::new(&pawn, false, &WeaponModeDefaults::default(), &catalog())
}

// ---------------------------------------------------------------------------
// Property: paired unarmed/weapon choices are never both set
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn paired_choices_stay_exclusive(ops in prop::collection::vec(arb_op(), 0..40)) {
        let catalog = catalog();
        let mut memory = fresh();
        for op in &ops {
            apply(&mut memory, op, &catalog);
            for drafted in [false, true] {
                prop_assert!(!(memory.forced_unarmed(drafted) && memory.forced_weapon(drafted).is_some()));
            }
            prop_assert!(!(memory.preferred_unarmed() && memory.preferred_melee_weapon().is_some()));
        }
    }
}

// ---------------------------------------------------------------------------
// Property: unset_forced_weapon is idempotent
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn unset_forced_weapon_idempotent(
        ops in prop::collection::vec(arb_op(), 0..30),
        drafted in any::<bool>(),
    ) {
        let catalog = catalog();
        let mut once = fresh();
        for op in &ops {
            apply(&mut once, op, &catalog);
        }
        let mut twice = once.clone();

        once.unset_forced_weapon(drafted);
        twice.unset_forced_weapon(drafted);
        twice.unset_forced_weapon(drafted);
        prop_assert_eq!(once, twice);
    }
}

// ---------------------------------------------------------------------------
// Property: forcing then querying the equipped weapon reports it forced
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn forced_weapon_is_current_forced(
        ops in prop::collection::vec(arb_op(), 0..30),
        i in 0..WEAPONS.len(),
    ) {
        let catalog = catalog();
        let mut memory = fresh();
        for op in &ops {
            apply(&mut memory, op, &catalog);
        }
        memory.set_weapon_as_forced(weapon(i), false);
        let pawn = PawnSnapshot::colonist(1, "Engie").wielding(weapon(i));
        prop_assert!(memory.is_current_weapon_forced(&pawn, &catalog, false));
    }
}

// ---------------------------------------------------------------------------
// Property: a preference survives while an instance is still remembered
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn forgetting_respects_instance_count(i in 0..4usize, extra in 0..4usize) {
        let catalog = catalog();
        let mut memory = fresh();
        let w = weapon(i);

        memory.inform_of_added_primary(&w, &catalog);
        for _ in 0..extra {
            memory.inform_of_added_sidearm(&w);
        }

        let preferred = |m: &WeaponMemory| {
            m.preferred_melee_weapon() == Some(&w) || m.default_ranged_weapon() == Some(&w)
        };
        for _ in 0..extra {
            memory.forget_sidearm_memory(&w);
            prop_assert!(preferred(&memory));
        }
        memory.forget_sidearm_memory(&w);
        prop_assert!(!preferred(&memory));
        prop_assert_eq!(memory.remembered_count(&w), 0);
    }
}

// ---------------------------------------------------------------------------
// Property: the repair pass leaves only resolvable references and runs once
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn repair_leaves_only_resolvable_references(ops in prop::collection::vec(arb_op(), 0..40)) {
        let catalog = catalog();
        let mut memory = fresh();
        for op in &ops {
            apply(&mut memory, op, &catalog);
        }

        let pawn = PawnSnapshot::colonist(1, "Engie");
        let _ = memory.null_checks(&pawn, &catalog);
        let resolves = |w: &WeaponIdentity| catalog.get(&w.def).is_some();

        prop_assert!(memory.remembered_weapons().iter().all(resolves));
        prop_assert!(memory.preferred_melee_weapon().is_none_or(resolves));
        prop_assert!(memory.default_ranged_weapon().is_none_or(resolves));
        for drafted in [false, true] {
            let forced_ok = match memory.forced_override(drafted) {
                Some(WeaponOverride::Weapon(w)) => resolves(w),
                _ => true,
            };
            prop_assert!(forced_ok);
        }

        let snapshot = memory.clone();
        prop_assert!(memory.null_checks(&pawn, &catalog).is_clean());
        prop_assert_eq!(memory, snapshot);
    }
}

// ---------------------------------------------------------------------------
// Property: save layout round-trips any reachable state
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn save_layout_round_trips(ops in prop::collection::vec(arb_op(), 0..40)) {
        let catalog = catalog();
        let mut memory = fresh();
        for op in &ops {
            apply(&mut memory, op, &catalog);
        }
        let json = serde_json::to_string(&memory).expect("serialize");
        let loaded: WeaponMemory = serde_json::from_str(&json).expect("deserialize");
        prop_assert_eq!(loaded, memory);
    }
}
