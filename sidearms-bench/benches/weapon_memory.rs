//! Sidearms Benchmark Suite
//!
//! Costs that land on the host's per-tick path:
//!   forced_query_single .............. one `is_current_weapon_forced` call
//!   registry_lookup_500_characters ... repaired-memory lookup in a big colony
//!   repair_pass_stale_save ........... first lookup after content removal
//!   event_burst_20_sidearms .......... pickups then drops for one character

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use sidearms_bench::{armed_colonist, catalog, populated_registry, weapon};
use sidearms_core::config::WeaponModeDefaults;
use sidearms_core::memory::WeaponMemory;
use sidearms_core::types::CharacterId;
use sidearms_host::events::SidearmEvent;
use sidearms_host::systems;

/// Benchmark: a single forced-weapon query with preferences.
fn bench_forced_query(c: &mut Criterion) {
    let catalog = catalog();
    let pawn = armed_colonist(1, 8);
    let mut memory = WeaponMemory::new(&pawn, true, &WeaponModeDefaults::default(), &catalog);
    memory.set_ranged_weapon_type_as_default(weapon(0), &catalog);

    c.bench_function("forced_query_single", |b| {
        b.iter(|| black_box(memory.is_current_weapon_forced(black_box(&pawn), &catalog, true)));
    });
}

/// Benchmark: looking up an existing memory among 500 characters.
fn bench_registry_lookup(c: &mut Criterion) {
    let mut registry = populated_registry(500, 4);
    let pawn = armed_colonist(250, 4);

    c.bench_function("registry_lookup_500_characters", |b| {
        b.iter(|| {
            let found = registry.memory_for_character(Some(black_box(&pawn)), false).is_some();
            black_box(found);
        });
    });
}

/// Benchmark: repair pass over a save whose catalog lost half its weapons.
fn bench_repair_pass(c: &mut Criterion) {
    let registry = populated_registry(1, 12);
    let stale = registry.peek(CharacterId(0)).cloned();

    let mut shrunk = catalog();
    shrunk.remove("Gun_ChargeRifle");
    shrunk.remove("MeleeWeapon_LongSword");
    let pawn = armed_colonist(0, 3);

    c.bench_function("repair_pass_stale_save", |b| {
        b.iter_batched(
            || stale.clone(),
            |memory| {
                if let Some(mut memory) = memory {
                    black_box(memory.null_checks(&pawn, &shrunk));
                }
            },
            BatchSize::SmallInput,
        );
    });
}

/// Benchmark: 20 sidearm pickups followed by 20 drops through the systems layer.
fn bench_event_burst(c: &mut Criterion) {
    let events: Vec<SidearmEvent> = (1..=20)
        .map(|i| SidearmEvent::SidearmPickedUp { weapon: weapon(i) })
        .chain((1..=20).map(|i| SidearmEvent::SidearmDropped {
            weapon: weapon(i),
            intentional: true,
        }))
        .collect();
    let pawn = armed_colonist(0, 0);

    c.bench_function("event_burst_20_sidearms", |b| {
        b.iter_batched(
            || populated_registry(1, 0),
            |mut registry| black_box(systems::apply_events(&mut registry, &pawn, &events)),
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    benches,
    bench_forced_query,
    bench_registry_lookup,
    bench_repair_pass,
    bench_event_burst,
);
criterion_main!(benches);
