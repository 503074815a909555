//! Integration tests for the well engine
//!
//! These tests drive `WellEngine::advance` against the sandbox world and check:
//! - Consumption, merging and terrain clearing energy accounting
//! - Claimed wells never acting again
//! - The pull/destroy boundary
//! - Accumulator behaviour across frames

use glam::Vec2;
use gravity_well::core::types::{BodyType, CellRef, EntityId, MapId, Tag};
use gravity_well::simulation::WellEvent;
use gravity_well::world::{SandboxEntity, SandboxWorld, Tile};
use gravity_well::{EngineConfig, WellEngine};

const MAP: MapId = MapId(0);

/// One gravity pass, no decay pass
const ONE_GRAVITY_PASS: f32 = 0.6;

fn engine() -> WellEngine<SandboxWorld> {
    WellEngine::new(EngineConfig::default(), SandboxWorld::new()).unwrap()
}

fn spawn_well(
    engine: &mut WellEngine<SandboxWorld>,
    pos: Vec2,
    energy: f32,
    level: u32,
) -> EntityId {
    let owner = engine
        .world_mut()
        .spawn(SandboxEntity::new(MAP, pos).with_body(BodyType::Static));
    engine.spawn_well(owner, energy, level).unwrap();
    owner
}

fn spawn(engine: &mut WellEngine<SandboxWorld>, entity: SandboxEntity) -> EntityId {
    engine.world_mut().spawn(entity)
}

fn events_by(events: &[WellEvent], well: EntityId) -> Vec<&WellEvent> {
    events.iter().filter(|e| e.well() == Some(well)).collect()
}

// ============================================================================
// Destruction and merging
// ============================================================================

/// Level 3 well (destroy 2.5, pull 8) at energy 10 eats an ordinary entity
/// 2.0 away and a rival well 1.0 away holding 4 energy.
#[test]
fn test_consume_and_merge_scenario() {
    let mut engine = engine();
    let well = spawn_well(&mut engine, Vec2::ZERO, 10.0, 3);
    let rock = spawn(&mut engine, SandboxEntity::new(MAP, Vec2::new(2.0, 0.0)));
    let rival = spawn_well(&mut engine, Vec2::new(0.0, 1.0), 4.0, 1);

    let state = engine.well(well).unwrap();
    assert_eq!(state.destroy_radius(), 2.5);
    assert_eq!(state.pull_radius(), 8.0);

    let events = engine.advance(ONE_GRAVITY_PASS);

    assert_eq!(engine.well(well).unwrap().energy, 15.0);
    assert!(engine.well(rival).unwrap().is_being_deleted_by_rival());
    assert!(events.contains(&WellEvent::EntityConsumed {
        well,
        entity: rock,
        gained: 1.0
    }));
    assert!(events.contains(&WellEvent::WellAbsorbed {
        well,
        rival,
        gained: 4.0
    }));

    let pending = engine.world().pending_removals();
    assert!(pending.contains(&rock));
    assert!(pending.contains(&rival));
    assert_eq!(pending.len(), 2);
}

#[test]
fn test_food_grants_its_energy() {
    let mut engine = engine();
    let well = spawn_well(&mut engine, Vec2::ZERO, 10.0, 2);
    spawn(&mut engine, SandboxEntity::new(MAP, Vec2::new(1.0, 0.0)).with_energy(12.0));

    engine.advance(ONE_GRAVITY_PASS);
    assert_eq!(engine.well(well).unwrap().energy, 22.0);
}

#[test]
fn test_immune_entities_survive() {
    let mut engine = engine();
    let well = spawn_well(&mut engine, Vec2::ZERO, 10.0, 3);
    let tags = [
        Tag::Ghost,
        Tag::GridRoot,
        Tag::ContainmentField,
        Tag::ContainmentGenerator,
    ];
    let immune: Vec<EntityId> = tags
        .into_iter()
        .map(|tag| {
            spawn(
                &mut engine,
                SandboxEntity::new(MAP, Vec2::new(1.0, 0.0))
                    .with_body(BodyType::Static)
                    .with_tag(tag),
            )
        })
        .collect();

    let events = engine.advance(ONE_GRAVITY_PASS);

    assert_eq!(engine.well(well).unwrap().energy, 10.0);
    assert!(events.is_empty());
    for id in immune {
        assert!(!engine.world().pending_removals().contains(&id));
    }
}

/// Two wells inside each other's destroy radius: the first registered wins
#[test]
fn test_mutual_merge_is_first_discovery_wins() {
    let mut engine = engine();
    let first = spawn_well(&mut engine, Vec2::ZERO, 10.0, 3);
    let second = spawn_well(&mut engine, Vec2::new(1.0, 0.0), 4.0, 3);

    let events = engine.advance(ONE_GRAVITY_PASS);

    let absorbed: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, WellEvent::WellAbsorbed { .. }))
        .collect();
    assert_eq!(absorbed.len(), 1);
    assert_eq!(absorbed[0].well(), Some(first));

    assert_eq!(engine.well(first).unwrap().energy, 14.0);
    assert!(!engine.well(first).unwrap().is_being_deleted_by_rival());
    assert!(engine.well(second).unwrap().is_being_deleted_by_rival());
    assert!(events_by(&events, second).is_empty());
}

/// Absorbing a rival that another well already claimed adds nothing
#[test]
fn test_reflagging_claimed_rival_transfers_nothing() {
    let mut engine = engine();
    let well = spawn_well(&mut engine, Vec2::ZERO, 10.0, 3);
    let rival = spawn_well(&mut engine, Vec2::new(1.5, 0.0), 7.0, 1);
    engine.well_mut(rival).unwrap().flag_deleted_by_rival();

    let events = engine.advance(ONE_GRAVITY_PASS);

    assert_eq!(engine.well(well).unwrap().energy, 10.0);
    let rival_state = engine.well(rival).unwrap();
    assert!(rival_state.is_being_deleted_by_rival());
    assert_eq!(rival_state.energy, 7.0);
    assert!(events.contains(&WellEvent::WellAbsorbed {
        well,
        rival,
        gained: 0.0
    }));
    assert!(engine.world().pending_removals().contains(&rival));
}

#[test]
fn test_claimed_well_never_acts_again() {
    let mut engine = engine();
    let claimed = spawn_well(&mut engine, Vec2::new(50.0, 0.0), 10.0, 3);
    engine.well_mut(claimed).unwrap().flag_deleted_by_rival();

    let debris = spawn(&mut engine, SandboxEntity::new(MAP, Vec2::new(50.5, 0.0)));
    let far_debris = spawn(&mut engine, SandboxEntity::new(MAP, Vec2::new(55.0, 0.0)));
    let grid = engine.world_mut().add_grid(MAP, 4, 4, 1.0, Vec2::new(48.0, -2.0));
    engine.world_mut().fill_grid(grid, Tile::Wall);

    let events = engine.advance(3.2);

    assert!(events_by(&events, claimed)
        .iter()
        .all(|e| !e.is_destructive_action()));
    assert!(engine.world().pending_removals().is_empty());
    assert!(engine.world().contains(debris));
    assert_eq!(engine.world().get(far_debris).unwrap().velocity, Vec2::ZERO);
    assert_eq!(engine.world().solid_tiles(), 16);
    // Drain still applies: 3 decay ticks
    assert_eq!(engine.well(claimed).unwrap().energy, 7.0);
}

#[test]
fn test_flush_and_forget_absorbed_well() {
    let mut engine = engine();
    let well = spawn_well(&mut engine, Vec2::ZERO, 10.0, 3);
    let rival = spawn_well(&mut engine, Vec2::new(1.0, 0.0), 4.0, 1);

    engine.advance(ONE_GRAVITY_PASS);
    let removed = engine.world_mut().flush_removals();
    assert_eq!(removed, vec![rival]);
    for id in removed {
        assert!(engine.forget_well(id).is_some());
    }

    assert_eq!(engine.wells().len(), 1);
    assert!(engine.well(rival).is_none());
    assert!(engine.well(well).is_some());
}

/// Catch-up passes within one advance must not eat the same entity twice
#[test]
fn test_entity_consumed_once_across_catch_up_passes() {
    let mut engine = engine();
    let well = spawn_well(&mut engine, Vec2::ZERO, 10.0, 3);
    spawn(&mut engine, SandboxEntity::new(MAP, Vec2::new(1.0, 0.0)));

    // Three gravity passes, one decay pass, removals never flushed
    let events = engine.advance(1.6);

    let consumed = events
        .iter()
        .filter(|e| matches!(e, WellEvent::EntityConsumed { .. }))
        .count();
    assert_eq!(consumed, 1);
    assert_eq!(engine.well(well).unwrap().energy, 10.0);
}

#[test]
fn test_level_zero_destroys_nothing() {
    let mut engine = engine();
    let well = spawn_well(&mut engine, Vec2::new(0.5, 0.5), 10.0, 0);
    let debris = spawn(
        &mut engine,
        SandboxEntity::new(MAP, Vec2::new(0.5, 0.5)).with_body(BodyType::Static),
    );
    let grid = engine.world_mut().add_grid(MAP, 2, 2, 1.0, Vec2::ZERO);
    engine.world_mut().fill_grid(grid, Tile::Floor);

    engine.advance(ONE_GRAVITY_PASS);

    assert_eq!(engine.well(well).unwrap().energy, 10.0);
    assert!(!engine.world().pending_removals().contains(&debris));
    assert_eq!(engine.world().solid_tiles(), 4);
}

// ============================================================================
// Terrain
// ============================================================================

#[test]
fn test_terrain_gain_counts_non_empty_cells() {
    let mut engine = engine();
    // Level 2: destroy radius 1.5 covers the 3x3 block of centers around (5.5, 5.5)
    let well = spawn_well(&mut engine, Vec2::new(5.5, 5.5), 0.0, 2);
    engine.well_mut(well).unwrap().drain_rate = 0.0;
    let grid = engine.world_mut().add_grid(MAP, 11, 11, 1.0, Vec2::ZERO);
    engine.world_mut().fill_grid(grid, Tile::Floor);
    for (x, y) in [(4, 4), (5, 6), (6, 5)] {
        engine.world_mut().set_tile(CellRef::new(grid, x, y), Tile::Empty);
    }

    let events = engine.advance(ONE_GRAVITY_PASS);
    assert_eq!(engine.well(well).unwrap().energy, 6.0);
    assert!(events.contains(&WellEvent::TerrainCleared {
        well,
        cells: 6,
        gained: 6.0
    }));
    assert_eq!(engine.world().solid_tiles(), 121 - 9);

    // Everything in range is now empty
    let events = engine.advance(0.5);
    assert_eq!(engine.well(well).unwrap().energy, 6.0);
    assert!(!events
        .iter()
        .any(|e| matches!(e, WellEvent::TerrainCleared { .. })));
}

#[test]
fn test_terrain_on_other_map_untouched() {
    let mut engine = engine();
    let well = spawn_well(&mut engine, Vec2::new(1.5, 1.5), 0.0, 3);
    let grid = engine.world_mut().add_grid(MapId(7), 3, 3, 1.0, Vec2::ZERO);
    engine.world_mut().fill_grid(grid, Tile::Wall);

    engine.advance(ONE_GRAVITY_PASS);
    assert_eq!(engine.well(well).unwrap().energy, 0.0);
    assert_eq!(engine.world().solid_tiles(), 9);
}

// ============================================================================
// Pulling
// ============================================================================

#[test]
fn test_pull_impulse_magnitude() {
    let mut engine = engine();
    let well = spawn_well(&mut engine, Vec2::ZERO, 10.0, 2);
    let crate_id = spawn(&mut engine, SandboxEntity::new(MAP, Vec2::new(4.0, 0.0)).with_mass(2.0));

    let events = engine.advance(ONE_GRAVITY_PASS);

    // |d| * level * mass = 4 * 2 * 2 along -x
    let expected = Vec2::new(-16.0, 0.0);
    assert_eq!(engine.world().impulses(), &[(crate_id, expected)]);
    assert!(events.contains(&WellEvent::EntityPulled {
        well,
        entity: crate_id,
        impulse: expected
    }));
    assert_eq!(engine.world().get(crate_id).unwrap().velocity, Vec2::new(-8.0, 0.0));
}

#[test]
fn test_pull_skips_unmovable_and_shielded() {
    let mut engine = engine();
    spawn_well(&mut engine, Vec2::ZERO, 10.0, 2);
    let targets = [
        SandboxEntity::new(MAP, Vec2::new(4.0, 0.0)).with_body(BodyType::Static),
        SandboxEntity::new(MAP, Vec2::new(0.0, 4.0)).without_body(),
        SandboxEntity::new(MAP, Vec2::new(-4.0, 0.0)).with_tag(Tag::Ghost),
        SandboxEntity::new(MAP, Vec2::new(0.0, -4.0)).with_tag(Tag::GridRoot),
        SandboxEntity::new(MAP, Vec2::new(3.0, 3.0)).with_tag(Tag::MapRoot),
        SandboxEntity::new(MAP, Vec2::new(-3.0, 3.0)).contained(),
        SandboxEntity::new(MapId(9), Vec2::new(4.0, 0.0)),
    ];
    for target in targets {
        spawn(&mut engine, target);
    }

    engine.advance(ONE_GRAVITY_PASS);
    assert!(engine.world().impulses().is_empty());
}

/// An entity just inside the destroy band is never pulled, even when it is
/// immune to destruction.
#[test]
fn test_pull_destroy_boundary() {
    let mut engine = engine();
    // destroy radius 2.5, pull skip threshold 2.49
    spawn_well(&mut engine, Vec2::ZERO, 10.0, 3);
    let inside = spawn(
        &mut engine,
        SandboxEntity::new(MAP, Vec2::new(2.48, 0.0)).with_tag(Tag::ContainmentField),
    );
    let outside = spawn(
        &mut engine,
        SandboxEntity::new(MAP, Vec2::new(0.0, 2.6)).with_tag(Tag::ContainmentField),
    );

    engine.advance(ONE_GRAVITY_PASS);

    let pulled: Vec<EntityId> = engine.world().impulses().iter().map(|(id, _)| *id).collect();
    assert!(!pulled.contains(&inside));
    assert!(pulled.contains(&outside));
}

#[test]
fn test_destroyed_entity_is_not_pulled() {
    let mut engine = engine();
    spawn_well(&mut engine, Vec2::ZERO, 10.0, 3);
    let victim = spawn(&mut engine, SandboxEntity::new(MAP, Vec2::new(2.48, 0.0)));

    engine.advance(ONE_GRAVITY_PASS);
    assert!(engine.world().pending_removals().contains(&victim));
    assert!(engine.world().impulses().is_empty());
}

// ============================================================================
// Timers
// ============================================================================

#[test]
fn test_quiet_frame_does_nothing() {
    let mut engine = engine();
    let well = spawn_well(&mut engine, Vec2::ZERO, 10.0, 3);

    let events = engine.advance(0.3);
    assert!(events.is_empty());
    assert_eq!(engine.well(well).unwrap().energy, 10.0);
    assert!(engine.world().pending_removals().is_empty());
}

/// Decay runs before gravity within one advance and is unaffected by it
#[test]
fn test_decay_reported_before_gravity_gain() {
    let mut engine = engine();
    let well = spawn_well(&mut engine, Vec2::ZERO, 10.0, 3);
    engine.well_mut(well).unwrap().drain_rate = 0.75;
    spawn(&mut engine, SandboxEntity::new(MAP, Vec2::new(1.0, 0.0)));

    let events = engine.advance(1.2);

    assert_eq!(
        events.first(),
        Some(&WellEvent::EnergyDrained {
            well,
            energy: 9.25
        })
    );
    assert_eq!(engine.well(well).unwrap().energy, 10.25);
}

#[test]
fn test_many_small_frames_match_one_large() {
    let mut stepped = engine();
    let a = spawn_well(&mut stepped, Vec2::ZERO, 10.0, 0);
    for _ in 0..25 {
        stepped.advance(0.125);
    }

    let mut single = engine();
    let b = spawn_well(&mut single, Vec2::ZERO, 10.0, 0);
    single.advance(3.125);

    // 3.125 accumulated: three decay ticks either way
    assert_eq!(stepped.well(a).unwrap().energy, 7.0);
    assert_eq!(single.well(b).unwrap().energy, 7.0);
}

#[test]
fn test_energy_goes_negative_without_clamp() {
    let mut engine = engine();
    let well = spawn_well(&mut engine, Vec2::ZERO, 1.0, 1);
    engine.advance(3.5);
    assert_eq!(engine.well(well).unwrap().energy, -2.0);
    assert!(engine.well(well).is_some());
}

#[test]
fn test_shipped_config_loads() {
    let config = EngineConfig::load_from_toml(std::path::Path::new("data/engine.toml"))
        .expect("data/engine.toml should parse");
    assert_eq!(config.max_catch_up_passes, Some(8));
    assert_eq!(config.level_for(750.0), Some(3));
}
