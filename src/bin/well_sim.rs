//! Headless Well Runner
//!
//! Seeds a sandbox arena with wells, debris and terrain, runs the engine at a
//! fixed frame rate and prints a summary.

use std::path::PathBuf;

use clap::Parser;
use glam::Vec2;
use gravity_well::core::types::{BodyType, MapId, Tag};
use gravity_well::world::{SandboxEntity, SandboxWorld, SpatialQuery, Tile};
use gravity_well::{EngineConfig, WellEngine, WellEvent};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

const MAP: MapId = MapId(0);

/// Headless Well Runner - watch gravity wells eat an arena
#[derive(Parser, Debug)]
#[command(name = "well_sim")]
#[command(about = "Run gravity wells in a sandbox arena and report what they consumed")]
struct Args {
    /// Engine config TOML (defaults plus the standard level table if omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Simulated seconds to run
    #[arg(long, default_value_t = 30.0)]
    seconds: f32,

    /// Frame delta fed to the engine
    #[arg(long, default_value_t = 1.0 / 60.0)]
    frame_dt: f32,

    /// Number of wells to spawn
    #[arg(long, default_value_t = 2)]
    wells: u32,

    /// Starting energy of each well
    #[arg(long, default_value_t = 300.0)]
    well_energy: f32,

    /// Number of loose debris entities
    #[arg(long, default_value_t = 200)]
    debris: usize,

    /// Arena side length in world units
    #[arg(long, default_value_t = 40.0)]
    arena: f32,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,
}

#[derive(Serialize, Default)]
struct Tally {
    entities_consumed: usize,
    wells_absorbed: usize,
    cells_cleared: u32,
    impulses: usize,
    decay_ticks: usize,
    level_changes: usize,
    contacts: usize,
}

#[derive(Serialize)]
struct WellSummary {
    owner: u64,
    energy: f32,
    level: u32,
    position: [f32; 2],
}

#[derive(Serialize)]
struct RunSummary {
    seed: u64,
    frames: usize,
    seconds: f32,
    tally: Tally,
    wells: Vec<WellSummary>,
    remaining_entities: usize,
    remaining_tiles: usize,
}

fn main() -> gravity_well::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let config = match &args.config {
        Some(path) => EngineConfig::load_from_toml(path)?,
        None => EngineConfig::default().with_standard_levels(),
    };

    tracing::info!("Starting well run (seed {})", seed);

    let world = build_arena(&args, &mut rng);
    let mut engine = WellEngine::new(config, world)?;
    spawn_wells(&mut engine, &args, &mut rng)?;

    let frames = (args.seconds / args.frame_dt).max(0.0) as usize;
    let mut tally = Tally::default();
    for _ in 0..frames {
        for event in engine.advance(args.frame_dt) {
            record(&mut tally, &event);
        }
        for removed in engine.world_mut().flush_removals() {
            if engine.forget_well(removed).is_some() {
                tracing::info!("Well {:?} was absorbed", removed);
            }
        }
        engine.world_mut().step(args.frame_dt);
        tally.contacts += dispatch_contacts(&mut engine);
    }

    let summary = RunSummary {
        seed,
        frames,
        seconds: args.seconds,
        tally,
        wells: engine
            .wells()
            .iter()
            .map(|(owner, state)| {
                let position = engine
                    .world()
                    .get(owner)
                    .map_or([0.0, 0.0], |e| e.position.to_array());
                WellSummary {
                    owner: owner.0,
                    energy: state.energy,
                    level: state.level,
                    position,
                }
            })
            .collect(),
        remaining_entities: engine.world().entity_count(),
        remaining_tiles: engine.world().solid_tiles(),
    };

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Seed: {} ({} frames, {:.1}s)", summary.seed, summary.frames, summary.seconds);
        println!(
            "Consumed {} entities, {} wells, {} tiles; {} impulses",
            summary.tally.entities_consumed,
            summary.tally.wells_absorbed,
            summary.tally.cells_cleared,
            summary.tally.impulses
        );
        for well in &summary.wells {
            println!(
                "  well {:>4}: level {} energy {:.1} at ({:.1}, {:.1})",
                well.owner, well.level, well.energy, well.position[0], well.position[1]
            );
        }
        println!(
            "Remaining: {} entities, {} tiles",
            summary.remaining_entities, summary.remaining_tiles
        );
    }

    Ok(())
}

/// Floor tiles, a ring of containment fields, and loose debris
fn build_arena(args: &Args, rng: &mut ChaCha8Rng) -> SandboxWorld {
    let mut world = SandboxWorld::new();
    let half = args.arena / 2.0;
    let side = args.arena.max(1.0).ceil() as usize;

    let grid = world.add_grid(MAP, side, side, 1.0, Vec2::splat(-half));
    world.fill_grid(grid, Tile::Floor);

    let fence_count = (args.arena * 2.0) as usize;
    for i in 0..fence_count {
        let angle = i as f32 / fence_count as f32 * std::f32::consts::TAU;
        let pos = Vec2::from_angle(angle) * (half - 0.5);
        world.spawn(
            SandboxEntity::new(MAP, pos)
                .with_body(BodyType::Static)
                .with_tag(Tag::ContainmentField),
        );
    }

    for _ in 0..args.debris {
        let pos = Vec2::new(
            rng.gen_range(-half * 0.9..half * 0.9),
            rng.gen_range(-half * 0.9..half * 0.9),
        );
        let mut debris = SandboxEntity::new(MAP, pos).with_mass(rng.gen_range(0.5..5.0));
        let roll: f32 = rng.gen();
        if roll < 0.2 {
            debris = debris.with_energy(rng.gen_range(5.0..25.0));
        } else if roll < 0.25 {
            debris = debris.with_tag(Tag::Ghost);
        } else if roll < 0.3 {
            debris = debris.contained();
        }
        world.spawn(debris);
    }

    world
}

fn spawn_wells(
    engine: &mut WellEngine<SandboxWorld>,
    args: &Args,
    rng: &mut ChaCha8Rng,
) -> gravity_well::Result<()> {
    let half = args.arena / 2.0;
    let level = engine.config().level_for(args.well_energy).unwrap_or(1);
    for _ in 0..args.wells {
        let pos = Vec2::new(
            rng.gen_range(-half * 0.5..half * 0.5),
            rng.gen_range(-half * 0.5..half * 0.5),
        );
        let owner = engine
            .world_mut()
            .spawn(SandboxEntity::new(MAP, pos).with_mass(50.0));
        engine.spawn_well(owner, args.well_energy, level)?;
    }
    Ok(())
}

/// Report wells touching a containment field
fn dispatch_contacts(engine: &mut WellEngine<SandboxWorld>) -> usize {
    let touching: Vec<_> = engine
        .wells()
        .iter()
        .filter_map(|(owner, _)| engine.world().get(owner).map(|e| (owner, e.map, e.position)))
        .flat_map(|(owner, map, position)| {
            engine
                .world()
                .entities_in_range(map, position, 1.0)
                .into_iter()
                .filter(|other| {
                    engine
                        .world()
                        .get(*other)
                        .is_some_and(|e| e.tags.contains(&Tag::ContainmentField))
                })
                .map(move |other| (owner, other))
                .collect::<Vec<_>>()
        })
        .collect();

    touching
        .into_iter()
        .filter(|&(owner, other)| engine.handle_contact(owner, other))
        .count()
}

fn record(tally: &mut Tally, event: &WellEvent) {
    match event {
        WellEvent::EntityConsumed { .. } => tally.entities_consumed += 1,
        WellEvent::WellAbsorbed { .. } => tally.wells_absorbed += 1,
        WellEvent::TerrainCleared { cells, .. } => tally.cells_cleared += cells,
        WellEvent::EntityPulled { .. } => tally.impulses += 1,
        WellEvent::EnergyDrained { .. } => tally.decay_ticks += 1,
        WellEvent::LevelChanged { .. } => tally.level_changes += 1,
        WellEvent::CatchUpCapped { timer, dropped } => {
            tracing::warn!("{:?} timer dropped {} passes", timer, dropped);
        }
    }
}
