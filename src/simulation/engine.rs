//! Well simulation engine - orchestrates well updates
//!
//! Each `advance` call feeds two independent accumulators:
//! - decay (period = `EngineConfig::decay_interval`): every well loses its
//!   drain rate
//! - gravity (period = `GRAVITY_PERIOD`): every unclaimed well runs
//!   destroy entities -> destroy terrain -> pull entities
//!
//! Decay passes run before gravity passes within one call. Removals queued
//! during a gravity pass reach the entity store once all wells in that pass
//! have run.

use crate::core::config::{EngineConfig, GRAVITY_PERIOD};
use crate::core::error::{Result, WellError};
use crate::core::types::EntityId;
use crate::simulation::clock::{Accumulator, Due};
use crate::simulation::destruction::destroy_entities;
use crate::simulation::events::{Timer, WellEvent};
use crate::simulation::pull::pull_entities;
use crate::simulation::removal::RemovalQueue;
use crate::simulation::terrain::destroy_terrain;
use crate::well::contact::{Contact, ContactHandler, InertContact};
use crate::well::registry::WellRegistry;
use crate::well::state::WellState;
use crate::world::providers::WellWorld;

/// Drives every gravity well in a world
pub struct WellEngine<W, H = InertContact> {
    config: EngineConfig,
    world: W,
    wells: WellRegistry,
    contact: H,
    decay: Accumulator,
    gravity: Accumulator,
}

impl<W: WellWorld> WellEngine<W, InertContact> {
    /// Create an engine with the inert contact handler
    pub fn new(config: EngineConfig, world: W) -> Result<Self> {
        Self::with_contact_handler(config, world, InertContact)
    }
}

impl<W: WellWorld, H: ContactHandler> WellEngine<W, H> {
    pub fn with_contact_handler(config: EngineConfig, world: W, contact: H) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            decay: Accumulator::new(config.decay_interval),
            gravity: Accumulator::new(GRAVITY_PERIOD),
            config,
            world,
            wells: WellRegistry::new(),
            contact,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    pub fn wells(&self) -> &WellRegistry {
        &self.wells
    }

    pub fn well(&self, owner: EntityId) -> Option<&WellState> {
        self.wells.get(owner)
    }

    pub fn well_mut(&mut self, owner: EntityId) -> Option<&mut WellState> {
        self.wells.get_mut(owner)
    }

    /// Attach a well with the configured default drain rate
    pub fn spawn_well(&mut self, owner: EntityId, energy: f32, level: u32) -> Result<()> {
        let state = WellState::new(energy, level, self.config.default_drain_rate);
        self.register_well(owner, state)
    }

    pub fn register_well(&mut self, owner: EntityId, state: WellState) -> Result<()> {
        self.wells.register(owner, state)?;
        tracing::debug!("Registered well {:?} ({} live)", owner, self.wells.len());
        Ok(())
    }

    /// Drop the state of a well whose owner the store has deleted
    pub fn forget_well(&mut self, owner: EntityId) -> Option<WellState> {
        self.wells.remove(owner)
    }

    /// Set a well's level directly, for callers managing levels themselves
    ///
    /// A non-empty threshold table overrides this after the next pass.
    pub fn set_level(&mut self, owner: EntityId, level: u32) -> Result<()> {
        let well = self.wells.get_mut(owner).ok_or(WellError::UnknownWell(owner))?;
        well.level = level;
        Ok(())
    }

    /// Time accumulated towards the next (decay, gravity) pass
    pub fn pending_time(&self) -> (f32, f32) {
        (self.decay.elapsed(), self.gravity.elapsed())
    }

    /// Advance the simulation by `dt` of wall time
    ///
    /// Returns everything the wells did, in order.
    pub fn advance(&mut self, dt: f32) -> Vec<WellEvent> {
        let mut events = Vec::new();
        if !(dt.is_finite() && dt >= 0.0) {
            tracing::warn!("Ignoring invalid frame delta {}", dt);
            return events;
        }

        let cap = self.config.max_catch_up_passes;
        let decay_due = self.decay.accumulate(dt, cap);
        let gravity_due = self.gravity.accumulate(dt, cap);

        report_dropped(Timer::Decay, decay_due, &mut events);
        for _ in 0..decay_due.passes {
            self.decay_pass(&mut events);
        }

        report_dropped(Timer::Gravity, gravity_due, &mut events);
        for _ in 0..gravity_due.passes {
            self.gravity_pass(&mut events);
        }

        events
    }

    /// Forward a collision-start notification to the contact handler
    ///
    /// Returns false when the event is ignored: unknown well, or a well
    /// already claimed by a rival.
    pub fn handle_contact(&mut self, well_owner: EntityId, other: EntityId) -> bool {
        let Some(well) = self.wells.get_mut(well_owner) else {
            return false;
        };
        if well.is_being_deleted_by_rival() {
            return false;
        }
        self.contact.on_contact(Contact { well_owner, other }, well);
        true
    }

    fn decay_pass(&mut self, events: &mut Vec<WellEvent>) {
        for (owner, well) in self.wells.iter_mut() {
            well.drain();
            events.push(WellEvent::EnergyDrained {
                well: owner,
                energy: well.energy,
            });
        }
        for idx in 0..self.wells.len() {
            self.refresh_level(idx, events);
        }
    }

    fn gravity_pass(&mut self, events: &mut Vec<WellEvent>) {
        let mut removals = RemovalQueue::new();

        for idx in 0..self.wells.len() {
            let claimed = self
                .wells
                .state_at(idx)
                .map_or(true, WellState::is_being_deleted_by_rival);
            if claimed {
                continue;
            }
            self.well_tick(idx, &mut removals, events);
            self.refresh_level(idx, events);
        }

        let removed = removals.drain_into(&mut self.world);
        if removed > 0 {
            tracing::debug!("Gravity pass queued {} removals", removed);
        }
    }

    /// One destroy -> terrain -> pull sequence for the well at `idx`
    fn well_tick(&mut self, idx: usize, removals: &mut RemovalQueue, events: &mut Vec<WellEvent>) {
        let Some(owner) = self.wells.owner_at(idx) else {
            return;
        };
        let Some(at) = self.world.world_position(owner) else {
            tracing::trace!("Well {:?} has no position, skipping tick", owner);
            return;
        };

        let gained = destroy_entities(&self.world, &mut self.wells, idx, at, removals, events);
        let cells = destroy_terrain(&mut self.world, &mut self.wells, idx, at, events);
        let pulled = pull_entities(&mut self.world, &self.wells, idx, at, removals, events);
        tracing::trace!(
            "Well {:?} tick: +{} from entities, {} cells, {} pulled",
            owner,
            gained,
            cells,
            pulled
        );
    }

    fn refresh_level(&mut self, idx: usize, events: &mut Vec<WellEvent>) {
        let Some(owner) = self.wells.owner_at(idx) else {
            return;
        };
        let Some(well) = self.wells.state_at_mut(idx) else {
            return;
        };
        let Some(level) = self.config.level_for(well.energy) else {
            return;
        };
        if level != well.level {
            tracing::debug!("Well {:?} level {} -> {}", owner, well.level, level);
            events.push(WellEvent::LevelChanged {
                well: owner,
                from: well.level,
                to: level,
            });
            well.level = level;
        }
    }
}

fn report_dropped(timer: Timer, due: Due, events: &mut Vec<WellEvent>) {
    if due.dropped > 0 {
        tracing::warn!("{:?} catch-up capped, dropped {} passes", timer, due.dropped);
        events.push(WellEvent::CatchUpCapped {
            timer,
            dropped: due.dropped,
        });
    }
}
