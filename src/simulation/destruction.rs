//! Entity destruction pass
//!
//! Everything inside the destroy radius is classified once and then either
//! ignored, merged (rival wells) or queued for removal with an energy gain.
//! Removal is deferred through the pass's `RemovalQueue`.

use crate::core::config::FLAT_CONSUME_ENERGY;
use crate::core::types::{EntityId, MapPosition};
use crate::simulation::events::WellEvent;
use crate::simulation::removal::RemovalQueue;
use crate::well::registry::WellRegistry;
use crate::well::target::Target;
use crate::world::providers::{EntityStore, SpatialQuery};

/// Consume entities within the destroy radius of the well at `idx`
///
/// Returns the total energy gained.
pub fn destroy_entities<W>(
    world: &W,
    wells: &mut WellRegistry,
    idx: usize,
    at: MapPosition,
    removals: &mut RemovalQueue,
    events: &mut Vec<WellEvent>,
) -> f32
where
    W: SpatialQuery + EntityStore + ?Sized,
{
    let (Some(owner), Some(well)) = (wells.owner_at(idx), wells.state_at(idx)) else {
        return 0.0;
    };
    let radius = well.destroy_radius();
    if radius < 0.0 {
        return 0.0;
    }

    let mut total = 0.0;
    for entity in world.entities_in_range(at.map, at.position, radius) {
        if removals.contains(entity) || world.is_queued_for_removal(entity) {
            continue;
        }

        let gained = match Target::classify(owner, entity, world, wells) {
            Target::Immune => continue,
            Target::RivalWell => {
                let gained = absorb_rival(wells, entity);
                tracing::debug!(
                    "Well {:?} absorbed rival {:?} (+{})",
                    owner,
                    entity,
                    gained
                );
                events.push(WellEvent::WellAbsorbed {
                    well: owner,
                    rival: entity,
                    gained,
                });
                gained
            }
            Target::Food(gained) => consumed(owner, entity, gained, events),
            Target::Ordinary => consumed(owner, entity, FLAT_CONSUME_ENERGY, events),
        };

        removals.push(entity);
        if let Some(well) = wells.state_at_mut(idx) {
            well.energy += gained;
        }
        total += gained;
    }
    total
}

/// Read the rival's energy and flag it
///
/// Only an unflagged rival yields energy; the flag itself is set
/// unconditionally.
fn absorb_rival(wells: &mut WellRegistry, rival: EntityId) -> f32 {
    let Some(state) = wells.get_mut(rival) else {
        return 0.0;
    };
    let gained = if state.is_being_deleted_by_rival() {
        0.0
    } else {
        state.energy
    };
    state.flag_deleted_by_rival();
    gained
}

fn consumed(well: EntityId, entity: EntityId, gained: f32, events: &mut Vec<WellEvent>) -> f32 {
    tracing::trace!("Well {:?} consumed {:?} (+{})", well, entity, gained);
    events.push(WellEvent::EntityConsumed {
        well,
        entity,
        gained,
    });
    gained
}
