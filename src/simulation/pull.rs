//! Entity pull pass

use crate::core::config::PULL_SKIP_EPSILON;
use crate::core::types::{BodyType, EntityId, MapPosition};
use crate::simulation::events::WellEvent;
use crate::simulation::removal::RemovalQueue;
use crate::well::registry::WellRegistry;
use crate::well::target::PULL_IMMUNE_TAGS;
use crate::world::providers::{EntityStore, PhysicsAccess, SpatialQuery};

/// Pull movable entities in the pull radius towards the well at `idx`
///
/// Impulse magnitude is `distance * level * mass` along the direction to the
/// well, with no cap. Entities already inside the destroy
/// band (less `PULL_SKIP_EPSILON`) are left to the destruction pass.
///
/// Returns the number of entities pulled.
pub fn pull_entities<W>(
    world: &mut W,
    wells: &WellRegistry,
    idx: usize,
    at: MapPosition,
    removals: &RemovalQueue,
    events: &mut Vec<WellEvent>,
) -> usize
where
    W: SpatialQuery + PhysicsAccess + EntityStore + ?Sized,
{
    let (Some(owner), Some(well)) = (wells.owner_at(idx), wells.state_at(idx)) else {
        return 0;
    };
    let level = well.level as f32;
    let skip_below = well.destroy_radius() - PULL_SKIP_EPSILON;

    let mut pulled = 0;
    for entity in world.entities_in_range(at.map, at.position, well.pull_radius()) {
        if !is_pullable(&*world, owner, entity, removals) {
            continue;
        }
        let Some(target) = world.world_position(entity) else {
            continue;
        };

        let displacement = at.position - target.position;
        let distance = displacement.length();
        if distance < skip_below {
            continue;
        }

        let magnitude = distance * level * world.mass(entity);
        let impulse = displacement.normalize_or_zero() * magnitude;
        world.apply_impulse(entity, impulse);
        events.push(WellEvent::EntityPulled {
            well: owner,
            entity,
            impulse,
        });
        pulled += 1;
    }
    pulled
}

fn is_pullable<W>(world: &W, owner: EntityId, entity: EntityId, removals: &RemovalQueue) -> bool
where
    W: PhysicsAccess + EntityStore + ?Sized,
{
    if entity == owner || removals.contains(entity) || world.is_queued_for_removal(entity) {
        return false;
    }
    if world.body_type(entity) != Some(BodyType::Dynamic) {
        return false;
    }
    !PULL_IMMUNE_TAGS.iter().any(|&tag| world.has_tag(entity, tag)) && !world.is_contained(entity)
}
