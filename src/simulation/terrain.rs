//! Terrain destruction pass

use crate::core::config::TERRAIN_ENERGY_PER_CELL;
use crate::core::types::{Disc, MapPosition};
use crate::simulation::events::WellEvent;
use crate::well::registry::WellRegistry;
use crate::world::providers::TerrainProvider;

/// Clear every non-empty cell whose center lies in the destroy disc
///
/// Returns the number of cells cleared. Each cell is worth
/// `TERRAIN_ENERGY_PER_CELL`; already-empty cells are worth nothing.
pub fn destroy_terrain<W>(
    world: &mut W,
    wells: &mut WellRegistry,
    idx: usize,
    at: MapPosition,
    events: &mut Vec<WellEvent>,
) -> u32
where
    W: TerrainProvider + ?Sized,
{
    let (Some(owner), Some(well)) = (wells.owner_at(idx), wells.state_at(idx)) else {
        return 0;
    };
    let radius = well.destroy_radius();
    if radius < 0.0 {
        return 0;
    }

    let disc = Disc::new(at.position, radius);
    let mut cleared = 0u32;
    for grid in world.grids_intersecting(at.map, disc.bounding_box()) {
        for cell in world.cells_intersecting(grid, disc) {
            if world.is_empty(cell) {
                continue;
            }
            world.clear(cell);
            cleared += 1;
        }
    }

    if cleared > 0 {
        let gained = cleared as f32 * TERRAIN_ENERGY_PER_CELL;
        if let Some(well) = wells.state_at_mut(idx) {
            well.energy += gained;
        }
        tracing::trace!("Well {:?} cleared {} terrain cells", owner, cleared);
        events.push(WellEvent::TerrainCleared {
            well: owner,
            cells: cleared,
            gained,
        });
    }
    cleared
}
