//! Interfaces the engine consumes from the surrounding game
//!
//! The engine never reaches for globals: everything it reads or mutates goes
//! through these traits, implemented by whatever owns entities, terrain and
//! physics. `SandboxWorld` is the in-memory implementation.

use glam::Vec2;

use crate::core::types::{Aabb, BodyType, CellRef, Disc, EntityId, GridId, MapId, MapPosition, Tag};

/// Broad-phase spatial lookup
pub trait SpatialQuery {
    /// Entities overlapping the disc, radius inclusive, in unspecified order
    ///
    /// An unknown map yields an empty set.
    fn entities_in_range(&self, map: MapId, position: Vec2, radius: f32) -> Vec<EntityId>;
}

/// Tile grids that wells can eat
pub trait TerrainProvider {
    fn grids_intersecting(&self, map: MapId, bounds: Aabb) -> Vec<GridId>;

    /// Cells of `grid` whose centers lie inside `disc`
    fn cells_intersecting(&self, grid: GridId, disc: Disc) -> Vec<CellRef>;

    fn is_empty(&self, cell: CellRef) -> bool;

    fn clear(&mut self, cell: CellRef);
}

/// Access to the physics solver's bodies
pub trait PhysicsAccess {
    /// `None` when the entity has no physics body
    fn body_type(&self, entity: EntityId) -> Option<BodyType>;

    fn mass(&self, entity: EntityId) -> f32;

    /// `None` when the entity has no transform
    fn world_position(&self, entity: EntityId) -> Option<MapPosition>;

    fn apply_impulse(&mut self, entity: EntityId, impulse: Vec2);
}

/// Component checks and deferred deletion
pub trait EntityStore {
    fn has_tag(&self, entity: EntityId, tag: Tag) -> bool;

    /// Energy granted to a well that consumes this entity, if it carries any
    fn consumable_energy(&self, entity: EntityId) -> Option<f32>;

    /// True if the entity sits inside a container (inventory, locker, ...)
    fn is_contained(&self, entity: EntityId) -> bool;

    /// Schedule removal; the store deletes the entity after the pass
    fn queue_removal(&mut self, entity: EntityId);

    /// True between `queue_removal` and the store's sweep
    fn is_queued_for_removal(&self, entity: EntityId) -> bool;
}

/// Everything a well engine needs from the world
pub trait WellWorld: SpatialQuery + TerrainProvider + PhysicsAccess + EntityStore {}

impl<T> WellWorld for T where T: SpatialQuery + TerrainProvider + PhysicsAccess + EntityStore {}
