//! In-memory world implementing every provider trait
//!
//! Stands in for the game's entity store, spatial index, tile grids and
//! physics solver in tests, benchmarks and the headless runner. Physics is a
//! plain Euler integrator: impulses change velocity, `step` moves bodies.

use ahash::{AHashMap, AHashSet};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::types::{Aabb, BodyType, CellRef, Disc, EntityId, GridId, MapId, MapPosition, Tag};
use crate::spatial::grid::Grid;
use crate::spatial::sparse_hash::SparseHashGrid;
use crate::world::providers::{EntityStore, PhysicsAccess, SpatialQuery, TerrainProvider};

/// Cell size of the per-map spatial hash (world units)
const INDEX_CELL_SIZE: f32 = 4.0;

/// Terrain tile contents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tile {
    #[default]
    Empty,
    Floor,
    Wall,
}

/// An entity as the sandbox stores it
#[derive(Debug, Clone, PartialEq)]
pub struct SandboxEntity {
    pub map: MapId,
    pub position: Vec2,
    pub velocity: Vec2,
    /// `None` for entities without a physics body
    pub body: Option<BodyType>,
    pub mass: f32,
    pub tags: Vec<Tag>,
    pub consumable_energy: Option<f32>,
    pub contained: bool,
}

impl SandboxEntity {
    /// Dynamic body of unit mass at rest
    pub fn new(map: MapId, position: Vec2) -> Self {
        Self {
            map,
            position,
            velocity: Vec2::ZERO,
            body: Some(BodyType::Dynamic),
            mass: 1.0,
            tags: Vec::new(),
            consumable_energy: None,
            contained: false,
        }
    }

    pub fn with_body(mut self, body: BodyType) -> Self {
        self.body = Some(body);
        self
    }

    pub fn without_body(mut self) -> Self {
        self.body = None;
        self
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_tag(mut self, tag: Tag) -> Self {
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
        self
    }

    pub fn with_energy(mut self, energy: f32) -> Self {
        self.consumable_energy = Some(energy);
        self
    }

    pub fn contained(mut self) -> Self {
        self.contained = true;
        self
    }
}

/// A tile grid placed on a map
#[derive(Debug, Clone)]
pub struct TerrainGrid {
    pub id: GridId,
    pub map: MapId,
    pub tiles: Grid<Tile>,
}

impl TerrainGrid {
    fn tile(&self, cell: CellRef) -> Option<Tile> {
        let (x, y) = cell_indices(cell)?;
        self.tiles.get(x, y).copied()
    }

    /// Number of non-empty tiles
    pub fn solid_count(&self) -> usize {
        (0..self.tiles.height)
            .flat_map(|y| (0..self.tiles.width).map(move |x| (x, y)))
            .filter(|&(x, y)| self.tiles.get(x, y).is_some_and(|t| *t != Tile::Empty))
            .count()
    }
}

fn cell_indices(cell: CellRef) -> Option<(usize, usize)> {
    Some((usize::try_from(cell.x).ok()?, usize::try_from(cell.y).ok()?))
}

/// In-memory world
#[derive(Default)]
pub struct SandboxWorld {
    next_id: u64,
    entities: AHashMap<EntityId, SandboxEntity>,
    indices: AHashMap<MapId, SparseHashGrid>,
    grids: Vec<TerrainGrid>,
    pending: Vec<EntityId>,
    pending_set: AHashSet<EntityId>,
    impulses: Vec<(EntityId, Vec2)>,
}

impl SandboxWorld {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Default::default()
        }
    }

    pub fn spawn(&mut self, entity: SandboxEntity) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.indices
            .entry(entity.map)
            .or_insert_with(|| SparseHashGrid::new(INDEX_CELL_SIZE))
            .insert(id, entity.position);
        self.entities.insert(id, entity);
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&SandboxEntity> {
        self.entities.get(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Place an empty tile grid on `map` with its minimum corner at `origin`
    pub fn add_grid(
        &mut self,
        map: MapId,
        width: usize,
        height: usize,
        cell_size: f32,
        origin: Vec2,
    ) -> GridId {
        let id = GridId(self.grids.len() as u32);
        self.grids.push(TerrainGrid {
            id,
            map,
            tiles: Grid::new(width, height, cell_size, origin),
        });
        id
    }

    pub fn grid(&self, id: GridId) -> Option<&TerrainGrid> {
        self.grids.get(id.0 as usize)
    }

    pub fn fill_grid(&mut self, id: GridId, tile: Tile) {
        if let Some(grid) = self.grids.get_mut(id.0 as usize) {
            grid.tiles.fill(tile);
        }
    }

    pub fn set_tile(&mut self, cell: CellRef, tile: Tile) {
        let Some((x, y)) = cell_indices(cell) else {
            return;
        };
        if let Some(grid) = self.grids.get_mut(cell.grid.0 as usize) {
            grid.tiles.set(x, y, tile);
        }
    }

    pub fn tile(&self, cell: CellRef) -> Option<Tile> {
        self.grid(cell.grid)?.tile(cell)
    }

    /// Non-empty tiles across every grid
    pub fn solid_tiles(&self) -> usize {
        self.grids.iter().map(TerrainGrid::solid_count).sum()
    }

    /// Entities queued for removal but not yet swept, in queue order
    pub fn pending_removals(&self) -> &[EntityId] {
        &self.pending
    }

    /// Delete every queued entity, returning their ids
    pub fn flush_removals(&mut self) -> Vec<EntityId> {
        let removed: Vec<EntityId> = self.pending.drain(..).collect();
        self.pending_set.clear();
        for id in &removed {
            if let Some(entity) = self.entities.remove(id) {
                if let Some(index) = self.indices.get_mut(&entity.map) {
                    index.remove(*id);
                }
            }
        }
        removed
    }

    /// Every impulse applied since the last `take_impulses`
    pub fn impulses(&self) -> &[(EntityId, Vec2)] {
        &self.impulses
    }

    pub fn take_impulses(&mut self) -> Vec<(EntityId, Vec2)> {
        std::mem::take(&mut self.impulses)
    }

    /// Integrate dynamic bodies and refresh the spatial index
    pub fn step(&mut self, dt: f32) {
        for entity in self.entities.values_mut() {
            if entity.body == Some(BodyType::Dynamic) && !entity.contained {
                entity.position += entity.velocity * dt;
            }
        }

        let mut by_map: AHashMap<MapId, Vec<(EntityId, Vec2)>> = AHashMap::new();
        for (id, entity) in &self.entities {
            by_map.entry(entity.map).or_default().push((*id, entity.position));
        }
        for (map, index) in self.indices.iter_mut() {
            index.rebuild(by_map.remove(map).unwrap_or_default().into_iter());
        }
    }
}

impl SpatialQuery for SandboxWorld {
    fn entities_in_range(&self, map: MapId, position: Vec2, radius: f32) -> Vec<EntityId> {
        self.indices
            .get(&map)
            .map(|index| index.query_radius(position, radius))
            .unwrap_or_default()
    }
}

impl TerrainProvider for SandboxWorld {
    fn grids_intersecting(&self, map: MapId, bounds: Aabb) -> Vec<GridId> {
        self.grids
            .iter()
            .filter(|g| g.map == map && g.tiles.bounds().intersects(&bounds))
            .map(|g| g.id)
            .collect()
    }

    fn cells_intersecting(&self, grid: GridId, disc: Disc) -> Vec<CellRef> {
        let Some(terrain) = self.grid(grid) else {
            return Vec::new();
        };
        terrain
            .tiles
            .cells_in_disc(disc)
            .into_iter()
            .map(|(x, y)| CellRef::new(grid, x as i32, y as i32))
            .collect()
    }

    fn is_empty(&self, cell: CellRef) -> bool {
        self.tile(cell).map_or(true, |t| t == Tile::Empty)
    }

    fn clear(&mut self, cell: CellRef) {
        self.set_tile(cell, Tile::Empty);
    }
}

impl PhysicsAccess for SandboxWorld {
    fn body_type(&self, entity: EntityId) -> Option<BodyType> {
        self.entities.get(&entity).and_then(|e| e.body)
    }

    fn mass(&self, entity: EntityId) -> f32 {
        self.entities.get(&entity).map_or(0.0, |e| e.mass)
    }

    fn world_position(&self, entity: EntityId) -> Option<MapPosition> {
        self.entities
            .get(&entity)
            .map(|e| MapPosition::new(e.map, e.position))
    }

    fn apply_impulse(&mut self, entity: EntityId, impulse: Vec2) {
        let Some(body) = self.entities.get_mut(&entity) else {
            return;
        };
        if body.mass > 0.0 {
            body.velocity += impulse / body.mass;
        }
        self.impulses.push((entity, impulse));
    }
}

impl EntityStore for SandboxWorld {
    fn has_tag(&self, entity: EntityId, tag: Tag) -> bool {
        self.entities
            .get(&entity)
            .is_some_and(|e| e.tags.contains(&tag))
    }

    fn consumable_energy(&self, entity: EntityId) -> Option<f32> {
        self.entities.get(&entity).and_then(|e| e.consumable_energy)
    }

    fn is_contained(&self, entity: EntityId) -> bool {
        self.entities.get(&entity).is_some_and(|e| e.contained)
    }

    fn queue_removal(&mut self, entity: EntityId) {
        if self.entities.contains_key(&entity) && self.pending_set.insert(entity) {
            self.pending.push(entity);
        }
    }

    fn is_queued_for_removal(&self, entity: EntityId) -> bool {
        self.pending_set.contains(&entity)
    }
}
