//! Sparse hash grid for efficient spatial queries

use ahash::AHashMap;
use glam::Vec2;

use crate::core::types::EntityId;

/// Sparse hash grid for radius queries over point entities
pub struct SparseHashGrid {
    cell_size: f32,
    cells: AHashMap<(i32, i32), Vec<EntityId>>,
    positions: AHashMap<EntityId, Vec2>,
}

impl SparseHashGrid {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            cells: AHashMap::new(),
            positions: AHashMap::new(),
        }
    }

    #[inline]
    fn cell_coord(&self, pos: Vec2) -> (i32, i32) {
        (
            (pos.x / self.cell_size).floor() as i32,
            (pos.y / self.cell_size).floor() as i32,
        )
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.positions.clear();
    }

    pub fn insert(&mut self, entity: EntityId, pos: Vec2) {
        if self.positions.contains_key(&entity) {
            self.remove(entity);
        }
        let coord = self.cell_coord(pos);
        self.cells.entry(coord).or_default().push(entity);
        self.positions.insert(entity, pos);
    }

    pub fn remove(&mut self, entity: EntityId) {
        let Some(pos) = self.positions.remove(&entity) else {
            return;
        };
        let coord = self.cell_coord(pos);
        if let Some(cell) = self.cells.get_mut(&coord) {
            cell.retain(|&e| e != entity);
            if cell.is_empty() {
                self.cells.remove(&coord);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Query entities within radius (inclusive)
    pub fn query_radius(&self, center: Vec2, radius: f32) -> Vec<EntityId> {
        if radius < 0.0 {
            return Vec::new();
        }
        let radius_sq = radius * radius;
        let (min_x, min_y) = self.cell_coord(center - Vec2::splat(radius));
        let (max_x, max_y) = self.cell_coord(center + Vec2::splat(radius));

        let mut found = Vec::new();
        for cx in min_x..=max_x {
            for cy in min_y..=max_y {
                let Some(cell) = self.cells.get(&(cx, cy)) else {
                    continue;
                };
                found.extend(cell.iter().copied().filter(|entity| {
                    self.positions
                        .get(entity)
                        .map(|pos| pos.distance_squared(center) <= radius_sq)
                        .unwrap_or(false)
                }));
            }
        }
        found
    }

    /// Rebuild grid from positions
    pub fn rebuild(&mut self, entities: impl Iterator<Item = (EntityId, Vec2)>) {
        self.clear();
        for (entity, pos) in entities {
            self.insert(entity, pos);
        }
    }
}
