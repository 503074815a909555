//! Generic grid for spatial data

use glam::Vec2;

use crate::core::types::{Aabb, Disc};

/// Generic 2D grid with configurable cell size
#[derive(Debug, Clone)]
pub struct Grid<T: Clone + Default> {
    pub width: usize,
    pub height: usize,
    pub cell_size: f32,
    pub origin: Vec2,
    data: Vec<T>,
}

impl<T: Clone + Default> Grid<T> {
    pub fn new(width: usize, height: usize, cell_size: f32, origin: Vec2) -> Self {
        Self {
            width,
            height,
            cell_size,
            origin,
            data: vec![T::default(); width * height],
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        if x < self.width && y < self.height {
            self.data.get(y * self.width + x)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut T> {
        if x < self.width && y < self.height {
            self.data.get_mut(y * self.width + x)
        } else {
            None
        }
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        if let Some(cell) = self.get_mut(x, y) {
            *cell = value;
        }
    }

    /// Fill every cell with `value`
    pub fn fill(&mut self, value: T) {
        self.data.iter_mut().for_each(|cell| *cell = value.clone());
    }

    /// Convert world position to (unclamped) cell coordinates
    #[inline]
    pub fn world_to_cell(&self, pos: Vec2) -> (i32, i32) {
        (
            ((pos.x - self.origin.x) / self.cell_size).floor() as i32,
            ((pos.y - self.origin.y) / self.cell_size).floor() as i32,
        )
    }

    /// Cell center in world coordinates
    pub fn cell_center(&self, x: usize, y: usize) -> Vec2 {
        Vec2::new(
            self.origin.x + (x as f32 + 0.5) * self.cell_size,
            self.origin.y + (y as f32 + 0.5) * self.cell_size,
        )
    }

    /// World-space extent of the whole grid
    pub fn bounds(&self) -> Aabb {
        let size = Vec2::new(self.width as f32, self.height as f32) * self.cell_size;
        Aabb::new(self.origin, self.origin + size)
    }

    /// Cells whose centers lie inside `disc`
    pub fn cells_in_disc(&self, disc: Disc) -> Vec<(usize, usize)> {
        if disc.radius < 0.0 || self.width == 0 || self.height == 0 {
            return Vec::new();
        }
        let bounds = disc.bounding_box();
        let (min_x, min_y) = self.world_to_cell(bounds.min);
        let (max_x, max_y) = self.world_to_cell(bounds.max);
        let clamp_x = |v: i32| v.clamp(0, self.width as i32 - 1) as usize;
        let clamp_y = |v: i32| v.clamp(0, self.height as i32 - 1) as usize;

        let mut cells = Vec::new();
        for y in clamp_y(min_y)..=clamp_y(max_y) {
            for x in clamp_x(min_x)..=clamp_x(max_x) {
                if disc.contains(self.cell_center(x, y)) {
                    cells.push((x, y));
                }
            }
        }
        cells
    }
}
