//! Core type definitions used throughout the codebase

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Unique identifier for entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

/// Map (world partition) identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MapId(pub u32);

/// Terrain grid identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridId(pub u32);

/// A single cell on a terrain grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRef {
    pub grid: GridId,
    pub x: i32,
    pub y: i32,
}

impl CellRef {
    pub fn new(grid: GridId, x: i32, y: i32) -> Self {
        Self { grid, x, y }
    }
}

/// World position qualified by the map it lives on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapPosition {
    pub map: MapId,
    pub position: Vec2,
}

impl MapPosition {
    pub fn new(map: MapId, position: Vec2) -> Self {
        Self { map, position }
    }
}

/// Physics body type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyType {
    Static,
    Dynamic,
}

/// Marker components consulted when deciding what a well may touch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    /// Ghosts and observers
    Ghost,
    /// Root entity of a terrain grid
    GridRoot,
    /// Root entity of a map
    MapRoot,
    /// Containment field segment
    ContainmentField,
    /// Generator powering a containment field
    ContainmentGenerator,
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }
}

/// Circle in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Disc {
    pub center: Vec2,
    pub radius: f32,
}

impl Disc {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Inclusive containment test
    pub fn contains(&self, point: Vec2) -> bool {
        self.center.distance_squared(point) <= self.radius * self.radius
    }

    pub fn bounding_box(&self) -> Aabb {
        let extent = Vec2::splat(self.radius);
        Aabb::new(self.center - extent, self.center + extent)
    }
}
