//! World access: the provider traits and the in-memory sandbox

pub mod providers;
pub mod sandbox;

pub use providers::{EntityStore, PhysicsAccess, SpatialQuery, TerrainProvider, WellWorld};
pub use sandbox::{SandboxEntity, SandboxWorld, Tile};
