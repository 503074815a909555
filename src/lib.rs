//! Gravity Well - tick-driven destructive gravity well simulation
//!
//! Wells consume entities and terrain inside their destroy radius, pull
//! movable bodies inside their pull radius, and merge with rival wells they
//! reach. The host game plugs in through the traits in [`world::providers`].

pub mod core;
pub mod simulation;
pub mod spatial;
pub mod well;
pub mod world;

pub use crate::core::{EngineConfig, Result, WellError};
pub use simulation::{WellEngine, WellEvent};
pub use well::WellState;
