pub mod clock;
pub mod destruction;
pub mod engine;
pub mod events;
pub mod pull;
pub mod removal;
pub mod terrain;

pub use engine::WellEngine;
pub use events::{Timer, WellEvent};
pub use removal::RemovalQueue;
