//! Gravity well state and the rules for what a well may touch

pub mod contact;
pub mod registry;
pub mod state;
pub mod target;

pub use contact::{Contact, ContactHandler, InertContact};
pub use registry::WellRegistry;
pub use state::WellState;
pub use target::Target;
