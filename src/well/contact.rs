//! Collision-start hook for wells
//!
//! Bounce physics is the solver's job. This seam exists for
//! containment-specific reactions; the stock handler does nothing.

use crate::core::types::EntityId;
use crate::well::state::WellState;

/// A physics contact between a well's owner and another entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub well_owner: EntityId,
    pub other: EntityId,
}

/// Reaction to a well touching something
///
/// Never invoked for wells already claimed by a rival.
pub trait ContactHandler {
    fn on_contact(&mut self, contact: Contact, well: &mut WellState);
}

/// Handler that leaves everything to the physics solver
#[derive(Debug, Default, Clone, Copy)]
pub struct InertContact;

impl ContactHandler for InertContact {
    fn on_contact(&mut self, _contact: Contact, _well: &mut WellState) {}
}
