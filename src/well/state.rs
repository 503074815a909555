//! Per-well mutable state

use serde::{Deserialize, Serialize};

/// State attached to a gravity-well entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellState {
    /// Fuel and size proxy. Not clamped; drain may push it below zero.
    pub energy: f32,
    /// Size tier, drives both radii
    pub level: u32,
    /// Energy lost per decay tick
    pub drain_rate: f32,
    being_deleted_by_rival: bool,
}

impl WellState {
    pub fn new(energy: f32, level: u32, drain_rate: f32) -> Self {
        Self {
            energy,
            level,
            drain_rate,
            being_deleted_by_rival: false,
        }
    }

    /// Radius within which entities and terrain are consumed
    ///
    /// Negative at level 0, which disables destruction entirely.
    #[inline]
    pub fn destroy_radius(&self) -> f32 {
        self.level as f32 - 0.5
    }

    /// Radius within which movable entities are pulled inward
    #[inline]
    pub fn pull_radius(&self) -> f32 {
        2.0 + self.level as f32 * 2.0
    }

    /// True once another well has claimed this one
    #[inline]
    pub fn is_being_deleted_by_rival(&self) -> bool {
        self.being_deleted_by_rival
    }

    /// Mark as claimed by a rival. Idempotent.
    pub fn flag_deleted_by_rival(&mut self) {
        self.being_deleted_by_rival = true;
    }

    /// Remove one decay tick worth of energy
    pub fn drain(&mut self) {
        self.energy -= self.drain_rate;
    }
}
