//! Events emitted by `WellEngine::advance`

use glam::Vec2;
use serde::Serialize;

use crate::core::types::EntityId;

/// Which accumulator an event refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Timer {
    Decay,
    Gravity,
}

/// Something a well did during `advance`
///
/// Every well-driven event names the acting well so effects can be
/// attributed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum WellEvent {
    /// Decay tick removed `drain_rate` from a well
    EnergyDrained {
        well: EntityId,
        /// Energy after the drain
        energy: f32,
    },
    /// An ordinary or food entity was queued for removal
    EntityConsumed {
        well: EntityId,
        entity: EntityId,
        gained: f32,
    },
    /// A rival well was merged in and flagged
    WellAbsorbed {
        well: EntityId,
        rival: EntityId,
        /// Zero if the rival was already claimed
        gained: f32,
    },
    /// Non-empty terrain cells were cleared
    TerrainCleared {
        well: EntityId,
        cells: u32,
        gained: f32,
    },
    /// An inward impulse was applied
    EntityPulled {
        well: EntityId,
        entity: EntityId,
        impulse: Vec2,
    },
    /// Level recomputed from the threshold table
    LevelChanged { well: EntityId, from: u32, to: u32 },
    /// Catch-up bound hit; `dropped` passes were discarded
    CatchUpCapped { timer: Timer, dropped: u32 },
}

impl WellEvent {
    /// Well responsible for this event, if any
    pub fn well(&self) -> Option<EntityId> {
        match self {
            WellEvent::EnergyDrained { well, .. }
            | WellEvent::EntityConsumed { well, .. }
            | WellEvent::WellAbsorbed { well, .. }
            | WellEvent::TerrainCleared { well, .. }
            | WellEvent::EntityPulled { well, .. }
            | WellEvent::LevelChanged { well, .. } => Some(*well),
            WellEvent::CatchUpCapped { .. } => None,
        }
    }

    /// True for consumption, terrain clearing, merging and pulling
    pub fn is_destructive_action(&self) -> bool {
        matches!(
            self,
            WellEvent::EntityConsumed { .. }
                | WellEvent::WellAbsorbed { .. }
                | WellEvent::TerrainCleared { .. }
                | WellEvent::EntityPulled { .. }
        )
    }
}
