//! Ordered storage for live wells
//!
//! Wells are visited in registration order, which keeps merge resolution
//! deterministic when two wells discover each other in the same pass.

use ahash::AHashMap;

use crate::core::error::{Result, WellError};
use crate::core::types::EntityId;
use crate::well::state::WellState;

/// All wells known to the engine, keyed by owning entity
#[derive(Debug, Default)]
pub struct WellRegistry {
    owners: Vec<EntityId>,
    states: Vec<WellState>,
    index: AHashMap<EntityId, usize>,
}

impl WellRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a well to `owner`
    pub fn register(&mut self, owner: EntityId, state: WellState) -> Result<()> {
        if self.index.contains_key(&owner) {
            return Err(WellError::DuplicateWell(owner));
        }
        self.index.insert(owner, self.owners.len());
        self.owners.push(owner);
        self.states.push(state);
        Ok(())
    }

    /// Detach the well owned by `owner`, preserving the order of the rest
    pub fn remove(&mut self, owner: EntityId) -> Option<WellState> {
        let idx = self.index.remove(&owner)?;
        self.owners.remove(idx);
        let state = self.states.remove(idx);
        for (i, id) in self.owners.iter().enumerate().skip(idx) {
            self.index.insert(*id, i);
        }
        Some(state)
    }

    pub fn contains(&self, owner: EntityId) -> bool {
        self.index.contains_key(&owner)
    }

    pub fn index_of(&self, owner: EntityId) -> Option<usize> {
        self.index.get(&owner).copied()
    }

    pub fn get(&self, owner: EntityId) -> Option<&WellState> {
        self.index_of(owner).and_then(|i| self.states.get(i))
    }

    pub fn get_mut(&mut self, owner: EntityId) -> Option<&mut WellState> {
        let idx = self.index_of(owner)?;
        self.states.get_mut(idx)
    }

    pub fn owner_at(&self, idx: usize) -> Option<EntityId> {
        self.owners.get(idx).copied()
    }

    pub fn state_at(&self, idx: usize) -> Option<&WellState> {
        self.states.get(idx)
    }

    pub fn state_at_mut(&mut self, idx: usize) -> Option<&mut WellState> {
        self.states.get_mut(idx)
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &WellState)> {
        self.owners.iter().copied().zip(self.states.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut WellState)> {
        self.owners.iter().copied().zip(self.states.iter_mut())
    }
}
