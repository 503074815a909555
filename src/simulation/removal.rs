//! Deferred removal requests collected during a gravity pass

use ahash::AHashSet;

use crate::core::types::EntityId;
use crate::world::providers::EntityStore;

/// Entities claimed during the current pass, in claim order
///
/// Doubles as the "already handled" set: a claimed entity is skipped by every
/// later well in the same pass.
#[derive(Debug, Default)]
pub struct RemovalQueue {
    order: Vec<EntityId>,
    queued: AHashSet<EntityId>,
}

impl RemovalQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `entity`. Returns false if it was already claimed.
    pub fn push(&mut self, entity: EntityId) -> bool {
        if !self.queued.insert(entity) {
            return false;
        }
        self.order.push(entity);
        true
    }

    pub fn contains(&self, entity: EntityId) -> bool {
        self.queued.contains(&entity)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Hand every claimed entity to the store, leaving the queue empty
    pub fn drain_into<S: EntityStore + ?Sized>(&mut self, store: &mut S) -> usize {
        let count = self.order.len();
        for entity in self.order.drain(..) {
            store.queue_removal(entity);
        }
        self.queued.clear();
        count
    }
}
