//! Classification of entities found inside a well's destroy radius

use crate::core::types::{EntityId, Tag};
use crate::well::registry::WellRegistry;
use crate::world::providers::EntityStore;

/// Tags that make an entity immune to consumption
const DESTROY_IMMUNE_TAGS: [Tag; 4] = [
    Tag::GridRoot,
    Tag::Ghost,
    Tag::ContainmentField,
    Tag::ContainmentGenerator,
];

/// Tags that keep an entity from being pulled
pub const PULL_IMMUNE_TAGS: [Tag; 3] = [Tag::Ghost, Tag::GridRoot, Tag::MapRoot];

/// What a well does with an entity in its destroy radius
///
/// Precedence: immune > rival well > food > ordinary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Target {
    /// Left alone, no energy change
    Immune,
    /// Another well; merged into the consumer
    RivalWell,
    /// Consumed for its carried energy
    Food(f32),
    /// Consumed for the flat gain
    Ordinary,
}

impl Target {
    /// Classify `entity` as seen by the well owned by `owner`
    ///
    /// Rival detection goes through the registry: an entity the store tags as
    /// a well but that has no registered state is treated as ordinary.
    pub fn classify<S: EntityStore + ?Sized>(
        owner: EntityId,
        entity: EntityId,
        store: &S,
        wells: &WellRegistry,
    ) -> Self {
        if entity == owner || DESTROY_IMMUNE_TAGS.iter().any(|&tag| store.has_tag(entity, tag)) {
            return Target::Immune;
        }
        if wells.contains(entity) {
            return Target::RivalWell;
        }
        match store.consumable_energy(entity) {
            Some(energy) => Target::Food(energy),
            None => Target::Ordinary,
        }
    }
}
