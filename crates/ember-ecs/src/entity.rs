use std::collections::HashMap;
use std::fmt;

use ember_core::EntityId;

/// A live entity: its public id plus the storage slot its components occupy.
///
/// Slots are recycled after destruction; ids are not.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Entity {
    pub(crate) id: EntityId,
    pub(crate) index: u32,
}

impl Entity {
    /// The public, never-reused id of this entity.
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// The storage slot of this entity.
    pub fn index(&self) -> u32 {
        self.index
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({}@{})", self.id.0, self.index)
    }
}

/// Hands out entity ids and storage slots, and remembers creation order.
pub struct EntityAllocator {
    next_id: u64,
    /// Live entities in creation order.
    live: Vec<Entity>,
    slots: HashMap<EntityId, u32>,
    free_list: Vec<u32>,
    slot_count: u32,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            live: Vec::new(),
            slots: HashMap::new(),
            free_list: Vec::new(),
            slot_count: 0,
        }
    }

    /// Allocate a new entity, reusing a freed storage slot if available.
    pub fn allocate(&mut self) -> Entity {
        let id = EntityId(self.next_id);
        self.next_id += 1;

        let index = self.free_list.pop().unwrap_or_else(|| {
            let index = self.slot_count;
            self.slot_count += 1;
            index
        });

        let entity = Entity { id, index };
        self.slots.insert(id, index);
        self.live.push(entity);
        entity
    }

    /// Deallocate an entity. Returns the slot it occupied if it was alive.
    pub fn deallocate(&mut self, id: EntityId) -> Option<u32> {
        let index = self.slots.remove(&id)?;
        // Ids are allocated in increasing order, so `live` is sorted by id.
        if let Ok(pos) = self.live.binary_search_by_key(&id, |e| e.id) {
            self.live.remove(pos);
        }
        self.free_list.push(index);
        Some(index)
    }

    /// Resolve an id to its live entity.
    pub fn get(&self, id: EntityId) -> Option<Entity> {
        self.slots.get(&id).map(|&index| Entity { id, index })
    }

    /// Check if an entity is currently alive.
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.slots.contains_key(&id)
    }

    /// Live entities in creation order.
    pub fn live(&self) -> &[Entity] {
        &self.live
    }

    /// Number of currently alive entities.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Whether there are no alive entities.
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self::new()
    }
}
