use ember_core::{EntityId, Transform};
use tracing::debug;

use crate::behavior::Behavior;
use crate::component::{Component, SparseSet};
use crate::components::{Camera, Collider, Physics, Sprite};
use crate::entity::{Entity, EntityAllocator};

/// One sparse set per component kind, indexed by entity slot.
#[derive(Default)]
pub struct Components {
    pub transforms: SparseSet<Transform>,
    pub sprites: SparseSet<Sprite>,
    pub physics: SparseSet<Physics>,
    pub colliders: SparseSet<Collider>,
    pub behaviors: SparseSet<Behavior>,
    pub cameras: SparseSet<Camera>,
}

impl Components {
    fn remove_all(&mut self, index: u32) {
        self.transforms.remove(index);
        self.sprites.remove(index);
        self.physics.remove(index);
        self.colliders.remove(index);
        self.behaviors.remove(index);
        self.cameras.remove(index);
    }
}

/// The central ECS container. Owns all entities and their components.
///
/// Every accessor answers a missing entity or component with `None`/`false`;
/// absence is an ordinary state, never an error.
#[derive(Default)]
pub struct World {
    entities: EntityAllocator,
    components: Components,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- Entity management ----

    /// Spawn a new entity with no components.
    pub fn spawn(&mut self) -> EntityId {
        self.entities.allocate().id
    }

    /// Despawn an entity, removing all its components. Unknown ids are ignored.
    pub fn despawn(&mut self, id: EntityId) -> bool {
        let Some(index) = self.entities.deallocate(id) else {
            return false;
        };
        self.components.remove_all(index);
        debug!(entity = %id, "despawned entity");
        true
    }

    /// Check whether an entity is alive.
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.entities.is_alive(id)
    }

    /// Number of alive entities.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Live entities in creation order.
    pub fn entities(&self) -> &[Entity] {
        self.entities.live()
    }

    /// Snapshot of live ids in creation order, safe to hold while mutating the world.
    pub fn ids(&self) -> Vec<EntityId> {
        self.entities.live().iter().map(|e| e.id).collect()
    }

    /// Resolve an id to its live entity handle.
    pub fn entity(&self, id: EntityId) -> Option<Entity> {
        self.entities.get(id)
    }

    // ---- Component management ----

    /// Insert a component on an entity, replacing any existing component of
    /// the same kind. Returns `false` (and stores nothing) if the entity is gone.
    pub fn insert<T: Component>(&mut self, id: EntityId, component: T) -> bool {
        let Some(entity) = self.entities.get(id) else {
            debug!(entity = %id, kind = T::NAME, "ignoring insert on dead entity");
            return false;
        };
        T::storage_mut(&mut self.components).insert(entity.index, component);
        true
    }

    /// Get an immutable reference to a component on an entity.
    pub fn get<T: Component>(&self, id: EntityId) -> Option<&T> {
        let entity = self.entities.get(id)?;
        T::storage(&self.components).get(entity.index)
    }

    /// Get a mutable reference to a component on an entity.
    pub fn get_mut<T: Component>(&mut self, id: EntityId) -> Option<&mut T> {
        let entity = self.entities.get(id)?;
        T::storage_mut(&mut self.components).get_mut(entity.index)
    }

    /// Remove a component from an entity, returning it if it was present.
    pub fn remove<T: Component>(&mut self, id: EntityId) -> Option<T> {
        let entity = self.entities.get(id)?;
        T::storage_mut(&mut self.components).take(entity.index)
    }

    /// Check whether an entity has a component of the given kind.
    pub fn has<T: Component>(&self, id: EntityId) -> bool {
        self.entities
            .get(id)
            .is_some_and(|e| T::storage(&self.components).has(e.index))
    }

    /// First live entity, in creation order, that has both component kinds.
    pub fn find_with<A: Component, B: Component>(&self) -> Option<EntityId> {
        self.entities
            .live()
            .iter()
            .find(|e| {
                A::storage(&self.components).has(e.index)
                    && B::storage(&self.components).has(e.index)
            })
            .map(|e| e.id)
    }

    // ---- Split access for systems ----

    /// Live entities alongside mutable access to every component set, so a
    /// system can borrow several kinds at once.
    pub fn split_mut(&mut self) -> (&[Entity], &mut Components) {
        (self.entities.live(), &mut self.components)
    }

    /// Read-only counterpart of [`World::split_mut`].
    pub fn split(&self) -> (&[Entity], &Components) {
        (self.entities.live(), &self.components)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::Vec2;

    #[test]
    fn spawn_and_despawn() {
        let mut world = World::new();
        let e = world.spawn();
        assert!(world.is_alive(e));
        assert_eq!(world.entity_count(), 1);
        assert!(world.despawn(e));
        assert!(!world.is_alive(e));
        assert_eq!(world.entity_count(), 0);
        assert!(!world.despawn(e));
    }

    #[test]
    fn insert_get_remove_component() {
        let mut world = World::new();
        let e = world.spawn();
        world.insert(e, Transform::from_xy(1.0, 2.0));
        assert_eq!(
            world.get::<Transform>(e).map(|t| t.position),
            Some(Vec2::new(1.0, 2.0))
        );
        assert!(world.has::<Transform>(e));
        assert!(world.remove::<Transform>(e).is_some());
        assert!(!world.has::<Transform>(e));
        assert!(world.get::<Physics>(e).is_none());
    }

    #[test]
    fn insert_replaces_same_kind() {
        let mut world = World::new();
        let e = world.spawn();
        world.insert(e, Collider::dynamic(10.0, 10.0));
        world.insert(e, Collider::fixed(20.0, 5.0));
        let c = world.get::<Collider>(e).unwrap();
        assert!(c.is_static);
        assert_eq!(c.size, Vec2::new(20.0, 5.0));
    }

    #[test]
    fn component_mutation() {
        let mut world = World::new();
        let e = world.spawn();
        world.insert(e, Physics::default());
        world.get_mut::<Physics>(e).unwrap().velocity.x = 5.0;
        assert_eq!(world.get::<Physics>(e).unwrap().velocity.x, 5.0);
    }

    #[test]
    fn insert_on_dead_entity_is_ignored() {
        let mut world = World::new();
        let e = world.spawn();
        world.despawn(e);
        assert!(!world.insert(e, Physics::default()));
        assert!(world.get::<Physics>(e).is_none());
    }

    #[test]
    fn despawn_removes_components() {
        let mut world = World::new();
        let e = world.spawn();
        world.insert(e, Transform::default());
        world.insert(e, Physics::default());
        world.despawn(e);

        let reused = world.spawn();
        assert_ne!(reused, e);
        assert!(world.get::<Transform>(reused).is_none());
        assert!(world.get::<Physics>(reused).is_none());
        assert!(world.get::<Transform>(e).is_none());
    }

    #[test]
    fn ids_are_unique_across_interleaved_destroys() {
        let mut world = World::new();
        let mut created = Vec::new();
        for k in 0..20 {
            let id = world.spawn();
            created.push(id);
            if k % 2 == 1 {
                world.despawn(created[k - 1]);
            }
        }
        let mut sorted = created.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 20);
        assert!(created.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn find_with_uses_creation_order() {
        let mut world = World::new();
        let a = world.spawn();
        let b = world.spawn();
        let c = world.spawn();
        world.insert(a, Transform::default());
        world.insert(b, Transform::default());
        world.insert(b, Physics::default());
        world.insert(c, Transform::default());
        world.insert(c, Physics::default());

        assert_eq!(world.find_with::<Transform, Physics>(), Some(b));
        world.despawn(b);
        assert_eq!(world.find_with::<Transform, Physics>(), Some(c));
    }

    #[test]
    fn physics_without_transform_is_not_matched() {
        let mut world = World::new();
        let e = world.spawn();
        world.insert(e, Physics::default());
        assert_eq!(world.find_with::<Transform, Physics>(), None);
    }
}
