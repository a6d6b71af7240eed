//! ECS World implementation
//!
//! Owns the entity allocator and the per-type component tables. Bodies are
//! spawned with their transform in one call and despawned from every table
//! at once, so the tables never disagree about which entities exist.

use slotmap::SlotMap;

use super::components::{ControllerComponent, SphericalBody, TransformComponent};
use super::storage::ComponentStorage;
use super::Entity;

/// Mutable view of the tables the physics pass works on
pub struct PhysicsTables<'a> {
    /// Body centers
    pub transforms: &'a mut ComponentStorage<TransformComponent>,
    /// Body velocities, radii and states
    pub bodies: &'a mut ComponentStorage<SphericalBody>,
    /// Input-driven bodies
    pub controllers: &'a ComponentStorage<ControllerComponent>,
}

/// ECS World containing all entities and components
#[derive(Debug, Clone, Default)]
pub struct World {
    entities: SlotMap<Entity, ()>,
    transforms: ComponentStorage<TransformComponent>,
    bodies: ComponentStorage<SphericalBody>,
    controllers: ComponentStorage<ControllerComponent>,
}

impl World {
    /// Create a new world
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a bare entity (used for terrain pieces)
    ///
    /// # Panics
    /// When the entity space is exhausted.
    pub fn create_entity(&mut self) -> Entity {
        self.entities.insert(())
    }

    /// Spawn a physics-driven sphere
    pub fn spawn_body(&mut self, transform: TransformComponent, body: SphericalBody) -> Entity {
        let entity = self.create_entity();
        self.transforms.insert(entity, transform);
        self.bodies.insert(entity, body);
        log::trace!("spawned body {}", entity);
        entity
    }

    /// Spawn a physics-driven sphere that also follows tick input
    pub fn spawn_controlled_body(
        &mut self,
        transform: TransformComponent,
        body: SphericalBody,
        controller: ControllerComponent,
    ) -> Entity {
        let entity = self.spawn_body(transform, body);
        self.controllers.insert(entity, controller);
        entity
    }

    /// Remove an entity and all of its rows; false if it was already gone
    pub fn despawn(&mut self, entity: Entity) -> bool {
        if self.entities.remove(entity).is_none() {
            return false;
        }
        self.transforms.remove(entity);
        self.bodies.remove(entity);
        self.controllers.remove(entity);
        log::trace!("despawned {}", entity);
        true
    }

    /// Whether `entity` is alive
    pub fn contains(&self, entity: Entity) -> bool {
        self.entities.contains_key(entity)
    }

    /// Number of live entities, terrain pieces included
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Number of spherical bodies
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Iterate live entities in slot order
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.keys()
    }

    /// Transform of `entity`
    pub fn transform(&self, entity: Entity) -> Option<&TransformComponent> {
        self.transforms.get(entity)
    }

    /// Mutable transform of `entity`
    pub fn transform_mut(&mut self, entity: Entity) -> Option<&mut TransformComponent> {
        self.transforms.get_mut(entity)
    }

    /// All transforms
    pub fn transforms(&self) -> impl Iterator<Item = (Entity, &TransformComponent)> {
        self.transforms.iter()
    }

    /// Body of `entity`
    pub fn body(&self, entity: Entity) -> Option<&SphericalBody> {
        self.bodies.get(entity)
    }

    /// Mutable body of `entity`
    pub fn body_mut(&mut self, entity: Entity) -> Option<&mut SphericalBody> {
        self.bodies.get_mut(entity)
    }

    /// All bodies
    pub fn bodies(&self) -> impl Iterator<Item = (Entity, &SphericalBody)> {
        self.bodies.iter()
    }

    /// Controller of `entity`
    pub fn controller(&self, entity: Entity) -> Option<&ControllerComponent> {
        self.controllers.get(entity)
    }

    /// Split borrow of the tables the physics and input passes touch
    pub fn physics_tables(&mut self) -> PhysicsTables<'_> {
        PhysicsTables {
            transforms: &mut self.transforms,
            bodies: &mut self.bodies,
            controllers: &self.controllers,
        }
    }

    /// Despawn everything
    ///
    /// Slots are kept with bumped generations, so handles from before the
    /// clear never resolve again.
    pub fn clear(&mut self) {
        self.entities.clear();
        self.transforms.clear();
        self.bodies.clear();
        self.controllers.clear();
    }

    /// Check that the tables agree with each other and with the allocator
    ///
    /// # Panics
    /// When a body has no transform, a controller has no body, or any row
    /// belongs to a dead entity.
    pub fn assert_consistent(&self) {
        for entity in self.bodies.entities() {
            assert!(self.contains(entity), "body row for dead entity {entity}");
            assert!(
                self.transforms.contains(entity),
                "body {entity} has no transform"
            );
        }
        for entity in self.transforms.entities() {
            assert!(self.contains(entity), "transform row for dead entity {entity}");
        }
        for entity in self.controllers.entities() {
            assert!(
                self.bodies.contains(entity),
                "controller {entity} has no body"
            );
        }
    }
}
