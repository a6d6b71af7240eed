//! Entity implementation
//!
//! Entities are generational handles: a slot index plus a version that is
//! bumped every time the slot is freed. A handle to a despawned entity never
//! aliases a newer one, even after its slot has been reused.

use slotmap::Key;
use std::fmt;

slotmap::new_key_type! {
    /// Entity identifier
    pub struct Entity;
}

impl Entity {
    /// Slot index of this entity
    pub fn index(&self) -> u32 {
        (self.data().as_ffi() & 0xffff_ffff) as u32
    }

    /// Generation counter of the slot at the time this entity was created
    pub fn generation(&self) -> u32 {
        (self.data().as_ffi() >> 32) as u32
    }

    /// Packed `(generation << 32) | index` value, unique within a scene
    pub fn id(&self) -> u64 {
        self.data().as_ffi()
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index(), self.generation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn test_reused_slot_gets_new_generation() {
        let mut entities: SlotMap<Entity, ()> = SlotMap::with_key();
        let first = entities.insert(());
        entities.remove(first);
        let second = entities.insert(());

        assert_eq!(first.index(), second.index());
        assert_ne!(first.generation(), second.generation());
        assert_ne!(first, second);
        assert_ne!(first.id(), second.id());
    }

    #[test]
    fn test_null_entity_is_distinct() {
        let mut entities: SlotMap<Entity, ()> = SlotMap::with_key();
        let entity = entities.insert(());
        assert_ne!(entity, Entity::null());
        assert!(Entity::null().is_null());
    }
}
