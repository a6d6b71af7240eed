//! Sparse component storage
//!
//! Each component table is a [`SecondaryMap`] keyed by the generational
//! [`Entity`] handle owned by the world's entity allocator. Lookups are O(1)
//! and a stale handle simply misses.

use slotmap::SecondaryMap;

use super::{Component, Entity};

/// Sparse, entity-keyed table of one component type
#[derive(Debug, Clone)]
pub struct ComponentStorage<T: Component> {
    rows: SecondaryMap<Entity, T>,
}

impl<T: Component> Default for ComponentStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Component> ComponentStorage<T> {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            rows: SecondaryMap::new(),
        }
    }

    /// Insert or replace a row, returning the previous value
    pub fn insert(&mut self, entity: Entity, component: T) -> Option<T> {
        self.rows.insert(entity, component)
    }

    /// Remove a row
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        self.rows.remove(entity)
    }

    /// Borrow a row
    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.rows.get(entity)
    }

    /// Mutably borrow a row
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.rows.get_mut(entity)
    }

    /// Whether `entity` has a row in this table
    pub fn contains(&self, entity: Entity) -> bool {
        self.rows.contains_key(entity)
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate rows in slot order
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.rows.iter()
    }

    /// Mutably iterate rows in slot order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.rows.iter_mut()
    }

    /// Iterate keys in slot order
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.rows.keys()
    }

    /// Drop every row
    pub fn clear(&mut self) {
        self.rows.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[derive(Debug, PartialEq)]
    struct Tag(u32);
    impl Component for Tag {}

    #[test]
    fn test_stale_handle_misses() {
        let mut entities: SlotMap<Entity, ()> = SlotMap::with_key();
        let mut tags = ComponentStorage::new();

        let old = entities.insert(());
        tags.insert(old, Tag(1));
        entities.remove(old);
        tags.remove(old);

        let new = entities.insert(());
        tags.insert(new, Tag(2));

        assert_eq!(tags.get(old), None);
        assert_eq!(tags.get(new), Some(&Tag(2)));
        assert_eq!(tags.len(), 1);
    }
}
