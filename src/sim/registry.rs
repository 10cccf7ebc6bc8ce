//! Actor registry: sole owner of the live entity set
//!
//! Entities are kept in insertion order. Ids increase with insertion and culling
//! preserves order, so lookups by id are a binary search.

use super::actor::ActorId;
use super::entity::Entity;

#[derive(Debug)]
pub struct ActorRegistry {
    entities: Vec<Entity>,
    next_id: u32,
}

impl Default for ActorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ActorRegistry {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            next_id: 1,
        }
    }

    /// Register an entity and hand back its id
    pub fn add(&mut self, entity: impl Into<Entity>) -> ActorId {
        let mut entity = entity.into();
        let id = ActorId(self.next_id);
        self.next_id += 1;
        entity.actor_mut().id = id;
        self.entities.push(entity);
        id
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    /// Apply `f` to every entity in insertion order
    pub fn for_each(&mut self, f: impl FnMut(&mut Entity)) {
        self.entities.iter_mut().for_each(f);
    }

    /// Remove every entity matching `predicate` in one compacting pass.
    /// Returns how many were removed.
    pub fn remove_if(&mut self, mut predicate: impl FnMut(&Entity) -> bool) -> usize {
        let before = self.entities.len();
        self.entities.retain(|entity| !predicate(entity));
        before - self.entities.len()
    }

    /// Drop every dead entity
    pub fn cull_dead(&mut self) -> usize {
        self.remove_if(|entity| !entity.is_alive())
    }

    pub fn get(&self, id: ActorId) -> Option<&Entity> {
        self.index_of(id).map(|i| &self.entities[i])
    }

    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut Entity> {
        self.index_of(id).map(|i| &mut self.entities[i])
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    fn index_of(&self, id: ActorId) -> Option<usize> {
        self.entities.binary_search_by_key(&id, Entity::id).ok()
    }
}
