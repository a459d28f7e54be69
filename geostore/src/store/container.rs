//! Named, thread-safe entity container.
//!
//! # Thread Safety
//!
//! Each container owns its own `RwLock`; every mutation (single or batch)
//! happens inside one write-lock section, so concurrent callers observe a
//! consistent before/after state. Change events are emitted after the data
//! lock is released, which lets subscribers read the container from their
//! callback.
//!
//! Mutations also hold a per-container delivery lock from before the write
//! until their events are delivered, so subscribers see events in commit
//! order. The delivery lock is reentrant: a subscriber may mutate the same
//! container from its callback on the delivering thread.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{ReentrantMutex, RwLock};
use tracing::debug;

use super::entity::GeoEntity;
use super::error::StoreError;
use super::event::{
    ChangeEvent, ChangeKind, ChangeListener, ListenerError, ListenerSet, SubscriptionId,
};

/// An independent, named collection of geo-tagged entities.
pub struct Container {
    name: String,
    entities: RwLock<HashMap<String, GeoEntity>>,
    listeners: ListenerSet,
    /// Held across commit and event delivery of each mutation
    delivery: ReentrantMutex<()>,
}

impl Container {
    /// Create an empty, detached container.
    ///
    /// Containers are normally obtained from a
    /// [`ContainerRegistry`](super::ContainerRegistry).
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entities: RwLock::new(HashMap::new()),
            listeners: ListenerSet::new(),
            delivery: ReentrantMutex::new(()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Insert a new entity.
    ///
    /// Fails with [`StoreError::Duplicate`] if the id is already present and
    /// with [`StoreError::Validation`] if the id is blank.
    pub fn add(&self, entity: GeoEntity) -> Result<(), StoreError> {
        validate_id(&entity.id)?;
        let id = entity.id.clone();
        let _delivery = self.delivery.lock();

        match self.entities.write().entry(id.clone()) {
            Entry::Occupied(_) => {
                return Err(StoreError::Duplicate {
                    container: self.name.clone(),
                    id,
                })
            }
            Entry::Vacant(slot) => {
                slot.insert(entity);
            }
        }

        debug!(container = %self.name, id = %id, "Entity added");
        self.emit(ChangeKind::Added { id });
        Ok(())
    }

    /// Insert every entity whose id is not already present.
    ///
    /// Collisions (with existing data or earlier in the same batch) and blank
    /// ids are skipped rather than reported. Returns the number inserted.
    pub fn add_batch(&self, entities: impl IntoIterator<Item = GeoEntity>) -> usize {
        let _delivery = self.delivery.lock();
        let inserted = {
            let mut map = self.entities.write();
            insert_new(&mut map, entities)
        };

        if inserted > 0 {
            debug!(container = %self.name, inserted, "Batch loaded");
            self.emit(ChangeKind::BulkLoaded { count: inserted });
        }
        inserted
    }

    /// Get a copy of the entity with the given id.
    pub fn get(&self, id: &str) -> Option<GeoEntity> {
        self.entities.read().get(id).cloned()
    }

    /// Copy of every entity, ordered by id.
    pub fn get_all(&self) -> Vec<GeoEntity> {
        let mut all: Vec<GeoEntity> = self.entities.read().values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    /// Ids currently stored, ordered.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.entities.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entities.read().contains_key(id)
    }

    /// Replace an existing entity.
    pub fn update(&self, entity: GeoEntity) -> Result<(), StoreError> {
        let id = entity.id.clone();
        let _delivery = self.delivery.lock();

        match self.entities.write().get_mut(&id) {
            Some(existing) => *existing = entity,
            None => return Err(StoreError::entity_not_found(&id)),
        }

        debug!(container = %self.name, id = %id, "Entity updated");
        self.emit(ChangeKind::Updated { id });
        Ok(())
    }

    /// Edit an existing entity in place.
    ///
    /// `edit` runs under the write lock against the current stored value, so
    /// concurrent changes to other fields are not lost. The id cannot be
    /// changed this way.
    pub fn modify<F>(&self, id: &str, edit: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut GeoEntity),
    {
        let _delivery = self.delivery.lock();

        match self.entities.write().get_mut(id) {
            Some(existing) => {
                edit(existing);
                existing.id = id.to_string();
            }
            None => return Err(StoreError::entity_not_found(id)),
        }

        debug!(container = %self.name, id = %id, "Entity modified");
        self.emit(ChangeKind::Updated { id: id.to_string() });
        Ok(())
    }

    /// Remove an entity, returning it.
    pub fn remove(&self, id: &str) -> Result<GeoEntity, StoreError> {
        let _delivery = self.delivery.lock();
        let removed = self
            .entities
            .write()
            .remove(id)
            .ok_or_else(|| StoreError::entity_not_found(id))?;

        debug!(container = %self.name, id = %id, "Entity removed");
        self.emit(ChangeKind::Removed { id: id.to_string() });
        Ok(removed)
    }

    /// Remove every entity. Returns how many were removed.
    ///
    /// Clearing an empty container succeeds without emitting an event.
    pub fn clear(&self) -> usize {
        let _delivery = self.delivery.lock();
        let count = {
            let mut map = self.entities.write();
            let count = map.len();
            map.clear();
            count
        };

        if count > 0 {
            debug!(container = %self.name, count, "Container cleared");
            self.emit(ChangeKind::Cleared { count });
        }
        count
    }

    /// Atomically clear the container and bulk-insert `entities`.
    ///
    /// Emits `Cleared` (if anything was removed) followed by `BulkLoaded`
    /// (if anything was inserted). Returns the number inserted.
    pub fn replace_all(&self, entities: impl IntoIterator<Item = GeoEntity>) -> usize {
        let _delivery = self.delivery.lock();
        let (cleared, inserted) = {
            let mut map = self.entities.write();
            let cleared = map.len();
            map.clear();
            (cleared, insert_new(&mut map, entities))
        };

        debug!(container = %self.name, cleared, inserted, "Container contents replaced");
        if cleared > 0 {
            self.emit(ChangeKind::Cleared { count: cleared });
        }
        if inserted > 0 {
            self.emit(ChangeKind::BulkLoaded { count: inserted });
        }
        inserted
    }

    pub fn count(&self) -> usize {
        self.entities.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.read().is_empty()
    }

    /// Register a change callback. Callbacks run in registration order.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&ChangeEvent) -> Result<(), ListenerError> + Send + Sync + 'static,
    {
        self.listeners.subscribe_fn(callback)
    }

    /// Register a shared listener object.
    pub fn subscribe_listener(&self, listener: Arc<dyn ChangeListener>) -> SubscriptionId {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    fn emit(&self, kind: ChangeKind) {
        self.listeners.notify(&ChangeEvent::new(self.name.clone(), kind));
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("name", &self.name)
            .field("count", &self.count())
            .field("subscribers", &self.listeners.len())
            .finish()
    }
}

fn validate_id(id: &str) -> Result<(), StoreError> {
    if id.trim().is_empty() {
        return Err(StoreError::Validation(
            "Entity id must not be blank".to_string(),
        ));
    }
    Ok(())
}

fn insert_new(
    map: &mut HashMap<String, GeoEntity>,
    entities: impl IntoIterator<Item = GeoEntity>,
) -> usize {
    let mut inserted = 0;
    for entity in entities {
        if validate_id(&entity.id).is_err() {
            continue;
        }
        if let Entry::Vacant(slot) = map.entry(entity.id.clone()) {
            slot.insert(entity);
            inserted += 1;
        }
    }
    inserted
}
