//! Named container registry.
//!
//! # Thread Safety
//!
//! - Name-level access: `DashMap` (concurrent lookups, per-shard write locks)
//! - `get_or_create` goes through the entry API so exactly one container is
//!   ever created per name, however many callers race on it
//! - Entity-level access is delegated to each container's own lock

use std::path::Path;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, info};

use super::container::Container;
use super::entity::GeoEntity;
use super::error::StoreError;
use super::event::{ChangeEvent, ChangeListener, ListenerError, ListenerSet, SubscriptionId};
use crate::document;

/// Re-broadcasts a container's events to the registry's subscribers.
struct Forwarder {
    target: Arc<ListenerSet>,
}

impl ChangeListener for Forwarder {
    fn on_change(&self, event: &ChangeEvent) -> Result<(), ListenerError> {
        self.target.notify(event);
        Ok(())
    }
}

struct Registered {
    container: Arc<Container>,
    forwarder: SubscriptionId,
}

/// Registry of named entity containers.
///
/// Construct one explicitly and share it (`Arc<ContainerRegistry>`) with
/// whatever needs it.
#[derive(Default)]
pub struct ContainerRegistry {
    containers: DashMap<String, Registered>,
    listeners: Arc<ListenerSet>,
}

impl ContainerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the container with the given name, creating it if absent.
    pub fn get_or_create(&self, name: &str) -> Result<Arc<Container>, StoreError> {
        if name.trim().is_empty() {
            return Err(StoreError::Validation(
                "Container name must not be blank".to_string(),
            ));
        }

        // Fast path: container already exists
        if let Some(entry) = self.containers.get(name) {
            return Ok(Arc::clone(&entry.container));
        }

        let entry = self.containers.entry(name.to_string()).or_insert_with(|| {
            let container = Arc::new(Container::new(name));
            let forwarder = container.subscribe_listener(Arc::new(Forwarder {
                target: Arc::clone(&self.listeners),
            }));
            info!(container = %name, "Container created");
            Registered {
                container,
                forwarder,
            }
        });
        Ok(Arc::clone(&entry.container))
    }

    pub fn get(&self, name: &str) -> Option<Arc<Container>> {
        self.containers
            .get(name)
            .map(|entry| Arc::clone(&entry.container))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.containers.contains_key(name)
    }

    /// Drop the named container from the registry and discard its entities.
    ///
    /// Handles already held keep working as empty, detached containers whose
    /// events are no longer re-broadcast.
    pub fn remove(&self, name: &str) -> bool {
        match self.containers.remove(name) {
            Some((_, registered)) => {
                registered.container.unsubscribe(registered.forwarder);
                let discarded = registered.container.clear();
                info!(container = %name, discarded, "Container removed");
                true
            }
            None => false,
        }
    }

    /// Registered container names, sorted.
    pub fn list_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.containers.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    /// Receive the events of every registered container.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&ChangeEvent) -> Result<(), ListenerError> + Send + Sync + 'static,
    {
        self.listeners.subscribe_fn(callback)
    }

    pub fn subscribe_listener(&self, listener: Arc<dyn ChangeListener>) -> SubscriptionId {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    // =========================================================================
    // Document operations
    // =========================================================================

    /// Replace the contents of the named container (created if absent).
    ///
    /// Returns the number of entities stored.
    pub fn load_entities(
        &self,
        name: &str,
        entities: impl IntoIterator<Item = GeoEntity>,
    ) -> Result<usize, StoreError> {
        let container = self.get_or_create(name)?;
        let loaded = container.replace_all(entities);
        debug!(container = %name, loaded, "Entities loaded");
        Ok(loaded)
    }

    /// Parse a JSON document and replace the named container's contents.
    ///
    /// A malformed document leaves the container untouched.
    pub fn load_from_json_text(&self, name: &str, text: &str) -> Result<usize, StoreError> {
        let entities = document::parse_entities(text)?;
        self.load_entities(name, entities)
    }

    pub fn load_from_json_file(&self, name: &str, path: &Path) -> Result<usize, StoreError> {
        let text = document::read_text(path)?;
        let loaded = self.load_from_json_text(name, &text)?;
        info!(container = %name, path = %path.display(), loaded, "Loaded document");
        Ok(loaded)
    }

    /// Render the named container as a JSON document.
    pub fn export_to_json_text(&self, name: &str) -> Result<String, StoreError> {
        let container = self
            .get(name)
            .ok_or_else(|| StoreError::container_not_found(name))?;
        document::to_json_text(&container.get_all())
    }

    pub fn save_to_json_file(&self, name: &str, path: &Path) -> Result<(), StoreError> {
        let text = self.export_to_json_text(name)?;
        document::write_text(path, &text)?;
        info!(container = %name, path = %path.display(), "Saved document");
        Ok(())
    }
}

impl std::fmt::Debug for ContainerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerRegistry")
            .field("containers", &self.list_names())
            .finish()
    }
}
