//! Named containers of geo-tagged entities.
//!
//! A [`ContainerRegistry`] maps names to independent [`Container`]s. Each
//! container holds [`GeoEntity`] values keyed by id and notifies its
//! subscribers after every committed change; the registry re-broadcasts the
//! events of every container it owns.
//!
//! ```
//! use geostore::store::{ContainerRegistry, GeoEntity};
//!
//! let registry = ContainerRegistry::new();
//! let east = registry.get_or_create("east").unwrap();
//! east.add(GeoEntity::at("p1", "Alice", 55.75, 37.61).unwrap()).unwrap();
//!
//! assert_eq!(east.count(), 1);
//! assert!(registry.get_or_create("west").unwrap().get("p1").is_none());
//! ```

mod container;
mod entity;
mod error;
mod event;
mod registry;

pub use container::Container;
pub use entity::{AttributeValue, GeoEntity};
pub use error::StoreError;
pub use event::{ChangeEvent, ChangeKind, ChangeListener, ListenerError, SubscriptionId};
pub use registry::ContainerRegistry;
