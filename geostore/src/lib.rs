//! geostore - named geo-entity containers with country and city resolution.
//!
//! The crate has two halves that share no state:
//!
//! - [`store`]: a [`ContainerRegistry`](store::ContainerRegistry) of named,
//!   thread-safe containers of [`GeoEntity`](store::GeoEntity) values with
//!   change notification, plus JSON import/export via [`document`].
//! - [`reference`]: country and city datasets behind a TTL cache with
//!   single-flight refreshes, and the [`GeoResolver`](reference::GeoResolver)
//!   answering containment ([`geometry`]) and proximity ([`coord`]) queries.
//!
//! [`service::GeoService`] composes the two, e.g. to store entities already
//! tagged with their country.
//!
//! ```
//! use geostore::geometry::{Position, Ring};
//!
//! let square = Ring::from_pairs(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0)]);
//! assert!(square.contains(Position::new(5.0, 5.0)));
//! assert!(!square.contains(Position::new(15.0, 15.0)));
//! ```

pub mod config;
pub mod coord;
pub mod document;
pub mod geometry;
pub mod logging;
pub mod reference;
pub mod service;
pub mod store;

/// Version of the geostore library and CLI.
///
/// Defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
