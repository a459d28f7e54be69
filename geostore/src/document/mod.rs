//! JSON document bridge for entity containers.
//!
//! A document is a JSON array of flat objects. Field names are matched
//! case-insensitively; `id`, `name`, `latitude` and `longitude` (or the
//! `lat`/`lon`/`lng` aliases) map onto the entity, everything else becomes an
//! attribute with a lowerCamelCase key.
//!
//! ```
//! use geostore::document;
//!
//! let entities = document::parse_entities(
//!     r#"[{"ID": "p1", "Name": "Alice", "Lat": "55.75", "lon": 37.6, "home_city": "Moscow"}]"#,
//! ).unwrap();
//!
//! assert_eq!(entities[0].id, "p1");
//! assert_eq!(entities[0].attribute("homeCity").unwrap().as_text(), Some("Moscow"));
//!
//! let text = document::to_json_text(&entities).unwrap();
//! assert!(text.contains("\"homeCity\": \"Moscow\""));
//! ```

mod export;
mod file;
mod import;
mod keys;

pub use export::to_json_text;
pub use file::{read_text, write_text};
pub use import::parse_entities;
pub use keys::to_lower_camel_case;
