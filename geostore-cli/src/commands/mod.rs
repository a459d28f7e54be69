//! CLI command implementations.
//!
//! - [`convert`] - Document import/export through a container
//! - [`init`] - Configuration file initialization
//! - [`lookup`] - Country, city and reachability queries

pub mod convert;
pub mod init;
pub mod lookup;
