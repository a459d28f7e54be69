//! Configuration initialization.

use geostore::config::ConfigFile;

use crate::error::CliError;

/// Write `~/.geostore/config.ini` with defaults unless it already exists.
pub fn run() -> Result<(), CliError> {
    let path = ConfigFile::ensure_exists()?;
    println!("Configuration file: {}", path.display());
    Ok(())
}
