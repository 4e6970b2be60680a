//! Storage initialization
//!
//! Handles first-run setup and default file creation

use crate::config::paths::LedgerPaths;
use crate::config::settings::Settings;
use crate::error::LedgerError;

/// Initialize storage for a fresh installation
///
/// Creates the directory layout, default settings, and empty data files.
/// Existing files are left untouched so re-running init is safe.
pub fn initialize_storage(paths: &LedgerPaths) -> Result<(), LedgerError> {
    paths.ensure_directories()?;

    if !paths.settings_file().exists() {
        Settings::default().save(paths)?;
    }

    Ok(())
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &LedgerPaths) -> bool {
    !paths.settings_file().exists()
}
