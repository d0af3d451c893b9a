//! Cross-Platform Path Utilities
//!
//! Functions for resolving application directories across platforms.
//! Handles ~/.draftcheck/ and its config file.

use std::path::{Path, PathBuf};

use crate::utils::error::{AppError, AppResult};

/// Environment variable that relocates the application directory
pub const HOME_OVERRIDE_ENV: &str = "DRAFTCHECK_HOME";

/// Get the user's home directory
pub fn home_dir() -> AppResult<PathBuf> {
    dirs::home_dir().ok_or_else(|| AppError::config("Could not determine home directory"))
}

/// Get the DraftCheck directory (~/.draftcheck/ unless overridden)
pub fn draftcheck_dir() -> AppResult<PathBuf> {
    match std::env::var_os(HOME_OVERRIDE_ENV) {
        Some(dir) if !dir.is_empty() => Ok(PathBuf::from(dir)),
        _ => Ok(home_dir()?.join(".draftcheck")),
    }
}

/// Get the config file path (~/.draftcheck/config.json)
pub fn config_path() -> AppResult<PathBuf> {
    Ok(draftcheck_dir()?.join("config.json"))
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> AppResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Get the DraftCheck directory, creating if it doesn't exist
pub fn ensure_draftcheck_dir() -> AppResult<PathBuf> {
    let path = draftcheck_dir()?;
    ensure_dir(&path)?;
    Ok(path)
}
