//! Configuration file persistence for the modeler
//!
//! This module handles loading and saving JSON files to platform-specific
//! directories with robust error handling and graceful fallback to defaults.
//! The settings file and the workspace file share the same write path.

use crate::config::Settings;
use crate::error::{Error, Result, ResultExt};
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Application name used for the config directory
const APP_NAME: &str = "modeler";

/// Configuration file name
const CONFIG_FILE_NAME: &str = "config.json";

/// Workspace file name (open tabs and layout)
const WORKSPACE_FILE_NAME: &str = "workspace.json";

// ─────────────────────────────────────────────────────────────────────────────
// Platform-Specific Directory Resolution
// ─────────────────────────────────────────────────────────────────────────────

/// Get the platform-specific configuration directory for the application.
///
/// Returns the appropriate directory based on the operating system:
/// - **Windows**: `%APPDATA%\modeler\`
/// - **macOS**: `~/Library/Application Support/modeler/`
/// - **Linux**: `~/.config/modeler/`
///
/// # Errors
///
/// Returns `Error::ConfigDirNotFound` if the config directory cannot be determined
/// (e.g., if the HOME environment variable is not set).
pub fn get_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|base| base.join(APP_NAME))
        .ok_or(Error::ConfigDirNotFound)
}

/// Get the full path to the configuration file.
pub fn get_config_file_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(CONFIG_FILE_NAME))
}

/// Get the full path to the workspace file.
pub fn get_workspace_file_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(WORKSPACE_FILE_NAME))
}

// ─────────────────────────────────────────────────────────────────────────────
// Generic JSON Files
// ─────────────────────────────────────────────────────────────────────────────

/// Read and parse a JSON file.
///
/// Returns `Ok(None)` if the file doesn't exist or is empty.
pub fn load_json_file<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        debug!("{} not found", path.display());
        return Ok(None);
    }

    let contents = fs::read_to_string(path).map_err(|e| Error::ConfigLoad {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;

    if contents.trim().is_empty() {
        debug!("{} is empty", path.display());
        return Ok(None);
    }

    let value = serde_json::from_str(&contents).map_err(|e| {
        warn!("{} contains invalid JSON: {}", path.display(), e);
        Error::ConfigParse {
            message: format!("Failed to parse {}: {}", path.display(), e),
            source: Some(Box::new(e)),
        }
    })?;

    Ok(Some(value))
}

/// Serialize a value to pretty JSON and write it atomically.
///
/// The JSON is written to a `.bak` sibling first which then replaces the
/// target, so a crash mid-write never leaves a truncated file behind.
pub fn save_json_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.exists() {
            debug!("Creating directory: {}", dir.display());
            fs::create_dir_all(dir).map_err(|e| Error::ConfigSave {
                path: dir.to_path_buf(),
                source: Box::new(e),
            })?;
        }
    }

    let json = serde_json::to_string_pretty(value).map_err(|e| Error::ConfigSave {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;

    let mut backup = path.as_os_str().to_os_string();
    backup.push(".bak");
    let backup_path = PathBuf::from(backup);

    fs::write(&backup_path, &json).map_err(|e| Error::ConfigSave {
        path: backup_path.clone(),
        source: Box::new(e),
    })?;

    fs::rename(&backup_path, path).map_err(|e| Error::ConfigSave {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;

    debug!("Saved {}", path.display());
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Settings
// ─────────────────────────────────────────────────────────────────────────────

/// Load configuration from the default config file location.
///
/// If the file doesn't exist or is corrupted, this falls back to defaults
/// and logs a warning.
pub fn load_config() -> Settings {
    load_config_internal().unwrap_or_warn_default(Settings::default(), "Failed to load configuration")
}

fn load_config_internal() -> Result<Settings> {
    let config_path = get_config_file_path()?;
    load_config_from(&config_path)
}

/// Load and sanitize settings from a specific file.
pub fn load_config_from(path: &Path) -> Result<Settings> {
    let mut settings: Settings = load_json_file(path)?.unwrap_or_default();
    settings.sanitize();
    info!("Configuration loaded from {}", path.display());
    Ok(settings)
}

/// Save configuration to the default config file location.
pub fn save_config(settings: &Settings) -> Result<()> {
    let config_path = get_config_file_path()?;
    save_json_file(&config_path, settings)?;
    info!("Configuration saved to {}", config_path.display());
    Ok(())
}

/// Save configuration, ignoring errors.
///
/// Returns `true` if the save was successful, `false` otherwise.
pub fn save_config_silent(settings: &Settings) -> bool {
    match save_config(settings) {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to save configuration: {}", e);
            false
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
