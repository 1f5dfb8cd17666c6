//! User settings and preferences for the modeler
//!
//! This module defines the `Settings` struct that holds all user-configurable
//! options, with serde support for JSON persistence.

use crate::files::Notation;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Main Settings Struct
// ─────────────────────────────────────────────────────────────────────────────

/// User preferences and application settings.
///
/// This struct is serialized to JSON and persisted to the user's config directory.
/// All fields have sensible defaults via the `Default` trait and `#[serde(default)]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Session & History
    // ─────────────────────────────────────────────────────────────────────────
    /// Whether tabs of the previous session are reopened on start
    pub restore_workspace: bool,

    /// Number of closed files remembered for "reopen last tab"
    pub max_file_history: usize,

    /// Recently opened files (most recent first)
    pub recent_files: Vec<PathBuf>,

    /// Maximum number of recent files to remember
    pub max_recent_files: usize,

    // ─────────────────────────────────────────────────────────────────────────
    // Diagrams
    // ─────────────────────────────────────────────────────────────────────────
    /// Notation used by the plain "new diagram" command
    pub default_notation: Notation,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            restore_workspace: true,
            max_file_history: 10,
            recent_files: Vec::new(),
            max_recent_files: 10,
            default_notation: Notation::Bpmn,
        }
    }
}

impl Settings {
    /// Add a file to the recent files list.
    ///
    /// If the file already exists in the list, it's moved to the front.
    /// The list is trimmed to `max_recent_files`.
    pub fn add_recent_file(&mut self, path: PathBuf) {
        self.recent_files.retain(|p| p != &path);
        self.recent_files.insert(0, path);
        self.recent_files.truncate(self.max_recent_files);
    }

    /// Directory of the most recently opened file, if any.
    pub fn last_directory(&self) -> Option<PathBuf> {
        self.recent_files
            .first()
            .and_then(|p| p.parent())
            .map(|p| p.to_path_buf())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Validation Constants and Sanitization
    // ─────────────────────────────────────────────────────────────────────────

    /// Upper bound for both history lengths.
    pub const MAX_HISTORY: usize = 100;

    /// Sanitize settings by clamping values to valid ranges.
    ///
    /// This is useful after loading settings from a file that might have
    /// been manually edited with invalid values.
    pub fn sanitize(&mut self) {
        if self.max_recent_files == 0 {
            self.max_recent_files = 10;
        }
        self.max_recent_files = self.max_recent_files.min(Self::MAX_HISTORY);
        self.recent_files.truncate(self.max_recent_files);

        self.max_file_history = self.max_file_history.clamp(1, Self::MAX_HISTORY);
    }

    /// Load settings and sanitize them to ensure validity.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
