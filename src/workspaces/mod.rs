//! Workspace persistence for the modeler
//!
//! The workspace is what survives an application restart: the saved files
//! that were open, which of them was active, and the panel layout.

mod persistence;

pub use persistence::{JsonWorkspaceStore, WorkspaceStore};

use crate::files::FileDescriptor;
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Layout
// ─────────────────────────────────────────────────────────────────────────────

/// Properties panel placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertiesPanelLayout {
    pub open: bool,
    pub width: u32,
}

impl Default for PropertiesPanelLayout {
    fn default() -> Self {
        Self {
            open: true,
            width: 250,
        }
    }
}

/// Log panel placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogLayout {
    pub open: bool,
    pub height: u32,
}

impl Default for LogLayout {
    fn default() -> Self {
        Self {
            open: false,
            height: 150,
        }
    }
}

/// Panel layout of the application window.
///
/// Treated as an immutable snapshot: updates produce a new `Layout`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Layout {
    pub properties_panel: PropertiesPanelLayout,
    pub log: LogLayout,
}

/// A partial layout change; `None` fields are left as they are.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutUpdate {
    pub properties_panel: Option<PropertiesPanelLayout>,
    pub log: Option<LogLayout>,
}

impl Layout {
    /// Apply a partial update, producing the next snapshot.
    pub fn merged(&self, update: LayoutUpdate) -> Self {
        Self {
            properties_panel: update.properties_panel.unwrap_or(self.properties_panel),
            log: update.log.unwrap_or(self.log),
        }
    }

    /// Flip the log panel open or closed.
    pub fn with_log_toggled(&self) -> Self {
        self.merged(LayoutUpdate {
            log: Some(LogLayout {
                open: !self.log.open,
                ..self.log
            }),
            ..LayoutUpdate::default()
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Workspace Config
// ─────────────────────────────────────────────────────────────────────────────

/// Persisted workspace state.
///
/// Only files with a real path end up in `tabs`; `active_tab` indexes
/// into that list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkspaceConfig {
    pub tabs: Vec<FileDescriptor>,
    pub active_tab: Option<usize>,
    pub layout: Layout,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
