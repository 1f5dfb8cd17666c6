//! Workspace state persistence (open tabs and layout, not settings).

use super::WorkspaceConfig;
use crate::config::{get_workspace_file_path, load_json_file, save_json_file};
use crate::error::Result;
use std::path::PathBuf;

/// Stores and restores the [`WorkspaceConfig`].
pub trait WorkspaceStore {
    fn save(&mut self, config: &WorkspaceConfig) -> Result<()>;

    /// Load the stored workspace, or `default` when nothing was stored yet.
    fn load(&mut self, default: WorkspaceConfig) -> Result<WorkspaceConfig>;
}

// ─────────────────────────────────────────────────────────────────────────────
// JSON File Store
// ─────────────────────────────────────────────────────────────────────────────

/// [`WorkspaceStore`] writing one pretty JSON file.
#[derive(Debug, Clone)]
pub struct JsonWorkspaceStore {
    path: PathBuf,
}

impl JsonWorkspaceStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store in `workspace.json` inside the platform config directory.
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(get_workspace_file_path()?))
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl WorkspaceStore for JsonWorkspaceStore {
    fn save(&mut self, config: &WorkspaceConfig) -> Result<()> {
        save_json_file(&self.path, config)?;
        log::debug!(
            "Saved workspace with {} tab(s) to {:?}",
            config.tabs.len(),
            self.path
        );
        Ok(())
    }

    fn load(&mut self, default: WorkspaceConfig) -> Result<WorkspaceConfig> {
        match load_json_file(&self.path)? {
            Some(config) => {
                log::debug!("Loaded workspace from {:?}", self.path);
                Ok(config)
            }
            None => Ok(default),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
