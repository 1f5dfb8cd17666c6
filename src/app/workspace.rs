//! Workspace persistence and layout.

use super::{App, AppEvent};
use crate::error::{Result, ResultExt};
use crate::files::FileDescriptor;
use crate::workspaces::{LayoutUpdate, WorkspaceConfig};
use log::{debug, info};

impl App {
    /// Snapshot of what should survive a restart.
    ///
    /// Unsaved files are left out and file contents are not stored; they
    /// are read from disk again on restore.
    pub fn workspace_config(&self) -> WorkspaceConfig {
        let saved: Vec<_> = self
            .tabs
            .iter()
            .filter(|tab| !tab.file().is_unsaved())
            .collect();

        let active_tab = self
            .active_tab
            .and_then(|id| saved.iter().position(|tab| tab.id() == id));

        WorkspaceConfig {
            tabs: saved.iter().map(|tab| tab.file().with_contents("")).collect(),
            active_tab,
            layout: self.layout,
        }
    }

    /// Announce a workspace change and write it through.
    pub(super) fn workspace_changed(&mut self) {
        self.events.push(AppEvent::WorkspaceChanged);
        if let Err(err) = self.persist_workspace() {
            self.log_failure("workspace", &err);
        }
    }

    /// Write the current workspace to the store.
    pub fn persist_workspace(&mut self) -> Result<()> {
        let config = self.workspace_config();
        self.workspace.save(&config)?;
        debug!("Persisted workspace with {} tab(s)", config.tabs.len());
        self.events.push(AppEvent::WorkspacePersisted);
        Ok(())
    }

    /// Restore layout and, if enabled, the tabs of the last session.
    ///
    /// Files that can no longer be read are skipped with a warning in the
    /// log panel. A broken store falls back to the default workspace.
    pub fn restore_workspace(&mut self) -> Result<()> {
        let config = self
            .workspace
            .load(WorkspaceConfig::default())
            .unwrap_or_warn_default(WorkspaceConfig::default(), "Failed to load workspace");

        self.layout = config.layout;
        self.events.push(AppEvent::LayoutUpdated(self.layout));

        if !self.settings.restore_workspace {
            debug!("Workspace restore disabled");
            return Ok(());
        }

        let mut restored = Vec::with_capacity(config.tabs.len());
        for (index, stored) in config.tabs.into_iter().enumerate() {
            let Some(path) = stored.path.clone() else {
                continue;
            };
            match self.file_system.read_file(&path) {
                Ok(raw) => {
                    let id = self.add_tab(FileDescriptor::from_raw(raw, stored.file_type))?;
                    restored.push((index, id));
                }
                Err(err) => {
                    self.logger
                        .warn("workspace", format!("Could not restore '{}': {}", stored.name, err));
                }
            }
        }
        self.flush_log();
        info!("Restored {} tab(s)", restored.len());

        let Some(&(_, fallback)) = restored.last() else {
            return Ok(());
        };
        let selected = config
            .active_tab
            .and_then(|active| {
                restored
                    .iter()
                    .find(|(index, _)| *index >= active)
                    .map(|&(_, id)| id)
            })
            .unwrap_or(fallback);
        self.select_tab(selected)
    }

    /// Apply a partial layout change.
    pub fn update_layout(&mut self, update: LayoutUpdate) {
        let layout = self.layout.merged(update);
        if layout == self.layout {
            return;
        }
        self.layout = layout;
        self.events.push(AppEvent::LayoutUpdated(layout));
        self.workspace_changed();
    }

    pub fn toggle_log(&mut self) {
        self.layout = self.layout.with_log_toggled();
        self.events.push(AppEvent::LayoutUpdated(self.layout));
        self.workspace_changed();
    }
}
