//! Saving and exporting tabs.

use super::App;
use crate::error::{Error, Result};
use crate::files::{ExportType, FileDescriptor, SavingDeniedAnswer};
use crate::tabs::TabId;
use log::{debug, info, warn};

impl App {
    /// Save a tab, asking for a location when the file was never saved or
    /// when `save_as` is set.
    ///
    /// The tab is made active while its editor serializes and the previous
    /// active tab is restored afterwards.
    pub fn save_tab(&mut self, id: TabId, save_as: bool) -> Result<FileDescriptor> {
        let index = self.index_of(id)?;
        let previous = self.active_tab;

        if previous != Some(id) {
            self.swap_active(Some(id));
        }
        let result = self.tabs[index].save();
        self.drain_tab_events(id);
        if previous != Some(id) {
            self.swap_active(previous);
        }

        let file = match result {
            Ok(file) => file,
            Err(err) => {
                let current = self.tabs[index].file().clone();
                self.dialog.save_error(&current, &err);
                return Err(err);
            }
        };

        let ask_location = save_as || file.is_unsaved();
        let written = self.write_file(file, ask_location)?;
        info!("Saved '{}'", written.name);

        let index = self.index_of(id)?;
        self.tabs[index].set_file(written.clone());
        self.drain_tab_events(id);

        if let Some(path) = &written.path {
            self.settings.add_recent_file(path.clone());
            self.settings_dirty = true;
        }
        self.workspace_changed();
        Ok(written)
    }

    /// Write a file, offering "save as" when writing is not permitted.
    fn write_file(&mut self, file: FileDescriptor, mut ask_location: bool) -> Result<FileDescriptor> {
        loop {
            let target = if ask_location {
                match self.dialog.save_as(&file)? {
                    Some(path) => file.with_path(path),
                    None => return Err(Error::Canceled),
                }
            } else {
                file.clone()
            };

            match self.file_system.write_file(&target) {
                Ok(written) => return Ok(written),
                Err(err @ Error::SavingDenied { .. }) => {
                    warn!("{}", err);
                    match self.dialog.saving_denied(&target)? {
                        SavingDeniedAnswer::SaveAs => ask_location = true,
                        SavingDeniedAnswer::Cancel => return Err(err),
                    }
                }
                Err(err) => {
                    self.dialog.save_error(&target, &err);
                    return Err(err);
                }
            }
        }
    }

    /// Save the active tab.
    pub fn save_active_tab(&mut self, save_as: bool) -> Result<Option<FileDescriptor>> {
        match self.active_tab {
            Some(id) => self.save_tab(id, save_as).map(Some),
            None => Ok(None),
        }
    }

    /// Save every dirty tab in order.
    ///
    /// Tabs that are clean or cannot be saved are skipped. The first failure
    /// or cancellation stops the batch; the previously active tab is
    /// restored either way.
    pub fn save_all_tabs(&mut self) -> Result<()> {
        let previous = self.active_tab;
        let ids: Vec<TabId> = self.tabs.iter().map(|t| t.id()).collect();

        let mut result = Ok(());
        for id in ids {
            let Some(tab) = self.tab(id) else {
                continue;
            };
            if !tab.is_dirty() || !tab.can_save() {
                debug!("Save all: skipping tab {}", id);
                continue;
            }
            if let Err(err) = self.save_tab(id, false) {
                result = Err(err);
                break;
            }
        }

        if self.active_tab != previous {
            self.swap_active(previous);
        }
        if let Err(err) = &result {
            self.log_failure("save", err);
        }
        result
    }

    /// Export the active tab as an image.
    ///
    /// The format follows the extension of the chosen file, falling back
    /// to the first format the editor offers.
    pub fn export_tab(&mut self) -> Result<Option<FileDescriptor>> {
        let Some(id) = self.active_tab else {
            return Ok(None);
        };
        let index = self.index_of(id)?;
        let tab = &self.tabs[index];

        let Some(&fallback) = tab.state().export_as.first() else {
            let err = Error::ExportUnsupported {
                editor: tab.active_editor().id().to_string(),
                export: ExportType::Svg,
            };
            self.dialog.export_error(&err);
            return Err(err);
        };

        let suggestion = tab.file().with_extension(fallback.extension());
        let path = self.dialog.export_as(&suggestion)?.ok_or(Error::Canceled)?;
        let export = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(ExportType::from_key)
            .unwrap_or(fallback);

        let exported = match self.tabs[index].export_as(export) {
            Ok(exported) => exported.with_path(path),
            Err(err) => {
                self.dialog.export_error(&err);
                return Err(err);
            }
        };

        match self.file_system.write_file(&exported) {
            Ok(written) => {
                info!("Exported '{}'", written.name);
                Ok(Some(written))
            }
            Err(err) => {
                self.dialog.save_error(&exported, &err);
                Err(err)
            }
        }
    }
}
