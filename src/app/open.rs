//! Creating, opening and reloading diagrams.

use super::App;
use crate::error::{Error, Result};
use crate::files::sniff::{deprecated_namespace, detect_notation, upgrade_namespace};
use crate::files::{ContentChangedAnswer, ConvertAnswer, FileDescriptor, Notation, RawFile};
use crate::tabs::TabId;
use log::{debug, info};

impl App {
    /// Create a new, unsaved diagram and select its tab.
    pub fn create_diagram(&mut self, notation: Notation) -> Result<TabId> {
        let provider = self.provider_index(notation)?;
        let file = self.providers[provider].create_new_file();
        info!("Creating {} diagram '{}'", notation.display_name(), file.name);

        let id = self.add_tab(file)?;
        self.select_tab(id)?;
        Ok(id)
    }

    /// Open already resolved files.
    ///
    /// Files that are open already reuse their tab. The tab of the last file
    /// ends up selected.
    pub fn open_tabs(&mut self, files: Vec<FileDescriptor>) -> Result<Option<TabId>> {
        let mut last = None;

        for file in files {
            let existing = self
                .tabs
                .iter()
                .find(|tab| tab.file().same_file(&file))
                .map(|tab| tab.id());

            let id = match existing {
                Some(id) => {
                    debug!("'{}' is open already in tab {}", file.name, id);
                    id
                }
                None => {
                    if let Some(path) = &file.path {
                        self.settings.add_recent_file(path.clone());
                        self.settings_dirty = true;
                    }
                    self.add_tab(file)?
                }
            };
            last = Some(id);
        }

        if let Some(id) = last {
            self.select_tab(id)?;
        }
        Ok(last)
    }

    /// Open files read from disk, detecting their notation by content.
    ///
    /// Every file is resolved on its own: an unrecognized file or a canceled
    /// namespace conversion skips that file only.
    pub fn open_files(&mut self, files: Vec<RawFile>) -> Result<Option<TabId>> {
        let mut resolved = Vec::new();

        for raw in files {
            match self.resolve_file(raw) {
                Ok(file) => resolved.push(file),
                Err(Error::UnrecognizedFile { name }) => {
                    debug!("Skipping unrecognized file '{}'", name);
                }
                Err(err) => self.log_failure("open", &err),
            }
        }

        self.open_tabs(resolved)
    }

    fn resolve_file(&mut self, mut raw: RawFile) -> Result<FileDescriptor> {
        let Some(notation) = detect_notation(&raw.contents) else {
            self.dialog.unrecognized_file_error(&raw.name);
            return Err(Error::UnrecognizedFile { name: raw.name });
        };

        if let Some(upgrade) = deprecated_namespace(&raw.contents, notation) {
            match self.dialog.convert_namespace(&raw.name, notation)? {
                ConvertAnswer::Yes => {
                    info!("Upgrading namespace of '{}' to {}", raw.name, upgrade.new_uri);
                    raw.contents = upgrade_namespace(&raw.contents, upgrade);
                }
                ConvertAnswer::No => {}
                ConvertAnswer::Cancel => return Err(Error::Canceled),
            }
        }

        Ok(FileDescriptor::from_raw(raw, notation))
    }

    /// Ask for files and open them.
    ///
    /// Files that cannot be read are reported one by one and skipped.
    pub fn show_open_dialog(&mut self) -> Result<Option<TabId>> {
        let default_dir = self.settings.last_directory();
        let paths = self.dialog.open(default_dir.as_deref())?;
        if paths.is_empty() {
            debug!("Open dialog canceled");
            return Ok(None);
        }

        let mut files = Vec::new();
        for path in paths {
            match self.file_system.read_file(&path) {
                Ok(raw) => files.push(raw),
                Err(err) => {
                    self.dialog.open_error(&path, &err);
                    self.log_failure("open", &err);
                }
            }
        }

        self.open_files(files)
    }

    /// Check whether the file of a tab changed on disk.
    ///
    /// If it did, the user decides between reloading and keeping the editor
    /// contents. Keeping still adopts the new modification stamp so the same
    /// change is not reported twice.
    pub fn recheck_tab_content(&mut self, id: TabId) -> Result<()> {
        let index = self.index_of(id)?;
        let file = self.tabs[index].file().clone();
        let Some(path) = file.path.clone() else {
            return Ok(());
        };

        let stats = self.file_system.read_file_stats(&file)?;
        let changed = match (file.last_modified, stats.last_modified) {
            (_, None) => false,
            (None, Some(stamp)) => {
                self.tabs[index].set_last_modified(Some(stamp));
                false
            }
            (Some(cached), Some(stamp)) => stamp > cached,
        };
        if !changed {
            return Ok(());
        }

        match self.dialog.content_changed(&file)? {
            ContentChangedAnswer::Reload => {
                let raw = match self.file_system.read_file(&path) {
                    Ok(raw) => raw,
                    Err(err) => {
                        self.dialog.open_error(&path, &err);
                        return Err(err);
                    }
                };
                info!("Reloading '{}' from disk", file.name);
                self.tabs[index].set_file(FileDescriptor::from_raw(raw, file.file_type));
                self.drain_tab_events(id);
            }
            ContentChangedAnswer::Keep => {
                debug!("Keeping editor contents of '{}'", file.name);
                self.tabs[index].set_last_modified(stats.last_modified);
            }
        }
        Ok(())
    }

    /// Reopen the most recently closed saved file.
    pub fn reopen_last_tab(&mut self) -> Result<Option<TabId>> {
        let Some(file) = self.file_history.pop() else {
            return Ok(None);
        };
        let Some(path) = file.path.clone() else {
            return Ok(None);
        };

        let raw = match self.file_system.read_file(&path) {
            Ok(raw) => raw,
            Err(err) => {
                self.dialog.open_error(&path, &err);
                return Err(err);
            }
        };
        self.open_tabs(vec![FileDescriptor::from_raw(raw, file.file_type)])
    }
}
