//! A tab showing one file through several editors.

use super::{TabEvent, TabId, ToolState};
use crate::editor::{DiagramEditor, EditorAction, EditorEvent, ImportReport, InitialState};
use crate::error::{Error, Result};
use crate::files::{Dialog, ExportType, FileDescriptor};
use log::{debug, info, warn};

/// One open file with interchangeable editor views.
///
/// Exactly one editor is active at any time. Switching editors moves the
/// current document along, so no view ever works on stale contents.
#[derive(Debug)]
pub struct MultiEditorTab {
    id: TabId,
    file: FileDescriptor,
    dirty: bool,
    closable: bool,
    editors: Vec<DiagramEditor>,
    /// Index into `editors`
    active: usize,
    state: ToolState,
    outbox: Vec<TabEvent>,
}

impl MultiEditorTab {
    /// Create a tab and bind every editor to the file contents.
    ///
    /// The first editor starts out active. Nothing is imported until the
    /// tab is activated.
    pub fn new(id: TabId, file: FileDescriptor, mut editors: Vec<DiagramEditor>) -> Result<Self> {
        let first = editors
            .first()
            .map(|e| e.id().to_string())
            .ok_or_else(|| Error::Application(format!("tab for '{}' has no editors", file.name)))?;

        let dirty = file.is_unsaved();
        for editor in &mut editors {
            editor.set_xml(file.contents.clone(), Some(InitialState { dirty }));
        }

        Ok(Self {
            id,
            state: ToolState::initial(file.file_type, &first, dirty),
            file,
            dirty,
            closable: true,
            editors,
            active: 0,
            outbox: Vec::new(),
        })
    }

    pub fn id(&self) -> TabId {
        self.id
    }

    pub fn file(&self) -> &FileDescriptor {
        &self.file
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_closable(&self) -> bool {
        self.closable
    }

    /// Whether the active editor allows saving.
    pub fn can_save(&self) -> bool {
        self.state.save
    }

    /// Merged tool state last reported by the active editor.
    pub fn state(&self) -> &ToolState {
        &self.state
    }

    pub fn active_editor(&self) -> &DiagramEditor {
        &self.editors[self.active]
    }

    pub fn editor(&self, id: &str) -> Option<&DiagramEditor> {
        self.editors.iter().find(|e| e.id() == id)
    }

    pub fn editor_ids(&self) -> Vec<&str> {
        self.editors.iter().map(|e| e.id()).collect()
    }

    /// Drain the events raised since the last call.
    pub fn take_events(&mut self) -> Vec<TabEvent> {
        std::mem::take(&mut self.outbox)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Editor Switching
    // ─────────────────────────────────────────────────────────────────────────

    /// Bring the tab on screen, focusing its active editor.
    pub fn activate(&mut self) {
        self.editors[self.active].focus();
        self.sync();
    }

    /// Switch to another editor, carrying the current document over.
    ///
    /// The switch is abandoned when the active editor cannot export, and
    /// rolled back when the target editor fails to import. Both failures
    /// are reported through `dialog`.
    pub fn show_editor(&mut self, target: &str, dialog: &mut dyn Dialog) -> Result<()> {
        let target = self
            .editors
            .iter()
            .position(|e| e.id() == target)
            .ok_or_else(|| Error::UnknownEditor(target.to_string()))?;

        if target == self.active {
            return Ok(());
        }

        let previous = self.active;
        let xml = match self.editors[previous].save_xml() {
            Ok(xml) => xml,
            Err(err) => {
                warn!("Keeping '{}' open: {}", self.editors[previous].id(), err);
                dialog.export_error(&err);
                self.sync();
                return Err(err);
            }
        };

        if self.editors[target].is_history_lost(&xml) {
            debug!(
                "Editor '{}' reimports, its undo history starts over",
                self.editors[target].id()
            );
        }

        self.set_editor(target);
        let editor = &mut self.editors[target];
        editor.set_xml(xml, None);
        editor.focus();

        let shown = last_shown(editor.events());
        if let Some(message) = shown.and_then(|report| report.error) {
            dialog.import_error(&self.file.name, &message);
            info!("Switching back to '{}'", self.editors[previous].id());
            self.set_editor(previous);
            self.editors[previous].focus();
            self.sync();
            return Err(Error::Import { message });
        }

        self.sync();
        Ok(())
    }

    fn set_editor(&mut self, index: usize) {
        self.active = index;
        self.state = ToolState {
            active_editor: self.editors[index].id().to_string(),
            ..self.state.clone()
        };
        self.outbox.push(TabEvent::Changed);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // File Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Serialize the active editor into a copy of the file.
    ///
    /// Nothing is written to disk here.
    pub fn save(&mut self) -> Result<FileDescriptor> {
        let result = self.editors[self.active].save_xml();
        self.sync();
        Ok(self.file.with_contents(result?))
    }

    /// Export the active editor as an image file descriptor.
    pub fn export_as(&mut self, export: ExportType) -> Result<FileDescriptor> {
        let contents = self.editors[self.active].export_as(export)?;
        Ok(self
            .file
            .with_extension(export.extension())
            .with_contents(contents))
    }

    /// Rebind the tab to a new file, such as after saving or reloading.
    ///
    /// Every editor gets the new contents as its clean baseline.
    pub fn set_file(&mut self, file: FileDescriptor) {
        let dirty = file.is_unsaved();
        for editor in &mut self.editors {
            editor.set_xml(file.contents.clone(), Some(InitialState { dirty }));
        }
        debug!("Tab {} bound to '{}'", self.id, file.name);
        self.file = file;
        self.dirty = dirty;
        self.state.dirty = dirty;
        self.sync();
    }

    /// Replace the cached modification stamp, leaving the contents alone.
    pub fn set_last_modified(&mut self, last_modified: Option<u64>) {
        self.file = self.file.with_last_modified(last_modified);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Editing
    // ─────────────────────────────────────────────────────────────────────────

    pub fn trigger_action(&mut self, action: &EditorAction) -> Result<()> {
        let result = self.editors[self.active].trigger_action(action);
        self.sync();
        result
    }

    /// Apply a user edit to the active editor.
    pub fn apply_change(&mut self, xml: impl Into<String>) -> Result<()> {
        let result = self.editors[self.active].apply_change(xml);
        self.sync();
        result
    }

    /// Drain editor events, adopting the state of the active editor.
    fn sync(&mut self) {
        for index in 0..self.editors.len() {
            let events = self.editors[index].take_events();
            if index != self.active {
                continue;
            }
            for event in events {
                match event {
                    EditorEvent::StateUpdated(state) => {
                        self.dirty = state.dirty.unwrap_or_else(|| self.file.is_unsaved());
                        self.closable = state.closable.unwrap_or(true);
                        self.state = self.state.merge(&state, self.file.is_unsaved());
                        self.outbox.push(TabEvent::StateChanged(self.state.clone()));
                    }
                    EditorEvent::Warnings(warnings) => {
                        self.outbox.push(TabEvent::Warnings(warnings));
                    }
                    _ => {}
                }
            }
        }
    }
}

fn last_shown(events: &[EditorEvent]) -> Option<ImportReport> {
    events.iter().rev().find_map(|event| match event {
        EditorEvent::Shown(report) => Some(report.clone()),
        _ => None,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
