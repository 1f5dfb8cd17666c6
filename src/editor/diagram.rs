//! Shared editor lifecycle
//!
//! [`DiagramEditor`] sits between "new XML was handed to the view" and "the
//! view has actually imported it". It skips redundant imports, keeps the
//! baseline the dirty flag is measured against, and reports everything that
//! happens through a typed event outbox drained by the owning tab.

use super::{Editor, EditorAction, EditorState, ImportReport};
use crate::error::{Error, Result};
use crate::files::ExportType;
use log::{debug, warn};

/// Baseline handed over when a file is (re)bound to an editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InitialState {
    /// Whether the bound document counts as modified from the start
    pub dirty: bool,
}

/// Where an editor stands relative to its clean baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorLifecycle {
    /// No XML was ever handed to the editor
    Unbound,
    /// XML is pending and not loaded yet, or its import failed
    Importing,
    /// The loaded document sits at its baseline revision
    Clean { baseline: u64 },
    /// The document moved away from its baseline, or the baseline itself is dirty
    Dirty { baseline: Option<u64>, current: u64 },
}

impl EditorLifecycle {
    pub fn is_dirty(&self) -> bool {
        matches!(self, EditorLifecycle::Dirty { .. })
    }
}

/// Notifications raised by a [`DiagramEditor`], drained by its tab.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    Focus,
    Import,
    Imported(ImportReport),
    Warnings(Vec<String>),
    StateUpdated(EditorState),
    Updated,
    /// The editor is on screen showing the result of this import
    Shown(ImportReport),
    Save,
    Saved {
        error: Option<String>,
        xml: Option<String>,
    },
}

#[derive(Debug, Clone, Default)]
struct Baseline {
    xml: Option<String>,
    dirty: bool,
    /// Revision considered clean; `None` until the next import anchors it
    stack_index: Option<u64>,
    /// The document was replaced by XML differing from the baseline
    reimported: bool,
}

/// Import suppression and dirty tracking around one [`Editor`].
pub struct DiagramEditor {
    id: String,
    inner: Box<dyn Editor>,
    mounted: bool,
    /// XML of the last successful import or export
    last_xml: Option<String>,
    /// XML to import on the next update
    new_xml: Option<String>,
    /// Revision at which `last_xml` matches the loaded document
    synced_index: Option<u64>,
    baseline: Baseline,
    lifecycle: EditorLifecycle,
    last_import: Option<ImportReport>,
    state: EditorState,
    outbox: Vec<EditorEvent>,
}

impl DiagramEditor {
    pub fn new(id: impl Into<String>, inner: Box<dyn Editor>) -> Self {
        Self {
            id: id.into(),
            inner,
            mounted: false,
            last_xml: None,
            new_xml: None,
            synced_index: None,
            baseline: Baseline::default(),
            lifecycle: EditorLifecycle::Unbound,
            last_import: None,
            state: EditorState::default(),
            outbox: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn inner(&self) -> &dyn Editor {
        self.inner.as_ref()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn lifecycle(&self) -> EditorLifecycle {
        self.lifecycle
    }

    pub fn last_xml(&self) -> Option<&str> {
        self.last_xml.as_deref()
    }

    pub fn pending_xml(&self) -> Option<&str> {
        self.new_xml.as_deref()
    }

    pub fn last_import(&self) -> Option<&ImportReport> {
        self.last_import.as_ref()
    }

    /// Last state reported through [`EditorEvent::StateUpdated`].
    pub fn state(&self) -> &EditorState {
        &self.state
    }

    /// Events raised since the last drain.
    pub fn events(&self) -> &[EditorEvent] {
        &self.outbox
    }

    /// Drain the events raised since the last call.
    pub fn take_events(&mut self) -> Vec<EditorEvent> {
        std::mem::take(&mut self.outbox)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Attach the view and import whatever XML is pending.
    pub fn mount(&mut self) {
        if !self.mounted {
            debug!("Mounting editor '{}' ({})", self.id, self.inner.name());
            self.inner.mount();
            self.mounted = true;
        }
        self.update();
    }

    /// Bring the editor back on screen.
    pub fn focus(&mut self) {
        self.outbox.push(EditorEvent::Focus);
        self.mount();
    }

    /// Hand new XML to the editor.
    ///
    /// With an `initial` state the clean baseline is reset to this XML. The
    /// import runs right away when mounted, otherwise on the next mount.
    pub fn set_xml(&mut self, xml: impl Into<String>, initial: Option<InitialState>) {
        let xml = xml.into();

        match initial {
            Some(InitialState { dirty }) => {
                let unchanged = self.is_loaded(&xml);
                let stack_index = unchanged.then(|| self.inner.undo_state().stack_index);
                self.baseline = Baseline {
                    xml: Some(xml.clone()),
                    dirty,
                    stack_index,
                    reimported: false,
                };
            }
            None => {
                if !self.is_loaded(&xml) {
                    self.baseline.reimported = self.baseline.xml.as_ref() != Some(&xml);
                }
            }
        }

        if self.lifecycle == EditorLifecycle::Unbound {
            self.lifecycle = EditorLifecycle::Importing;
        }
        self.new_xml = Some(xml);
        self.update();
    }

    /// Import the pending XML unless it is already loaded.
    pub fn update(&mut self) {
        if !self.mounted {
            return;
        }
        let Some(xml) = self.new_xml.clone() else {
            return;
        };

        let loaded = self.is_loaded(&xml);
        let failed = match &self.last_import {
            Some(report) if !self.inner.has_imported() && !report.is_ok() && report.xml == xml => {
                Some(report.clone())
            }
            _ => None,
        };

        if loaded || failed.is_some() {
            debug!("Editor '{}': XML unchanged, skipping import", self.id);
            self.update_state();
            self.outbox.push(EditorEvent::Updated);
            let shown = failed.unwrap_or_else(|| ImportReport::ok(xml, Vec::new()));
            self.outbox.push(EditorEvent::Shown(shown));
            return;
        }

        self.lifecycle = EditorLifecycle::Importing;
        self.outbox.push(EditorEvent::Import);
        let report = self.inner.import_xml(&xml);

        match &report.error {
            None => {
                let index = self.inner.undo_state().stack_index;
                self.last_xml = Some(xml);
                self.synced_index = Some(index);
                self.baseline.stack_index = Some(index);
                debug!("Editor '{}' imported at revision {}", self.id, index);
            }
            Some(error) => {
                warn!("Editor '{}' failed to import: {}", self.id, error);
                self.synced_index = None;
            }
        }

        self.last_import = Some(report.clone());
        self.outbox.push(EditorEvent::Imported(report.clone()));
        if !report.warnings.is_empty() {
            self.outbox.push(EditorEvent::Warnings(report.warnings.clone()));
        }
        self.update_state();
        self.outbox.push(EditorEvent::Updated);
        self.outbox.push(EditorEvent::Shown(report));
    }

    /// Whether the document on screen is exactly `xml`, with no edits since
    /// it was imported or exported.
    fn is_loaded(&self, xml: &str) -> bool {
        self.inner.has_imported()
            && self.last_xml.as_deref() == Some(xml)
            && self.synced_index == Some(self.inner.undo_state().stack_index)
    }

    /// Recompute the editor state and report it.
    pub fn update_state(&mut self) -> EditorState {
        let forced_dirty = self.baseline.dirty || self.baseline.reimported;

        let state = if self.inner.has_imported() {
            let undo = self.inner.undo_state();
            let dirty = forced_dirty || self.baseline.stack_index != Some(undo.stack_index);
            self.lifecycle = if dirty {
                EditorLifecycle::Dirty {
                    baseline: self.baseline.stack_index,
                    current: undo.stack_index,
                }
            } else {
                EditorLifecycle::Clean {
                    baseline: undo.stack_index,
                }
            };

            EditorState {
                dirty: Some(dirty),
                undo: undo.can_undo,
                redo: undo.can_redo,
                editable: true,
                closable: self.inner.closable(),
                export_as: self.inner.export_types(),
                capabilities: self.inner.capabilities(),
                ..EditorState::default()
            }
        } else {
            // Nothing loaded, so the engine has no command stack to ask
            self.lifecycle = if self.new_xml.is_some() {
                EditorLifecycle::Importing
            } else {
                EditorLifecycle::Unbound
            };
            EditorState {
                dirty: Some(forced_dirty),
                ..EditorState::default()
            }
        };

        self.state = state.clone();
        self.outbox.push(EditorEvent::StateUpdated(state.clone()));
        state
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Saving
    // ─────────────────────────────────────────────────────────────────────────

    /// Serialize the current document.
    ///
    /// Exports only when the document changed since it was last imported or
    /// exported; otherwise the cached XML is returned untouched.
    pub fn save_xml(&mut self) -> Result<String> {
        self.outbox.push(EditorEvent::Save);
        let result = self.export();
        self.outbox.push(EditorEvent::Saved {
            error: result.as_ref().err().map(ToString::to_string),
            xml: result.as_ref().ok().cloned(),
        });
        result
    }

    fn export(&mut self) -> Result<String> {
        if !self.inner.has_imported() {
            // Hand back the XML we were given rather than losing it
            return self.new_xml.clone().ok_or_else(|| Error::Export {
                message: format!("editor '{}' has no document", self.id),
            });
        }

        let index = self.inner.undo_state().stack_index;
        if self.synced_index == Some(index) {
            if let Some(xml) = &self.last_xml {
                return Ok(xml.clone());
            }
        }

        let xml = self.inner.export_xml()?;
        self.last_xml = Some(xml.clone());
        self.new_xml = Some(xml.clone());
        self.synced_index = Some(index);
        Ok(xml)
    }

    /// Export the document as an image, if the view supports the format.
    pub fn export_as(&mut self, export: ExportType) -> Result<String> {
        if !self.inner.export_types().contains(&export) {
            return Err(Error::ExportUnsupported {
                editor: self.inner.name().to_string(),
                export,
            });
        }
        self.inner.export_as(export)
    }

    /// Whether replacing the document with `xml` drops the undo history.
    pub fn is_history_lost(&self, xml: &str) -> bool {
        !self.is_loaded(xml)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Editing
    // ─────────────────────────────────────────────────────────────────────────

    /// Run an action; undo and redo go to the command stack.
    pub fn trigger_action(&mut self, action: &EditorAction) -> Result<()> {
        let result = match action {
            EditorAction::Undo => {
                self.inner.undo();
                Ok(())
            }
            EditorAction::Redo => {
                self.inner.redo();
                Ok(())
            }
            other => self.inner.trigger_editor_action(other),
        };
        self.update_state();
        result
    }

    /// Apply a user edit replacing the document.
    pub fn apply_change(&mut self, xml: impl Into<String>) -> Result<()> {
        self.inner.apply_change(xml.into())?;
        self.update_state();
        Ok(())
    }
}

impl std::fmt::Debug for DiagramEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagramEditor")
            .field("id", &self.id)
            .field("editor", &self.inner.name())
            .field("mounted", &self.mounted)
            .field("lifecycle", &self.lifecycle)
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
