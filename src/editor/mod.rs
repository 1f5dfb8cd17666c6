//! Editor module for the modeler
//!
//! An [`Editor`] is one view over a diagram file: the graphical modeler of a
//! notation ([`ModelerEditor`]) or the plain XML source ([`XmlEditor`]).
//! [`DiagramEditor`] wraps any editor with the import suppression and dirty
//! tracking every view shares.

mod action;
mod command_stack;
mod diagram;
mod engine;
mod modeler;
mod xml;

pub use action::{Alignment, Axis, EditorAction};
pub use command_stack::CommandStack;
pub use diagram::{DiagramEditor, EditorEvent, EditorLifecycle, InitialState};
pub use engine::{default_engines, DocumentEngine, EngineFactory, ModelingEngine};
pub use modeler::ModelerEditor;
pub use xml::XmlEditor;

use crate::error::{Error, Result};
use crate::files::ExportType;

// ─────────────────────────────────────────────────────────────────────────────
// Reports and State
// ─────────────────────────────────────────────────────────────────────────────

/// Outcome of importing XML into an editor.
///
/// Import failures are captured here instead of being returned as errors.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImportReport {
    pub error: Option<String>,
    pub warnings: Vec<String>,
    pub xml: String,
}

impl ImportReport {
    pub fn ok(xml: impl Into<String>, warnings: Vec<String>) -> Self {
        Self {
            error: None,
            warnings,
            xml: xml.into(),
        }
    }

    pub fn failed(xml: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            warnings: Vec::new(),
            xml: xml.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Position of an editor's command stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UndoState {
    /// Revision of the current document state
    pub stack_index: u64,
    pub can_undo: bool,
    pub can_redo: bool,
}

/// Tool features an editor offers beyond undo and redo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub zoom: bool,
    pub align: bool,
    pub distribute: bool,
    pub color: bool,
    pub find: bool,
}

/// State an editor reports after every change.
///
/// `dirty`, `save` and `closable` are optional: when the editor leaves them
/// out, the tab fills in its own defaults.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EditorState {
    pub dirty: Option<bool>,
    pub save: Option<bool>,
    pub closable: Option<bool>,
    pub undo: bool,
    pub redo: bool,
    /// Whether a document is loaded and can be edited
    pub editable: bool,
    pub export_as: Vec<ExportType>,
    pub capabilities: Capabilities,
}

// ─────────────────────────────────────────────────────────────────────────────
// Editor Capability Trait
// ─────────────────────────────────────────────────────────────────────────────

/// One interchangeable view over a diagram file.
pub trait Editor {
    /// Short label used in logs and error messages.
    fn name(&self) -> &str;

    /// Prepare the view for its first display.
    fn mount(&mut self) {}

    /// Replace the document. Failures are reported, not returned.
    fn import_xml(&mut self, xml: &str) -> ImportReport;

    /// Serialize the current document.
    fn export_xml(&mut self) -> Result<String>;

    fn undo_state(&self) -> UndoState;

    fn undo(&mut self) -> bool;

    fn redo(&mut self) -> bool;

    /// Whether a document was imported successfully and is loaded.
    fn has_imported(&self) -> bool;

    /// Apply a user edit that replaces the document, recording it for undo.
    fn apply_change(&mut self, xml: String) -> Result<()>;

    /// Run a view specific action such as zooming or aligning.
    ///
    /// Undo and redo never reach this method.
    fn trigger_editor_action(&mut self, action: &EditorAction) -> Result<()>;

    fn capabilities(&self) -> Capabilities {
        Capabilities::default()
    }

    /// Whether the tab showing this view may be closed. `None` leaves it to the tab.
    fn closable(&self) -> Option<bool> {
        None
    }

    fn export_types(&self) -> Vec<ExportType> {
        Vec::new()
    }

    fn export_as(&mut self, export: ExportType) -> Result<String> {
        Err(Error::ExportUnsupported {
            editor: self.name().to_string(),
            export,
        })
    }
}
