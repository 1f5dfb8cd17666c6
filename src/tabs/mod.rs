//! Tabs of the modeler
//!
//! A tab is one open diagram file viewed through several interchangeable
//! editors. Tabs are created by a [`TabProvider`] for the file's notation.

mod multi_editor;
mod provider;

pub use multi_editor::MultiEditorTab;
pub use provider::{DiagramTabProvider, TabProvider};

use crate::editor::{Capabilities, EditorState};
use crate::files::{ExportType, Notation};

/// Identifier of an open tab, unique for the lifetime of the application.
pub type TabId = usize;

/// Notifications raised by a tab, drained by the application.
#[derive(Debug, Clone, PartialEq)]
pub enum TabEvent {
    /// The active editor of the tab changed
    Changed,
    /// The active editor reported a new state
    StateChanged(ToolState),
    /// The last import succeeded with warnings
    Warnings(Vec<String>),
}

/// Tool state of a tab as seen by menus and toolbars.
///
/// Tab defaults merged with the state of its active editor; whatever the
/// editor reports wins.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolState {
    pub diagram_type: Notation,
    /// Id of the active editor, such as `"diagram"` or `"xml"`
    pub active_editor: String,
    pub dirty: bool,
    pub save: bool,
    pub closable: bool,
    pub undo: bool,
    pub redo: bool,
    pub editable: bool,
    pub export_as: Vec<ExportType>,
    pub capabilities: Capabilities,
}

impl ToolState {
    /// Defaults of a tab before any editor reported.
    pub fn initial(diagram_type: Notation, active_editor: &str, dirty: bool) -> Self {
        Self {
            diagram_type,
            active_editor: active_editor.to_string(),
            dirty,
            save: true,
            closable: true,
            undo: false,
            redo: false,
            editable: false,
            export_as: Vec::new(),
            capabilities: Capabilities::default(),
        }
    }

    /// Overlay an editor report on the tab defaults.
    pub fn merge(&self, state: &EditorState, fallback_dirty: bool) -> Self {
        Self {
            diagram_type: self.diagram_type,
            active_editor: self.active_editor.clone(),
            dirty: state.dirty.unwrap_or(fallback_dirty),
            save: state.save.unwrap_or(true),
            closable: state.closable.unwrap_or(true),
            undo: state.undo,
            redo: state.redo,
            editable: state.editable,
            export_as: state.export_as.clone(),
            capabilities: state.capabilities,
        }
    }
}
