//! Modeling engines behind the graphical editors.
//!
//! The canvas of each notation is a black box implementing
//! [`ModelingEngine`]. [`DocumentEngine`] is the headless engine used when no
//! canvas is attached: it keeps the document and its command history but has
//! no notion of shapes.

use super::{CommandStack, EditorAction, ImportReport, UndoState};
use crate::error::{Error, Result};
use crate::files::{ExportType, Notation};
use log::debug;
use std::rc::Rc;

/// Contract of a notation specific modeling engine.
pub trait ModelingEngine {
    /// Load a document, resetting the command stack.
    fn import_xml(&mut self, xml: &str) -> ImportReport;

    fn save_xml(&self) -> Result<String>;

    fn command_stack(&self) -> UndoState;

    fn undo(&mut self) -> bool;

    fn redo(&mut self) -> bool;

    /// Whether a definitions root is loaded.
    fn has_definitions(&self) -> bool;

    /// Replace the loaded definitions as one undoable command.
    fn update_definitions(&mut self, xml: String) -> Result<()>;

    fn execute(&mut self, action: &EditorAction) -> Result<()>;

    fn export_types(&self) -> Vec<ExportType> {
        Vec::new()
    }

    fn export_image(&self, export: ExportType) -> Result<String> {
        Err(Error::ExportUnsupported {
            editor: "engine".to_string(),
            export,
        })
    }
}

/// Creates the engine for a notation when an editor is first mounted.
pub type EngineFactory = Rc<dyn Fn(Notation) -> Box<dyn ModelingEngine>>;

/// Factory producing a [`DocumentEngine`] for every notation.
pub fn default_engines() -> EngineFactory {
    Rc::new(|notation| Box::new(DocumentEngine::new(notation)) as Box<dyn ModelingEngine>)
}

// ─────────────────────────────────────────────────────────────────────────────
// Headless Document Engine
// ─────────────────────────────────────────────────────────────────────────────

const MIN_ZOOM: f64 = 0.2;
const MAX_ZOOM: f64 = 4.0;
const ZOOM_STEP: f64 = 1.2;

/// Headless [`ModelingEngine`] keeping the document as text.
#[derive(Debug)]
pub struct DocumentEngine {
    notation: Notation,
    definitions: Option<String>,
    stack: CommandStack<String>,
    zoom: f64,
}

impl DocumentEngine {
    pub fn new(notation: Notation) -> Self {
        Self {
            notation,
            definitions: None,
            stack: CommandStack::default(),
            zoom: 1.0,
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        debug!("{} canvas zoom: {:.2}", self.notation.display_name(), self.zoom);
    }
}

/// Local name of the first element of a document, skipping the prolog,
/// comments and processing instructions.
fn root_element(xml: &str) -> Option<&str> {
    let mut rest = xml;
    loop {
        let start = rest.find('<')?;
        rest = &rest[start + 1..];
        match rest.chars().next()? {
            '?' | '!' => continue,
            _ => {
                let end = rest
                    .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
                    .unwrap_or(rest.len());
                let name = &rest[..end];
                return Some(name.rsplit(':').next().unwrap_or(name));
            }
        }
    }
}

impl ModelingEngine for DocumentEngine {
    fn import_xml(&mut self, xml: &str) -> ImportReport {
        self.definitions = None;
        self.stack.clear();

        if root_element(xml) != Some("definitions") {
            return ImportReport::failed(xml, "no definitions element found");
        }
        if crate::files::sniff::detect_notation(xml) != Some(self.notation) {
            return ImportReport::failed(
                xml,
                format!("not a {} document", self.notation.display_name()),
            );
        }

        self.definitions = Some(xml.to_string());
        self.zoom = 1.0;
        ImportReport::ok(xml, Vec::new())
    }

    fn save_xml(&self) -> Result<String> {
        self.definitions.clone().ok_or_else(|| Error::Export {
            message: "no diagram loaded".to_string(),
        })
    }

    fn command_stack(&self) -> UndoState {
        UndoState {
            stack_index: self.stack.revision(),
            can_undo: self.stack.can_undo(),
            can_redo: self.stack.can_redo(),
        }
    }

    fn undo(&mut self) -> bool {
        let Some(current) = self.definitions.take() else {
            return false;
        };
        match self.stack.undo(current.clone()) {
            Some(previous) => {
                self.definitions = Some(previous);
                true
            }
            None => {
                self.definitions = Some(current);
                false
            }
        }
    }

    fn redo(&mut self) -> bool {
        let Some(current) = self.definitions.take() else {
            return false;
        };
        match self.stack.redo(current.clone()) {
            Some(next) => {
                self.definitions = Some(next);
                true
            }
            None => {
                self.definitions = Some(current);
                false
            }
        }
    }

    fn has_definitions(&self) -> bool {
        self.definitions.is_some()
    }

    fn update_definitions(&mut self, xml: String) -> Result<()> {
        let previous = self.definitions.replace(xml).ok_or_else(|| Error::Application(
            "cannot edit before a diagram is loaded".to_string(),
        ))?;
        self.stack.record(previous);
        Ok(())
    }

    fn execute(&mut self, action: &EditorAction) -> Result<()> {
        match action {
            EditorAction::ZoomIn => self.set_zoom(self.zoom * ZOOM_STEP),
            EditorAction::ZoomOut => self.set_zoom(self.zoom / ZOOM_STEP),
            EditorAction::ResetZoom | EditorAction::ZoomFit => self.set_zoom(1.0),
            other => {
                return Err(Error::ActionUnsupported {
                    editor: format!("{} document engine", self.notation.display_name()),
                    action: other.name().to_string(),
                })
            }
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
