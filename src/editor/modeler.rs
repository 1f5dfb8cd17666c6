//! Graphical modeler view of one notation.

use super::{
    Capabilities, Editor, EditorAction, EngineFactory, ImportReport, ModelingEngine, UndoState,
};
use crate::error::{Error, Result};
use crate::files::{ExportType, Notation};
use log::debug;

/// The diagram canvas of a notation.
///
/// The modeling engine is only created when the editor is first mounted.
pub struct ModelerEditor {
    notation: Notation,
    factory: EngineFactory,
    engine: Option<Box<dyn ModelingEngine>>,
}

impl ModelerEditor {
    pub fn new(notation: Notation, factory: EngineFactory) -> Self {
        Self {
            notation,
            factory,
            engine: None,
        }
    }

    pub fn notation(&self) -> Notation {
        self.notation
    }

    /// Whether the notation's canvas offers this action.
    pub fn supports(&self, action: &EditorAction) -> bool {
        use EditorAction::*;

        let common = matches!(
            action,
            Undo | Redo
                | ZoomIn
                | ZoomOut
                | ResetZoom
                | ZoomFit
                | SelectAll
                | RemoveSelection
                | LassoTool
                | HandTool
                | DirectEditing
        );

        match self.notation {
            Notation::Bpmn => {
                common
                    || matches!(
                        action,
                        AlignElements(_)
                            | DistributeElements(_)
                            | SetColor { .. }
                            | SpaceTool
                            | GlobalConnectTool
                            | Find { .. }
                    )
            }
            Notation::Cmmn => common || matches!(action, SpaceTool | GlobalConnectTool),
            Notation::Dmn => common,
        }
    }

    fn engine_mut(&mut self) -> &mut Box<dyn ModelingEngine> {
        let notation = self.notation;
        let factory = &self.factory;
        self.engine.get_or_insert_with(|| {
            debug!("Creating {} modeler", notation.display_name());
            factory(notation)
        })
    }
}

impl Editor for ModelerEditor {
    fn name(&self) -> &str {
        self.notation.extension()
    }

    fn mount(&mut self) {
        self.engine_mut();
    }

    fn import_xml(&mut self, xml: &str) -> ImportReport {
        self.engine_mut().import_xml(xml)
    }

    fn export_xml(&mut self) -> Result<String> {
        self.engine_mut().save_xml()
    }

    fn undo_state(&self) -> UndoState {
        self.engine
            .as_ref()
            .map(|engine| engine.command_stack())
            .unwrap_or_default()
    }

    fn undo(&mut self) -> bool {
        self.engine.as_mut().is_some_and(|engine| engine.undo())
    }

    fn redo(&mut self) -> bool {
        self.engine.as_mut().is_some_and(|engine| engine.redo())
    }

    fn has_imported(&self) -> bool {
        self.engine
            .as_ref()
            .is_some_and(|engine| engine.has_definitions())
    }

    fn apply_change(&mut self, xml: String) -> Result<()> {
        self.engine_mut().update_definitions(xml)
    }

    fn trigger_editor_action(&mut self, action: &EditorAction) -> Result<()> {
        if !self.supports(action) {
            return Err(Error::ActionUnsupported {
                editor: self.notation.display_name().to_string(),
                action: action.name().to_string(),
            });
        }
        self.engine_mut().execute(action)
    }

    fn capabilities(&self) -> Capabilities {
        let bpmn = self.notation == Notation::Bpmn;
        Capabilities {
            zoom: true,
            align: bpmn,
            distribute: bpmn,
            color: bpmn,
            find: bpmn,
        }
    }

    fn export_types(&self) -> Vec<ExportType> {
        self.engine
            .as_ref()
            .map(|engine| engine.export_types())
            .unwrap_or_default()
    }

    fn export_as(&mut self, export: ExportType) -> Result<String> {
        self.engine_mut().export_image(export)
    }
}
