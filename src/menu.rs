//! Menu and toolbar button state.
//!
//! The whole menu is a snapshot computed from the active tab's
//! [`ToolState`]; nothing else ever changes button state.

use crate::files::{ExportType, Notation};
use crate::tabs::ToolState;

/// Enablement of one button, with the sub entries it offers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ButtonState {
    pub disabled: bool,
    pub choices: Vec<String>,
}

impl ButtonState {
    fn enabled_if(condition: bool) -> Self {
        Self {
            disabled: !condition,
            choices: Vec::new(),
        }
    }
}

/// Button state of menus and toolbars.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MenuState {
    pub save: ButtonState,
    pub save_as: ButtonState,
    pub close: ButtonState,
    pub undo: ButtonState,
    pub redo: ButtonState,
    /// Choices are the image formats of the active editor
    pub export_as: ButtonState,
    pub zoom: ButtonState,
    pub align: ButtonState,
    pub distribute: ButtonState,
    pub color: ButtonState,
    pub find: ButtonState,
    /// Notation whose modeling toolbar is visible
    pub toolbar: Option<Notation>,
}

impl MenuState {
    /// Compute the menu for the active tab, or for no tab at all.
    pub fn compute(state: Option<&ToolState>) -> Self {
        let Some(state) = state else {
            return Self::disabled();
        };

        let caps = state.capabilities;
        let diagram = state.active_editor == "diagram";
        Self {
            save: ButtonState::enabled_if(state.save),
            save_as: ButtonState::enabled_if(state.save),
            close: ButtonState::enabled_if(state.closable),
            undo: ButtonState::enabled_if(state.undo),
            redo: ButtonState::enabled_if(state.redo),
            export_as: ButtonState {
                disabled: state.export_as.is_empty(),
                choices: state
                    .export_as
                    .iter()
                    .map(ExportType::extension)
                    .map(str::to_string)
                    .collect(),
            },
            zoom: ButtonState::enabled_if(caps.zoom),
            align: ButtonState::enabled_if(caps.align && state.editable),
            distribute: ButtonState::enabled_if(caps.distribute && state.editable),
            color: ButtonState::enabled_if(caps.color && state.editable),
            find: ButtonState::enabled_if(caps.find),
            toolbar: diagram.then_some(state.diagram_type),
        }
    }

    fn disabled() -> Self {
        let off = ButtonState::enabled_if(false);
        Self {
            save: off.clone(),
            save_as: off.clone(),
            close: off.clone(),
            undo: off.clone(),
            redo: off.clone(),
            export_as: off.clone(),
            zoom: off.clone(),
            align: off.clone(),
            distribute: off.clone(),
            color: off.clone(),
            find: off,
            toolbar: None,
        }
    }

    /// Look a button up by its menu id, such as `"save-as"`.
    pub fn button(&self, id: &str) -> Option<&ButtonState> {
        let button = match id {
            "save" => &self.save,
            "save-as" => &self.save_as,
            "close" => &self.close,
            "undo" => &self.undo,
            "redo" => &self.redo,
            "export-as" => &self.export_as,
            "zoom" => &self.zoom,
            "align" => &self.align,
            "distribute" => &self.distribute,
            "color" => &self.color,
            "find" => &self.find,
            _ => return None,
        };
        Some(button)
    }
}
