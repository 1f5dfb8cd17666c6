//! Typed editor actions.

use serde_json::Value;

/// Edge or center to align selected elements on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
    Top,
    Middle,
    Bottom,
}

impl Alignment {
    fn from_key(key: &str) -> Option<Self> {
        match key {
            "left" => Some(Alignment::Left),
            "center" => Some(Alignment::Center),
            "right" => Some(Alignment::Right),
            "top" => Some(Alignment::Top),
            "middle" => Some(Alignment::Middle),
            "bottom" => Some(Alignment::Bottom),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// An action routed to the active editor of a tab.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction {
    Undo,
    Redo,
    ZoomIn,
    ZoomOut,
    ResetZoom,
    ZoomFit,
    SelectAll,
    RemoveSelection,
    AlignElements(Alignment),
    DistributeElements(Axis),
    SetColor {
        fill: Option<String>,
        stroke: Option<String>,
    },
    LassoTool,
    HandTool,
    SpaceTool,
    GlobalConnectTool,
    DirectEditing,
    Find {
        query: String,
    },
    FindNext,
    FindPrevious,
}

impl EditorAction {
    /// Parse a menu action name with its JSON options.
    ///
    /// Returns `None` for names that are not editor actions or whose
    /// options are missing or malformed.
    pub fn parse(name: &str, options: &Value) -> Option<Self> {
        let option = |key: &str| options.get(key).and_then(Value::as_str);

        let action = match name {
            "undo" => EditorAction::Undo,
            "redo" => EditorAction::Redo,
            "zoomIn" => EditorAction::ZoomIn,
            "zoomOut" => EditorAction::ZoomOut,
            "resetZoom" => EditorAction::ResetZoom,
            "zoomFit" => EditorAction::ZoomFit,
            "selectElements" | "selectAll" => EditorAction::SelectAll,
            "removeSelection" => EditorAction::RemoveSelection,
            "alignElements" => EditorAction::AlignElements(Alignment::from_key(option("type")?)?),
            "distributeHorizontally" => EditorAction::DistributeElements(Axis::Horizontal),
            "distributeVertically" => EditorAction::DistributeElements(Axis::Vertical),
            "setColor" => EditorAction::SetColor {
                fill: option("fill").map(str::to_string),
                stroke: option("stroke").map(str::to_string),
            },
            "lassoTool" => EditorAction::LassoTool,
            "handTool" => EditorAction::HandTool,
            "spaceTool" => EditorAction::SpaceTool,
            "globalConnectTool" => EditorAction::GlobalConnectTool,
            "directEditing" => EditorAction::DirectEditing,
            "find" => EditorAction::Find {
                query: option("query").unwrap_or_default().to_string(),
            },
            "findNext" => EditorAction::FindNext,
            "findPrev" => EditorAction::FindPrevious,
            _ => return None,
        };

        Some(action)
    }

    /// Menu name of the action.
    pub fn name(&self) -> &'static str {
        match self {
            EditorAction::Undo => "undo",
            EditorAction::Redo => "redo",
            EditorAction::ZoomIn => "zoomIn",
            EditorAction::ZoomOut => "zoomOut",
            EditorAction::ResetZoom => "resetZoom",
            EditorAction::ZoomFit => "zoomFit",
            EditorAction::SelectAll => "selectElements",
            EditorAction::RemoveSelection => "removeSelection",
            EditorAction::AlignElements(_) => "alignElements",
            EditorAction::DistributeElements(Axis::Horizontal) => "distributeHorizontally",
            EditorAction::DistributeElements(Axis::Vertical) => "distributeVertically",
            EditorAction::SetColor { .. } => "setColor",
            EditorAction::LassoTool => "lassoTool",
            EditorAction::HandTool => "handTool",
            EditorAction::SpaceTool => "spaceTool",
            EditorAction::GlobalConnectTool => "globalConnectTool",
            EditorAction::DirectEditing => "directEditing",
            EditorAction::Find { .. } => "find",
            EditorAction::FindNext => "findNext",
            EditorAction::FindPrevious => "findPrev",
        }
    }
}
