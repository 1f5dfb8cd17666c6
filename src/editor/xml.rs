//! Plain XML source view.

use super::{Capabilities, CommandStack, Editor, EditorAction, ImportReport, UndoState};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Default)]
struct Search {
    query: String,
    /// Byte offsets of every match
    matches: Vec<usize>,
    current: usize,
}

/// Text editor over the raw XML of a diagram.
///
/// Any text is accepted on import; validity is left to the graphical views.
#[derive(Debug, Default)]
pub struct XmlEditor {
    text: Option<String>,
    stack: CommandStack<String>,
    search: Option<Search>,
}

impl XmlEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Byte offset of the highlighted search match.
    pub fn current_match(&self) -> Option<usize> {
        let search = self.search.as_ref()?;
        search.matches.get(search.current).copied()
    }

    pub fn match_count(&self) -> usize {
        self.search.as_ref().map_or(0, |s| s.matches.len())
    }

    fn find(&mut self, query: &str) {
        let matches = match (&self.text, query.is_empty()) {
            (Some(text), false) => text.match_indices(query).map(|(i, _)| i).collect(),
            _ => Vec::new(),
        };
        self.search = Some(Search {
            query: query.to_string(),
            matches,
            current: 0,
        });
    }

    fn step(&mut self, forward: bool) {
        if let Some(search) = self.search.as_mut() {
            let count = search.matches.len();
            if count > 0 {
                search.current = if forward {
                    (search.current + 1) % count
                } else {
                    (search.current + count - 1) % count
                };
            }
        }
    }

    /// Matches are stale once the text changes.
    fn refresh_search(&mut self) {
        if let Some(query) = self.search.as_ref().map(|s| s.query.clone()) {
            self.find(&query);
        }
    }

    fn replace_text(&mut self, step: fn(&mut CommandStack<String>, String) -> Option<String>) -> bool {
        let Some(current) = self.text.take() else {
            return false;
        };
        let (text, moved) = match step(&mut self.stack, current.clone()) {
            Some(text) => (text, true),
            None => (current, false),
        };
        self.text = Some(text);
        if moved {
            self.refresh_search();
        }
        moved
    }
}

impl Editor for XmlEditor {
    fn name(&self) -> &str {
        "xml"
    }

    fn import_xml(&mut self, xml: &str) -> ImportReport {
        self.text = Some(xml.to_string());
        self.stack.clear();
        self.refresh_search();
        ImportReport::ok(xml, Vec::new())
    }

    fn export_xml(&mut self) -> Result<String> {
        self.text.clone().ok_or_else(|| Error::Export {
            message: "no XML loaded".to_string(),
        })
    }

    fn undo_state(&self) -> UndoState {
        UndoState {
            stack_index: self.stack.revision(),
            can_undo: self.stack.can_undo(),
            can_redo: self.stack.can_redo(),
        }
    }

    fn undo(&mut self) -> bool {
        self.replace_text(CommandStack::undo)
    }

    fn redo(&mut self) -> bool {
        self.replace_text(CommandStack::redo)
    }

    fn has_imported(&self) -> bool {
        self.text.is_some()
    }

    fn apply_change(&mut self, xml: String) -> Result<()> {
        let previous = self.text.replace(xml).ok_or_else(|| Error::Application(
            "cannot edit before XML is loaded".to_string(),
        ))?;
        self.stack.record(previous);
        self.refresh_search();
        Ok(())
    }

    fn trigger_editor_action(&mut self, action: &EditorAction) -> Result<()> {
        match action {
            EditorAction::Find { query } => self.find(query),
            EditorAction::FindNext => self.step(true),
            EditorAction::FindPrevious => self.step(false),
            other => {
                return Err(Error::ActionUnsupported {
                    editor: "xml".to_string(),
                    action: other.name().to_string(),
                })
            }
        }
        Ok(())
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            find: true,
            ..Capabilities::default()
        }
    }
}
