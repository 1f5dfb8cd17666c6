//! Dispatch of named menu actions.

use super::App;
use crate::editor::EditorAction;
use crate::error::{Error, Result};
use crate::files::Notation;
use crate::tabs::TabId;
use log::debug;
use serde_json::Value;

/// Direction or position for `select-tab`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TabSelection {
    Next,
    Previous,
    Index(usize),
}

impl TabSelection {
    /// Accepts `"next"`, `"previous"`, a bare index, or any of these under
    /// the `"tab"` key.
    fn parse(options: &Value) -> Option<Self> {
        match options {
            Value::String(s) if s == "next" => Some(TabSelection::Next),
            Value::String(s) if s == "previous" => Some(TabSelection::Previous),
            Value::Number(n) => n.as_u64().map(|i| TabSelection::Index(i as usize)),
            Value::Object(map) => map.get("tab").and_then(TabSelection::parse),
            _ => None,
        }
    }
}

impl App {
    /// Run a menu action by name.
    ///
    /// Application level actions are handled here; everything else is
    /// parsed as an [`EditorAction`] for the active tab.
    pub fn trigger_action(&mut self, name: &str, options: &Value) -> Result<()> {
        debug!("Action '{}'", name);

        match name {
            "create-diagram" => self.create_diagram(self.settings.default_notation).map(drop),
            "create-bpmn-diagram" => self.create_diagram(Notation::Bpmn).map(drop),
            "create-dmn-diagram" => self.create_diagram(Notation::Dmn).map(drop),
            "create-cmmn-diagram" => self.create_diagram(Notation::Cmmn).map(drop),
            "open-diagram" => self.show_open_dialog().map(drop),
            "save" => self.save_active_tab(false).map(drop),
            "save-as" => self.save_active_tab(true).map(drop),
            "save-all" => self.save_all_tabs(),
            "export-tab" => self.export_tab().map(drop),
            "close-active-tab" => self.close_active_tab(),
            "close-all-tabs" => self.close_all_tabs(),
            "close-other-tabs" => match self.target_tab(options) {
                Some(keep) => self.close_other_tabs(keep),
                None => Ok(()),
            },
            "reopen-last-tab" => self.reopen_last_tab().map(drop),
            "select-tab" => self.navigate(options),
            "show-editor" => match options.get("editor").and_then(Value::as_str) {
                Some(editor) => self.show_editor(editor),
                None => Err(Error::UnknownEditor(String::new())),
            },
            "toggle-log" => {
                self.toggle_log();
                Ok(())
            }
            "quit" => self.quit(),
            _ => self.trigger_editor_action(name, options),
        }
    }

    /// The tab named by a `"tab"` option, the active tab otherwise.
    fn target_tab(&self, options: &Value) -> Option<TabId> {
        options
            .get("tab")
            .and_then(Value::as_u64)
            .map(|id| id as TabId)
            .or(self.active_tab)
    }

    /// Cycle through tabs or jump to one by position.
    fn navigate(&mut self, options: &Value) -> Result<()> {
        let Some(selection) = TabSelection::parse(options) else {
            return Err(Error::Application(format!(
                "Invalid tab selection: {}",
                options
            )));
        };
        if self.tabs.is_empty() {
            return Ok(());
        }

        let count = self.tabs.len();
        let current = self
            .active_tab
            .and_then(|id| self.tabs.iter().position(|t| t.id() == id));

        let index = match (selection, current) {
            (TabSelection::Index(index), _) => index.min(count - 1),
            (TabSelection::Next, Some(current)) => (current + 1) % count,
            (TabSelection::Previous, Some(current)) => (current + count - 1) % count,
            (TabSelection::Next, None) => 0,
            (TabSelection::Previous, None) => count - 1,
        };
        let id = self.tabs[index].id();
        self.select_tab(id)
    }

    fn trigger_editor_action(&mut self, name: &str, options: &Value) -> Result<()> {
        let Some(action) = EditorAction::parse(name, options) else {
            return Err(Error::ActionUnsupported {
                editor: "app".to_string(),
                action: name.to_string(),
            });
        };
        let Some(id) = self.active_tab else {
            return Ok(());
        };

        let index = self.index_of(id)?;
        let result = self.tabs[index].trigger_action(&action);
        self.drain_tab_events(id);
        result
    }
}
