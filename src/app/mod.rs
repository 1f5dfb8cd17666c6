//! Main application controller for the modeler
//!
//! [`App`] owns the open tabs and drives every file operation through the
//! injected collaborators: dialogs, the file system and the workspace
//! store. Operations run strictly one after another; whenever an operation
//! temporarily makes another tab active it restores the previous one before
//! returning, on error paths as well.
//!
//! The controller lives in several files:
//! - `open`: creating, opening and reloading diagrams
//! - `save`: saving, save-all and exporting
//! - `close`: closing tabs and quitting
//! - `workspace`: persistence and layout
//! - `actions`: dispatch of named menu actions

mod actions;
mod close;
mod open;
mod save;
mod workspace;

#[cfg(test)]
mod tests;

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::files::{Dialog, FileDescriptor, FileSystem};
use crate::logger::Logger;
use crate::menu::MenuState;
use crate::tabs::{MultiEditorTab, TabEvent, TabId, TabProvider};
use crate::workspaces::{Layout, WorkspaceStore};
use log::debug;

// ─────────────────────────────────────────────────────────────────────────────
// Events
// ─────────────────────────────────────────────────────────────────────────────

/// Notifications for the shell hosting the application.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Open tabs, the active tab or the layout changed
    WorkspaceChanged,
    /// The workspace was written to the store
    WorkspacePersisted,
    /// Menu state recomputed from the active tab
    ToolsStateChanged(MenuState),
    LayoutUpdated(Layout),
    /// Something was written to the log panel
    LogChanged,
    TabSelected(TabId),
    TabClosed(TabId),
    /// A dirty tab was not confirmed; every tab stays open
    QuitAborted,
    /// All tabs were confirmed and the workspace persisted
    Quitting,
}

// ─────────────────────────────────────────────────────────────────────────────
// Collaborators
// ─────────────────────────────────────────────────────────────────────────────

/// External services the application talks to.
pub struct Collaborators {
    pub dialog: Box<dyn Dialog>,
    pub file_system: Box<dyn FileSystem>,
    pub workspace: Box<dyn WorkspaceStore>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Application
// ─────────────────────────────────────────────────────────────────────────────

/// Root controller over all open tabs.
pub struct App {
    /// Open tabs in display order
    tabs: Vec<MultiEditorTab>,
    active_tab: Option<TabId>,
    /// Next tab ID (for unique identification)
    next_tab_id: TabId,
    providers: Vec<Box<dyn TabProvider>>,
    dialog: Box<dyn Dialog>,
    file_system: Box<dyn FileSystem>,
    workspace: Box<dyn WorkspaceStore>,
    settings: Settings,
    /// Whether settings have been modified and need saving
    settings_dirty: bool,
    logger: Logger,
    layout: Layout,
    menu: MenuState,
    /// Saved files of closed tabs, most recently closed last
    file_history: Vec<FileDescriptor>,
    events: Vec<AppEvent>,
}

impl App {
    pub fn new(
        settings: Settings,
        collaborators: Collaborators,
        providers: Vec<Box<dyn TabProvider>>,
    ) -> Self {
        Self {
            tabs: Vec::new(),
            active_tab: None,
            next_tab_id: 0,
            providers,
            dialog: collaborators.dialog,
            file_system: collaborators.file_system,
            workspace: collaborators.workspace,
            settings,
            settings_dirty: false,
            logger: Logger::new(),
            layout: Layout::default(),
            menu: MenuState::compute(None),
            file_history: Vec::new(),
            events: Vec::new(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn tabs(&self) -> &[MultiEditorTab] {
        &self.tabs
    }

    pub fn tab(&self, id: TabId) -> Option<&MultiEditorTab> {
        self.tabs.iter().find(|t| t.id() == id)
    }

    pub fn active_tab_id(&self) -> Option<TabId> {
        self.active_tab
    }

    pub fn active_tab(&self) -> Option<&MultiEditorTab> {
        self.active_tab.and_then(|id| self.tab(id))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Settings changed since the last call, for the caller to persist.
    pub fn take_settings_changes(&mut self) -> Option<Settings> {
        std::mem::replace(&mut self.settings_dirty, false).then(|| self.settings.clone())
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Menu state of the active tab.
    pub fn menu(&self) -> &MenuState {
        &self.menu
    }

    pub fn file_history(&self) -> &[FileDescriptor] {
        &self.file_history
    }

    /// Drain the events raised since the last call.
    pub fn take_events(&mut self) -> Vec<AppEvent> {
        std::mem::take(&mut self.events)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Tab Management
    // ─────────────────────────────────────────────────────────────────────────

    fn index_of(&self, id: TabId) -> Result<usize> {
        self.tabs
            .iter()
            .position(|t| t.id() == id)
            .ok_or(Error::UnknownTab(id))
    }

    fn provider_index(&self, notation: crate::files::Notation) -> Result<usize> {
        self.providers
            .iter()
            .position(|p| p.can_create(notation))
            .ok_or(Error::NoProvider(notation))
    }

    /// Create a tab for a file without selecting it.
    fn add_tab(&mut self, file: FileDescriptor) -> Result<TabId> {
        let provider = self.provider_index(file.file_type)?;
        let id = self.next_tab_id;
        let tab = self.providers[provider].create_tab(id, file)?;
        self.next_tab_id += 1;
        self.tabs.push(tab);
        debug!("Added tab {} ({} open)", id, self.tabs.len());
        Ok(id)
    }

    /// Make a tab the active one and check it for external changes.
    ///
    /// Selecting an unknown tab is a programming error.
    pub fn select_tab(&mut self, id: TabId) -> Result<()> {
        self.index_of(id)?;
        let changed = self.active_tab != Some(id);

        self.swap_active(Some(id));
        if changed {
            debug!("Selected tab {}", id);
            self.events.push(AppEvent::TabSelected(id));
            self.workspace_changed();
        }

        if let Err(err) = self.recheck_tab_content(id) {
            self.log_failure("open", &err);
        }
        Ok(())
    }

    /// Point `active_tab` somewhere without any side effect besides focusing.
    ///
    /// Used for the temporary switches inside save and close flows.
    fn swap_active(&mut self, id: Option<TabId>) {
        self.active_tab = id;
        match id.and_then(|id| self.tabs.iter_mut().find(|t| t.id() == id)) {
            Some(tab) => {
                tab.activate();
                let id = tab.id();
                self.drain_tab_events(id);
            }
            None => self.set_menu(MenuState::compute(None)),
        }
    }

    /// Forward everything a tab reported since the last drain.
    fn drain_tab_events(&mut self, id: TabId) {
        let Some(tab) = self.tabs.iter_mut().find(|t| t.id() == id) else {
            return;
        };
        let name = tab.file().name.clone();

        for event in tab.take_events() {
            match event {
                TabEvent::StateChanged(state) if self.active_tab == Some(id) => {
                    self.set_menu(MenuState::compute(Some(&state)));
                }
                TabEvent::Warnings(warnings) => {
                    for warning in warnings {
                        self.logger.warn(&name, warning);
                    }
                    self.flush_log();
                }
                _ => {}
            }
        }
    }

    fn set_menu(&mut self, menu: MenuState) {
        if self.menu != menu {
            self.menu = menu.clone();
            self.events.push(AppEvent::ToolsStateChanged(menu));
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Editing
    // ─────────────────────────────────────────────────────────────────────────

    /// Switch the active tab to another editor view.
    pub fn show_editor(&mut self, editor: &str) -> Result<()> {
        let Some(id) = self.active_tab else {
            return Ok(());
        };
        let index = self.index_of(id)?;
        let result = self.tabs[index].show_editor(editor, self.dialog.as_mut());
        self.drain_tab_events(id);
        result
    }

    /// Apply a user edit to the active editor of the active tab.
    pub fn apply_change(&mut self, xml: impl Into<String>) -> Result<()> {
        let Some(id) = self.active_tab else {
            return Ok(());
        };
        let index = self.index_of(id)?;
        let result = self.tabs[index].apply_change(xml);
        self.drain_tab_events(id);
        result
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Logging
    // ─────────────────────────────────────────────────────────────────────────

    /// Write a failure to the log panel; cancellations stay silent.
    fn log_failure(&mut self, category: &str, err: &Error) {
        if err.is_canceled() {
            debug!("{}: canceled by user", category);
            return;
        }
        self.logger.error(category, err.to_string());
        self.flush_log();
    }

    fn flush_log(&mut self) {
        if self.logger.take_changed() {
            self.events.push(AppEvent::LogChanged);
        }
    }
}
