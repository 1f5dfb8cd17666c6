//! Closing tabs and quitting.

use super::{App, AppEvent};
use crate::error::{Error, Result};
use crate::files::CloseAnswer;
use crate::menu::MenuState;
use crate::tabs::TabId;
use log::{debug, info};

impl App {
    /// Make sure closing a tab loses nothing.
    ///
    /// Clean tabs pass right away. For dirty tabs the user chooses between
    /// saving, discarding and canceling; cancel fails with
    /// [`Error::Canceled`], as does canceling the save dialog.
    fn confirm_close(&mut self, id: TabId) -> Result<()> {
        let index = self.index_of(id)?;
        let tab = &self.tabs[index];
        if !tab.is_dirty() {
            return Ok(());
        }

        let file = tab.file().clone();
        match self.dialog.close(&file)? {
            CloseAnswer::Discard => {
                debug!("Discarding changes to '{}'", file.name);
                Ok(())
            }
            CloseAnswer::Save => self.save_tab(id, false).map(|_| ()),
            CloseAnswer::Cancel => Err(Error::Canceled),
        }
    }

    /// Close a tab, asking first if it has unsaved changes.
    ///
    /// Tabs whose editor refuses closing stay open.
    pub fn close_tab(&mut self, id: TabId) -> Result<()> {
        let index = self.index_of(id)?;
        if !self.tabs[index].is_closable() {
            debug!("Tab {} cannot be closed", id);
            return Ok(());
        }
        self.confirm_close(id)?;
        self.remove_tab(id)
    }

    /// Close the active tab.
    pub fn close_active_tab(&mut self) -> Result<()> {
        match self.active_tab {
            Some(id) => self.close_tab(id),
            None => Ok(()),
        }
    }

    /// Drop a tab without asking.
    ///
    /// Saved files are remembered for [`App::reopen_last_tab`]. When the
    /// active tab goes away its right neighbour is selected, or the left
    /// one at the end of the row.
    fn remove_tab(&mut self, id: TabId) -> Result<()> {
        let index = self.index_of(id)?;
        let tab = self.tabs.remove(index);
        info!("Closed tab {} ('{}')", id, tab.file().name);

        let file = tab.file();
        if !file.is_unsaved() {
            self.file_history.retain(|f| !f.same_file(file));
            self.file_history.push(file.clone());
            let max = self.settings.max_file_history;
            if self.file_history.len() > max {
                let excess = self.file_history.len() - max;
                self.file_history.drain(..excess);
            }
        }
        self.events.push(AppEvent::TabClosed(id));

        if self.active_tab == Some(id) {
            self.active_tab = None;
            match self.tabs.get(index).or_else(|| self.tabs.last()) {
                Some(next) => {
                    let next = next.id();
                    self.select_tab(next)?;
                }
                None => self.set_menu(MenuState::compute(None)),
            }
        }

        self.workspace_changed();
        Ok(())
    }

    /// Close several tabs one after another.
    ///
    /// Stops at the first tab that cannot be closed. The tab that was active
    /// before stays active if it is still open.
    pub fn close_tabs(&mut self, ids: Vec<TabId>) -> Result<()> {
        let previous = self.active_tab;

        let mut result = Ok(());
        for id in ids {
            if self.tab(id).is_none() {
                continue;
            }
            if let Err(err) = self.close_tab(id) {
                result = Err(err);
                break;
            }
        }

        if let Some(previous) = previous {
            if self.active_tab != Some(previous) && self.tab(previous).is_some() {
                self.select_tab(previous)?;
            }
        }
        if let Err(err) = &result {
            self.log_failure("close", err);
        }
        result
    }

    pub fn close_all_tabs(&mut self) -> Result<()> {
        let ids = self.tabs.iter().map(|t| t.id()).collect();
        self.close_tabs(ids)
    }

    /// Close every tab except `keep`.
    pub fn close_other_tabs(&mut self, keep: TabId) -> Result<()> {
        self.index_of(keep)?;
        let ids = self
            .tabs
            .iter()
            .map(|t| t.id())
            .filter(|&id| id != keep)
            .collect();
        self.close_tabs(ids)
    }

    /// Confirm every dirty tab, then persist the workspace and drop all tabs.
    ///
    /// When any tab is not confirmed the quit is aborted and every tab
    /// stays open.
    pub fn quit(&mut self) -> Result<()> {
        let dirty: Vec<TabId> = self
            .tabs
            .iter()
            .filter(|t| t.is_dirty())
            .map(|t| t.id())
            .collect();

        for id in dirty {
            if let Err(err) = self.confirm_close(id) {
                info!("Quit aborted");
                self.log_failure("quit", &err);
                self.events.push(AppEvent::QuitAborted);
                return Err(err);
            }
        }

        self.events.push(AppEvent::WorkspaceChanged);
        if let Err(err) = self.persist_workspace() {
            info!("Quit aborted");
            self.log_failure("quit", &err);
            self.events.push(AppEvent::QuitAborted);
            return Err(err);
        }

        self.tabs.clear();
        self.active_tab = None;
        self.set_menu(MenuState::compute(None));
        info!("Quitting");
        self.events.push(AppEvent::Quitting);
        Ok(())
    }
}
