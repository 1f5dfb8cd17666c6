//! Modeler - tab and editor lifecycle core
//!
//! The pieces of a diagram modeler that decide which editor shows a file,
//! how edits move between the graphical and the XML view, when a tab counts
//! as dirty, and how saving, closing and quitting walk through dialogs that
//! the user may cancel at any step.
//!
//! - [`App`] owns the tabs and runs every user facing operation
//! - [`MultiEditorTab`] hosts the editors of one file
//! - [`DiagramEditor`] wraps a single editor view and its import lifecycle
//! - [`TabProvider`] creates new files and tabs per notation
//!
//! Dialogs, the file system and workspace storage are traits, so the core
//! runs the same against native services and in tests.

pub mod app;
pub mod config;
pub mod editor;
pub mod error;
pub mod files;
pub mod logger;
pub mod menu;
pub mod tabs;
pub mod workspaces;

#[cfg(test)]
mod test_support;

pub use app::{App, AppEvent, Collaborators};
pub use editor::{DiagramEditor, EditorAction, EditorEvent};
pub use error::{Error, Result};
pub use files::{Dialog, FileDescriptor, FileSystem, Notation};
pub use tabs::{MultiEditorTab, TabEvent, TabId, TabProvider};
pub use workspaces::{Layout, WorkspaceConfig, WorkspaceStore};
