//! File handling module for the modeler
//!
//! This module provides the file descriptor shared by tabs and workspace,
//! notation detection by content sniffing, and the file system and dialog
//! collaborators the application core talks to.

mod descriptor;
pub mod dialogs;
mod fs;
pub mod sniff;

pub use descriptor::*;
pub use dialogs::{
    CloseAnswer, ConsoleDialog, ContentChangedAnswer, ConvertAnswer, Dialog, SavingDeniedAnswer,
};
pub use fs::*;

#[cfg(feature = "native-dialogs")]
pub use dialogs::NativeDialog;
