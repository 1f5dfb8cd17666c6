//! Dialogs the application core asks the user through.
//!
//! Every interaction is one method returning a typed answer. Choosing
//! "cancel" is an answer, not an error; the core turns it into
//! [`Error::Canceled`](crate::error::Error::Canceled) where the operation
//! has to fail.

use super::{ExportType, FileDescriptor, Notation};
use crate::error::{Error, Result};
use log::debug;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Answers
// ─────────────────────────────────────────────────────────────────────────────

/// Answer to "this diagram has unsaved changes".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseAnswer {
    Save,
    Discard,
    Cancel,
}

/// Answer to "the file changed on disk".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentChangedAnswer {
    /// Replace the editor contents with the file on disk
    Reload,
    /// Keep the in-memory contents
    Keep,
}

/// Answer to "this file uses a deprecated namespace".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvertAnswer {
    Yes,
    No,
    Cancel,
}

/// Answer to "you are not allowed to write here".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SavingDeniedAnswer {
    SaveAs,
    Cancel,
}

// ─────────────────────────────────────────────────────────────────────────────
// Dialog Contract
// ─────────────────────────────────────────────────────────────────────────────

/// User-facing dialogs consumed by the application core.
///
/// Methods returning `Result` may fail when the dialog itself cannot be
/// shown; the notification methods cannot fail.
pub trait Dialog {
    /// Pick files to open. An empty selection means the user canceled.
    fn open(&mut self, default_dir: Option<&Path>) -> Result<Vec<PathBuf>>;

    fn open_error(&mut self, path: &Path, err: &Error);

    /// Pick a location to save to. `None` means the user canceled.
    fn save_as(&mut self, file: &FileDescriptor) -> Result<Option<PathBuf>>;

    fn save_error(&mut self, file: &FileDescriptor, err: &Error);

    fn saving_denied(&mut self, file: &FileDescriptor) -> Result<SavingDeniedAnswer>;

    fn close(&mut self, file: &FileDescriptor) -> Result<CloseAnswer>;

    fn content_changed(&mut self, file: &FileDescriptor) -> Result<ContentChangedAnswer>;

    fn unrecognized_file_error(&mut self, name: &str);

    fn convert_namespace(&mut self, name: &str, notation: Notation) -> Result<ConvertAnswer>;

    /// Pick a location for an exported image. `None` means the user canceled.
    fn export_as(&mut self, file: &FileDescriptor) -> Result<Option<PathBuf>>;

    fn export_error(&mut self, err: &Error);

    fn import_error(&mut self, name: &str, message: &str);
}

// ─────────────────────────────────────────────────────────────────────────────
// Console Dialog
// ─────────────────────────────────────────────────────────────────────────────

/// Line based [`Dialog`] for terminals and headless sessions.
///
/// Questions are written to `output`, answers read from `input`. End of
/// input counts as canceling.
pub struct ConsoleDialog<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsoleDialog<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{} ", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Ask until one of the keyed choices is picked; EOF picks `fallback`.
    fn choose<T: Copy>(&mut self, question: &str, choices: &[(&str, T)], fallback: T) -> Result<T> {
        let keys: Vec<&str> = choices.iter().map(|(key, _)| *key).collect();
        let prompt = format!("{} [{}]", question, keys.join("/"));

        loop {
            let Some(answer) = self.read_line(&prompt)? else {
                return Ok(fallback);
            };
            let answer = answer.to_lowercase();
            if let Some((_, value)) = choices.iter().find(|(key, _)| *key == answer) {
                return Ok(*value);
            }
            debug!("Unexpected answer '{}'", answer);
        }
    }

    fn report(&mut self, message: &str) {
        if let Err(e) = writeln!(self.output, "{}", message) {
            debug!("Failed to write dialog message: {}", e);
        }
    }
}

impl<R: BufRead, W: Write> Dialog for ConsoleDialog<R, W> {
    fn open(&mut self, _default_dir: Option<&Path>) -> Result<Vec<PathBuf>> {
        let paths = self
            .read_line("Files to open (space separated):")?
            .unwrap_or_default();
        Ok(paths.split_whitespace().map(PathBuf::from).collect())
    }

    fn open_error(&mut self, path: &Path, err: &Error) {
        self.report(&format!("Could not open {}: {}", path.display(), err));
    }

    fn save_as(&mut self, file: &FileDescriptor) -> Result<Option<PathBuf>> {
        let answer = self.read_line(&format!("Save '{}' as (empty to cancel):", file.name))?;
        Ok(answer.filter(|a| !a.is_empty()).map(PathBuf::from))
    }

    fn save_error(&mut self, file: &FileDescriptor, err: &Error) {
        self.report(&format!("Could not save {}: {}", file.name, err));
    }

    fn saving_denied(&mut self, file: &FileDescriptor) -> Result<SavingDeniedAnswer> {
        self.choose(
            &format!("Not allowed to write '{}'. Save somewhere else?", file.name),
            &[
                ("yes", SavingDeniedAnswer::SaveAs),
                ("no", SavingDeniedAnswer::Cancel),
            ],
            SavingDeniedAnswer::Cancel,
        )
    }

    fn close(&mut self, file: &FileDescriptor) -> Result<CloseAnswer> {
        self.choose(
            &format!("Save changes to '{}' before closing?", file.name),
            &[
                ("save", CloseAnswer::Save),
                ("discard", CloseAnswer::Discard),
                ("cancel", CloseAnswer::Cancel),
            ],
            CloseAnswer::Cancel,
        )
    }

    fn content_changed(&mut self, file: &FileDescriptor) -> Result<ContentChangedAnswer> {
        self.choose(
            &format!("'{}' changed on disk. Reload it?", file.name),
            &[
                ("reload", ContentChangedAnswer::Reload),
                ("keep", ContentChangedAnswer::Keep),
            ],
            ContentChangedAnswer::Keep,
        )
    }

    fn unrecognized_file_error(&mut self, name: &str) {
        self.report(&format!("'{}' is not a BPMN, DMN or CMMN file", name));
    }

    fn convert_namespace(&mut self, name: &str, notation: Notation) -> Result<ConvertAnswer> {
        self.choose(
            &format!(
                "'{}' uses a deprecated {} namespace. Convert it?",
                name,
                notation.display_name()
            ),
            &[
                ("yes", ConvertAnswer::Yes),
                ("no", ConvertAnswer::No),
                ("cancel", ConvertAnswer::Cancel),
            ],
            ConvertAnswer::Cancel,
        )
    }

    fn export_as(&mut self, file: &FileDescriptor) -> Result<Option<PathBuf>> {
        let answer = self.read_line(&format!("Export '{}' to (empty to cancel):", file.name))?;
        Ok(answer.filter(|a| !a.is_empty()).map(PathBuf::from))
    }

    fn export_error(&mut self, err: &Error) {
        self.report(&format!("Export failed: {}", err));
    }

    fn import_error(&mut self, name: &str, message: &str) {
        self.report(&format!("Could not display '{}': {}", name, message));
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Native Dialog
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(feature = "native-dialogs")]
mod native {
    use super::*;
    use rfd::{FileDialog, MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};

    /// Extensions offered in the open and save pickers.
    const DIAGRAM_EXTENSIONS: &[&str] = &["bpmn", "dmn", "cmmn", "xml"];

    /// [`Dialog`] using native file pickers and message boxes via rfd.
    #[derive(Debug, Default)]
    pub struct NativeDialog;

    impl NativeDialog {
        pub fn new() -> Self {
            Self
        }

        fn error(title: &str, description: String) {
            MessageDialog::new()
                .set_level(MessageLevel::Error)
                .set_title(title)
                .set_description(description)
                .set_buttons(MessageButtons::Ok)
                .show();
        }

        fn ask(title: &str, description: String, buttons: MessageButtons) -> MessageDialogResult {
            MessageDialog::new()
                .set_level(MessageLevel::Warning)
                .set_title(title)
                .set_description(description)
                .set_buttons(buttons)
                .show()
        }

        fn save_dialog(title: &str, file: &FileDescriptor, extension: &str) -> Option<PathBuf> {
            let mut dialog = FileDialog::new()
                .set_title(title)
                .add_filter(extension.to_uppercase(), &[extension])
                .set_file_name(file.name.as_str());

            if let Some(dir) = file.path.as_ref().and_then(|p| p.parent()) {
                dialog = dialog.set_directory(dir);
            }

            dialog.save_file()
        }
    }

    impl Dialog for NativeDialog {
        fn open(&mut self, default_dir: Option<&Path>) -> Result<Vec<PathBuf>> {
            let mut dialog = FileDialog::new()
                .set_title("Open Diagrams")
                .add_filter("Diagram Files", DIAGRAM_EXTENSIONS)
                .add_filter("All Files", &["*"]);

            if let Some(dir) = default_dir {
                dialog = dialog.set_directory(dir);
            }

            Ok(dialog.pick_files().unwrap_or_default())
        }

        fn open_error(&mut self, path: &Path, err: &Error) {
            Self::error("Open Error", format!("{}\n\n{}", path.display(), err));
        }

        fn save_as(&mut self, file: &FileDescriptor) -> Result<Option<PathBuf>> {
            Ok(Self::save_dialog("Save Diagram", file, file.file_type.extension()))
        }

        fn save_error(&mut self, file: &FileDescriptor, err: &Error) {
            Self::error("Save Error", format!("{}\n\n{}", file.name, err));
        }

        fn saving_denied(&mut self, file: &FileDescriptor) -> Result<SavingDeniedAnswer> {
            let result = Self::ask(
                "Saving Denied",
                format!("Not allowed to write '{}'. Save to another location?", file.name),
                MessageButtons::YesNo,
            );
            Ok(match result {
                MessageDialogResult::Yes => SavingDeniedAnswer::SaveAs,
                _ => SavingDeniedAnswer::Cancel,
            })
        }

        fn close(&mut self, file: &FileDescriptor) -> Result<CloseAnswer> {
            let result = Self::ask(
                "Close Diagram",
                format!("Save changes to '{}' before closing?", file.name),
                MessageButtons::YesNoCancel,
            );
            Ok(match result {
                MessageDialogResult::Yes => CloseAnswer::Save,
                MessageDialogResult::No => CloseAnswer::Discard,
                _ => CloseAnswer::Cancel,
            })
        }

        fn content_changed(&mut self, file: &FileDescriptor) -> Result<ContentChangedAnswer> {
            let result = Self::ask(
                "File Changed",
                format!("'{}' changed on disk. Reload it?", file.name),
                MessageButtons::YesNo,
            );
            Ok(match result {
                MessageDialogResult::Yes => ContentChangedAnswer::Reload,
                _ => ContentChangedAnswer::Keep,
            })
        }

        fn unrecognized_file_error(&mut self, name: &str) {
            Self::error(
                "Unrecognized File",
                format!("'{}' is not a BPMN, DMN or CMMN file", name),
            );
        }

        fn convert_namespace(&mut self, name: &str, notation: Notation) -> Result<ConvertAnswer> {
            let result = Self::ask(
                "Deprecated Namespace",
                format!(
                    "'{}' uses a deprecated {} namespace. Convert it?",
                    name,
                    notation.display_name()
                ),
                MessageButtons::YesNoCancel,
            );
            Ok(match result {
                MessageDialogResult::Yes => ConvertAnswer::Yes,
                MessageDialogResult::No => ConvertAnswer::No,
                _ => ConvertAnswer::Cancel,
            })
        }

        fn export_as(&mut self, file: &FileDescriptor) -> Result<Option<PathBuf>> {
            let extension = file
                .path
                .as_ref()
                .and_then(|p| p.extension())
                .and_then(|e| e.to_str())
                .or_else(|| file.name.rsplit('.').next())
                .unwrap_or("svg")
                .to_string();
            Ok(Self::save_dialog("Export Diagram", file, &extension))
        }

        fn export_error(&mut self, err: &Error) {
            Self::error("Export Error", err.to_string());
        }

        fn import_error(&mut self, name: &str, message: &str) {
            Self::error("Import Error", format!("{}\n\n{}", name, message));
        }
    }
}

#[cfg(feature = "native-dialogs")]
pub use native::NativeDialog;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
