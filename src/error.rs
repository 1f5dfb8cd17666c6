//! Centralized error handling for the modeler
//!
//! This module provides a unified error type that covers all error scenarios
//! of the tab/editor core: user cancellation, file I/O, import and export
//! failures, contract violations, and configuration persistence.

use crate::files::{ExportType, Notation};
use crate::tabs::TabId;
use log::warn;
use std::fmt;
use std::io;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Custom Result Type Alias
// ─────────────────────────────────────────────────────────────────────────────

/// A specialized `Result` type for the application.
pub type Result<T> = std::result::Result<T, Error>;

/// The centralized error type for the application.
#[derive(Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────────────────
    // User Interaction
    // ─────────────────────────────────────────────────────────────────────────
    /// The user canceled a dialog somewhere along the operation.
    ///
    /// Not a real failure: batch operations stop silently on it.
    Canceled,

    // ─────────────────────────────────────────────────────────────────────────
    // File I/O Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Generic I/O error wrapper
    Io(io::Error),

    /// Failed to read file contents or metadata
    FileRead { path: PathBuf, source: io::Error },

    /// Failed to write file contents
    FileWrite { path: PathBuf, source: io::Error },

    /// Writing was rejected because of missing permissions
    SavingDenied { path: PathBuf },

    /// Content sniffing could not determine a supported notation
    UnrecognizedFile { name: String },

    // ─────────────────────────────────────────────────────────────────────────
    // Editor Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// The modeling engine rejected the XML
    Import { message: String },

    /// The modeling engine failed to serialize its document
    Export { message: String },

    /// The active editor cannot produce the requested export
    ExportUnsupported { editor: String, export: ExportType },

    /// The editor does not handle the requested action
    ActionUnsupported { editor: String, action: String },

    // ─────────────────────────────────────────────────────────────────────────
    // Contract Violations
    // ─────────────────────────────────────────────────────────────────────────
    /// No open tab carries this id
    UnknownTab(TabId),

    /// The tab has no editor with this id
    UnknownEditor(String),

    /// No tab provider is registered for the notation
    NoProvider(Notation),

    // ─────────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Failed to load configuration file
    ConfigLoad {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to save configuration file
    ConfigSave {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to parse configuration (invalid JSON/format)
    ConfigParse {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration directory not found or inaccessible
    ConfigDirNotFound,

    // ─────────────────────────────────────────────────────────────────────────
    // Application Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Generic application error with a message
    Application(String),
}

impl Error {
    /// Whether this error is the user canceling an interaction.
    pub fn is_canceled(&self) -> bool {
        matches!(self, Error::Canceled)
    }

    /// Wrap a write failure, singling out permission problems.
    pub fn write_failed(path: PathBuf, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::PermissionDenied {
            Error::SavingDenied { path }
        } else {
            Error::FileWrite { path, source }
        }
    }
}

// Implement From traits for convenient error conversion
impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ConfigParse {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Display trait implementation for user-friendly error messages
// ─────────────────────────────────────────────────────────────────────────────
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Canceled => write!(f, "Canceled by user"),

            // File I/O Errors
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::FileRead { path, source } => {
                write!(f, "Failed to read '{}': {}", path.display(), source)
            }
            Error::FileWrite { path, source } => {
                write!(f, "Failed to write '{}': {}", path.display(), source)
            }
            Error::SavingDenied { path } => {
                write!(f, "Not allowed to write '{}'", path.display())
            }
            Error::UnrecognizedFile { name } => {
                write!(f, "'{}' is not a BPMN, DMN or CMMN file", name)
            }

            // Editor Errors
            Error::Import { message } => write!(f, "Failed to import: {}", message),
            Error::Export { message } => write!(f, "Failed to export: {}", message),
            Error::ExportUnsupported { editor, export } => {
                write!(f, "Editor '{}' cannot export as {}", editor, export.extension())
            }
            Error::ActionUnsupported { editor, action } => {
                write!(f, "Editor '{}' does not support action '{}'", editor, action)
            }

            // Contract Violations
            Error::UnknownTab(id) => write!(f, "No open tab with id {}", id),
            Error::UnknownEditor(id) => write!(f, "No editor with id '{}'", id),
            Error::NoProvider(notation) => {
                write!(f, "No tab provider for {}", notation.display_name())
            }

            // Configuration Errors
            Error::ConfigLoad { path, source } => {
                write!(
                    f,
                    "Failed to load configuration from '{}': {}",
                    path.display(),
                    source
                )
            }
            Error::ConfigSave { path, source } => {
                write!(
                    f,
                    "Failed to save configuration to '{}': {}",
                    path.display(),
                    source
                )
            }
            Error::ConfigParse { message, .. } => {
                write!(f, "Invalid configuration format: {}", message)
            }
            Error::ConfigDirNotFound => {
                write!(f, "Configuration directory not found")
            }

            // Application Errors
            Error::Application(msg) => write!(f, "{}", msg),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// std::error::Error trait implementation for error chaining
// ─────────────────────────────────────────────────────────────────────────────
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::FileRead { source, .. } | Error::FileWrite { source, .. } => Some(source),
            Error::ConfigLoad { source, .. } => Some(source.as_ref()),
            Error::ConfigSave { source, .. } => Some(source.as_ref()),
            Error::ConfigParse { source, .. } => source
                .as_ref()
                .map(|s| s.as_ref() as &(dyn std::error::Error + 'static)),
            _ => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Graceful Degradation Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Extension trait for Result to support graceful degradation.
pub trait ResultExt<T> {
    /// If the result is an error, log it at warning level and return the provided default.
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T;
}

impl<T> ResultExt<T> for Result<T> {
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                warn!("{}: {}. Using default.", context, err);
                default
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
