//! File descriptors and the notations the modeler understands.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Notation
// ─────────────────────────────────────────────────────────────────────────────

/// Diagram notations supported by the modeler.
///
/// The notation of an opened file is decided by content sniffing
/// (see [`crate::files::sniff`]), never by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Notation {
    /// Business Process Model and Notation
    Bpmn,
    /// Decision Model and Notation
    Dmn,
    /// Case Management Model and Notation
    Cmmn,
}

impl Notation {
    /// Get all notations in menu order.
    pub fn all() -> &'static [Notation] {
        &[Notation::Bpmn, Notation::Dmn, Notation::Cmmn]
    }

    /// File extension used for new and saved diagrams.
    pub fn extension(&self) -> &'static str {
        match self {
            Notation::Bpmn => "bpmn",
            Notation::Dmn => "dmn",
            Notation::Cmmn => "cmmn",
        }
    }

    /// Get a display name for this notation.
    pub fn display_name(&self) -> &'static str {
        match self {
            Notation::Bpmn => "BPMN",
            Notation::Dmn => "DMN",
            Notation::Cmmn => "CMMN",
        }
    }

    /// Parse a lowercase notation key such as `"bpmn"`.
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_lowercase().as_str() {
            "bpmn" => Some(Notation::Bpmn),
            "dmn" => Some(Notation::Dmn),
            "cmmn" => Some(Notation::Cmmn),
            _ => None,
        }
    }
}

impl fmt::Display for Notation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Export Types
// ─────────────────────────────────────────────────────────────────────────────

/// Image formats a diagram editor may export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportType {
    Svg,
    Png,
    Jpeg,
}

impl ExportType {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportType::Svg => "svg",
            ExportType::Png => "png",
            ExportType::Jpeg => "jpeg",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_lowercase().as_str() {
            "svg" => Some(ExportType::Svg),
            "png" => Some(ExportType::Png),
            "jpeg" | "jpg" => Some(ExportType::Jpeg),
            _ => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Raw Files
// ─────────────────────────────────────────────────────────────────────────────

/// A file as read from disk, before its notation is known.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFile {
    pub name: String,
    pub path: PathBuf,
    pub contents: String,
    /// Modification time in milliseconds since the Unix epoch
    pub last_modified: Option<u64>,
}

impl RawFile {
    pub fn new(path: PathBuf, contents: impl Into<String>) -> Self {
        Self {
            name: file_name(&path),
            path,
            contents: contents.into(),
            last_modified: None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Descriptor
// ─────────────────────────────────────────────────────────────────────────────

/// The file a tab is bound to.
///
/// Descriptors are never mutated in place: every change produces a new
/// descriptor through one of the `with_*` methods. A descriptor without a
/// path belongs to a diagram that was never saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDescriptor {
    pub name: String,
    /// `None` for unsaved diagrams
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub contents: String,
    pub file_type: Notation,
    /// Modification time in milliseconds since the Unix epoch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<u64>,
}

impl FileDescriptor {
    /// Describe a file that lives on disk.
    pub fn new(path: PathBuf, contents: impl Into<String>, file_type: Notation) -> Self {
        Self {
            name: file_name(&path),
            path: Some(path),
            contents: contents.into(),
            file_type,
            last_modified: None,
        }
    }

    /// Describe a diagram that has never been saved.
    pub fn unsaved(name: impl Into<String>, contents: impl Into<String>, file_type: Notation) -> Self {
        Self {
            name: name.into(),
            path: None,
            contents: contents.into(),
            file_type,
            last_modified: None,
        }
    }

    /// Attach a notation to a file read from disk.
    pub fn from_raw(raw: RawFile, file_type: Notation) -> Self {
        Self {
            name: raw.name,
            path: Some(raw.path),
            contents: raw.contents,
            file_type,
            last_modified: raw.last_modified,
        }
    }

    /// Whether the file has never been written to disk.
    pub fn is_unsaved(&self) -> bool {
        self.path.is_none()
    }

    /// Whether both descriptors point at the same saved file.
    ///
    /// Unsaved descriptors never match anything.
    pub fn same_file(&self, other: &FileDescriptor) -> bool {
        match (&self.path, &other.path) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    pub fn with_contents(&self, contents: impl Into<String>) -> Self {
        Self {
            contents: contents.into(),
            ..self.clone()
        }
    }

    /// Bind to a new location; the name follows the path.
    pub fn with_path(&self, path: PathBuf) -> Self {
        Self {
            name: file_name(&path),
            path: Some(path),
            ..self.clone()
        }
    }

    pub fn with_last_modified(&self, last_modified: Option<u64>) -> Self {
        Self {
            last_modified,
            ..self.clone()
        }
    }

    /// Swap the extension of both name and path.
    ///
    /// Unsaved descriptors keep having no path.
    pub fn with_extension(&self, extension: &str) -> Self {
        Self {
            name: replace_extension(&self.name, extension),
            path: self
                .path
                .as_ref()
                .map(|p| p.with_extension(extension)),
            ..self.clone()
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("untitled")
        .to_string()
}

fn replace_extension(name: &str, extension: &str) -> String {
    match name.rfind('.') {
        Some(dot) if dot > 0 => format!("{}.{}", &name[..dot], extension),
        _ => format!("{}.{}", name, extension),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
