//! Scriptable collaborators shared by the unit tests.
//!
//! Every double hands out a cheap handle sharing its state, so a test can
//! give the double to the code under test and still inspect it afterwards.

use crate::editor::{
    DocumentEngine, EditorAction, EngineFactory, ImportReport, ModelingEngine, UndoState,
};
use crate::error::{Error, Result};
use crate::files::{
    CloseAnswer, ContentChangedAnswer, ConvertAnswer, Dialog, ExportType, FileDescriptor,
    FileStats, FileSystem, Notation, RawFile, SavingDeniedAnswer,
};
use crate::workspaces::{WorkspaceConfig, WorkspaceStore};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

// ─────────────────────────────────────────────────────────────────────────────
// Documents
// ─────────────────────────────────────────────────────────────────────────────

pub fn diagram_xml(notation: Notation, id: &str) -> String {
    let (prefix, uri) = match notation {
        Notation::Bpmn => ("bpmn", "http://www.omg.org/spec/BPMN/20100524/MODEL"),
        Notation::Dmn => ("dmn", "https://www.omg.org/spec/DMN/20191111/MODEL/"),
        Notation::Cmmn => ("cmmn", "http://www.omg.org/spec/CMMN/20151109/MODEL"),
    };
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<{prefix}:definitions xmlns:{prefix}="{uri}" id="{id}"/>"#
    )
}

pub fn bpmn_xml(id: &str) -> String {
    diagram_xml(Notation::Bpmn, id)
}

// ─────────────────────────────────────────────────────────────────────────────
// Modeling Engines
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct EngineScript {
    imports: usize,
    exports: usize,
    warnings: Vec<String>,
    fail_imports: bool,
    fail_exports: bool,
    export_types: Vec<ExportType>,
}

/// Counting [`ModelingEngine`] factory over [`DocumentEngine`].
#[derive(Clone, Default)]
pub struct MockEngines {
    script: Rc<RefCell<EngineScript>>,
}

impl MockEngines {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn factory(&self) -> EngineFactory {
        let script = self.script.clone();
        Rc::new(move |notation| {
            Box::new(MockEngine {
                inner: DocumentEngine::new(notation),
                script: script.clone(),
            }) as Box<dyn ModelingEngine>
        })
    }

    pub fn imports(&self) -> usize {
        self.script.borrow().imports
    }

    pub fn exports(&self) -> usize {
        self.script.borrow().exports
    }

    pub fn warn_on_import(&self, warnings: Vec<String>) {
        self.script.borrow_mut().warnings = warnings;
    }

    pub fn fail_imports(&self, fail: bool) {
        self.script.borrow_mut().fail_imports = fail;
    }

    pub fn fail_exports(&self, fail: bool) {
        self.script.borrow_mut().fail_exports = fail;
    }

    pub fn support_exports(&self, types: Vec<ExportType>) {
        self.script.borrow_mut().export_types = types;
    }
}

struct MockEngine {
    inner: DocumentEngine,
    script: Rc<RefCell<EngineScript>>,
}

impl ModelingEngine for MockEngine {
    fn import_xml(&mut self, xml: &str) -> ImportReport {
        let mut script = self.script.borrow_mut();
        script.imports += 1;
        if script.fail_imports {
            self.inner.import_xml("");
            return ImportReport::failed(xml, "unparsable diagram");
        }
        let mut report = self.inner.import_xml(xml);
        if report.is_ok() {
            report.warnings = script.warnings.clone();
        }
        report
    }

    fn save_xml(&self) -> Result<String> {
        let mut script = self.script.borrow_mut();
        script.exports += 1;
        if script.fail_exports {
            return Err(Error::Export {
                message: "serializer crashed".to_string(),
            });
        }
        self.inner.save_xml()
    }

    fn command_stack(&self) -> UndoState {
        self.inner.command_stack()
    }

    fn undo(&mut self) -> bool {
        self.inner.undo()
    }

    fn redo(&mut self) -> bool {
        self.inner.redo()
    }

    fn has_definitions(&self) -> bool {
        self.inner.has_definitions()
    }

    fn update_definitions(&mut self, xml: String) -> Result<()> {
        self.inner.update_definitions(xml)
    }

    fn execute(&mut self, action: &EditorAction) -> Result<()> {
        self.inner.execute(action)
    }

    fn export_types(&self) -> Vec<ExportType> {
        self.script.borrow().export_types.clone()
    }

    fn export_image(&self, export: ExportType) -> Result<String> {
        Ok(format!("<{}/>", export.extension()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Dialogs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct DialogScript {
    calls: Vec<String>,
    open: VecDeque<Vec<PathBuf>>,
    save_as: VecDeque<Option<PathBuf>>,
    saving_denied: VecDeque<SavingDeniedAnswer>,
    close: VecDeque<CloseAnswer>,
    content_changed: VecDeque<ContentChangedAnswer>,
    convert: VecDeque<ConvertAnswer>,
    export_as: VecDeque<Option<PathBuf>>,
}

/// [`Dialog`] answering from queues and recording every call by name.
///
/// Unscripted questions are answered with cancel.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDialog {
    script: Rc<RefCell<DialogScript>>,
}

impl ScriptedDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.script.borrow().calls.clone()
    }

    pub fn count(&self, name: &str) -> usize {
        self.script.borrow().calls.iter().filter(|c| *c == name).count()
    }

    pub fn answer_open(&self, paths: Vec<PathBuf>) {
        self.script.borrow_mut().open.push_back(paths);
    }

    pub fn answer_save_as(&self, path: Option<PathBuf>) {
        self.script.borrow_mut().save_as.push_back(path);
    }

    pub fn answer_saving_denied(&self, answer: SavingDeniedAnswer) {
        self.script.borrow_mut().saving_denied.push_back(answer);
    }

    pub fn answer_close(&self, answer: CloseAnswer) {
        self.script.borrow_mut().close.push_back(answer);
    }

    pub fn answer_content_changed(&self, answer: ContentChangedAnswer) {
        self.script.borrow_mut().content_changed.push_back(answer);
    }

    pub fn answer_convert(&self, answer: ConvertAnswer) {
        self.script.borrow_mut().convert.push_back(answer);
    }

    pub fn answer_export_as(&self, path: Option<PathBuf>) {
        self.script.borrow_mut().export_as.push_back(path);
    }

    fn record(&self, name: &str) {
        self.script.borrow_mut().calls.push(name.to_string());
    }
}

impl Dialog for ScriptedDialog {
    fn open(&mut self, _default_dir: Option<&Path>) -> Result<Vec<PathBuf>> {
        self.record("open");
        Ok(self.script.borrow_mut().open.pop_front().unwrap_or_default())
    }

    fn open_error(&mut self, _path: &Path, _err: &Error) {
        self.record("open_error");
    }

    fn save_as(&mut self, _file: &FileDescriptor) -> Result<Option<PathBuf>> {
        self.record("save_as");
        Ok(self.script.borrow_mut().save_as.pop_front().flatten())
    }

    fn save_error(&mut self, _file: &FileDescriptor, _err: &Error) {
        self.record("save_error");
    }

    fn saving_denied(&mut self, _file: &FileDescriptor) -> Result<SavingDeniedAnswer> {
        self.record("saving_denied");
        let answer = self.script.borrow_mut().saving_denied.pop_front();
        Ok(answer.unwrap_or(SavingDeniedAnswer::Cancel))
    }

    fn close(&mut self, _file: &FileDescriptor) -> Result<CloseAnswer> {
        self.record("close");
        let answer = self.script.borrow_mut().close.pop_front();
        Ok(answer.unwrap_or(CloseAnswer::Cancel))
    }

    fn content_changed(&mut self, _file: &FileDescriptor) -> Result<ContentChangedAnswer> {
        self.record("content_changed");
        let answer = self.script.borrow_mut().content_changed.pop_front();
        Ok(answer.unwrap_or(ContentChangedAnswer::Keep))
    }

    fn unrecognized_file_error(&mut self, _name: &str) {
        self.record("unrecognized_file_error");
    }

    fn convert_namespace(&mut self, _name: &str, _notation: Notation) -> Result<ConvertAnswer> {
        self.record("convert_namespace");
        let answer = self.script.borrow_mut().convert.pop_front();
        Ok(answer.unwrap_or(ConvertAnswer::Cancel))
    }

    fn export_as(&mut self, _file: &FileDescriptor) -> Result<Option<PathBuf>> {
        self.record("export_as");
        Ok(self.script.borrow_mut().export_as.pop_front().flatten())
    }

    fn export_error(&mut self, _err: &Error) {
        self.record("export_error");
    }

    fn import_error(&mut self, _name: &str, _message: &str) {
        self.record("import_error");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File System
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct Disk {
    files: HashMap<PathBuf, (String, u64)>,
    denied: HashSet<PathBuf>,
    broken: HashSet<PathBuf>,
    writes: Vec<PathBuf>,
    clock: u64,
}

/// In-memory [`FileSystem`] with a logical clock for modification stamps.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    disk: Rc<RefCell<Disk>>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a file on disk, as if written by another program.
    pub fn put(&self, path: impl Into<PathBuf>, contents: impl Into<String>) -> u64 {
        let mut disk = self.disk.borrow_mut();
        disk.clock += 100;
        let stamp = disk.clock;
        disk.files.insert(path.into(), (contents.into(), stamp));
        stamp
    }

    /// Set the modification stamp of a file without changing it.
    pub fn touch(&self, path: &Path, stamp: u64) {
        if let Some(entry) = self.disk.borrow_mut().files.get_mut(path) {
            entry.1 = stamp;
        }
    }

    pub fn contents(&self, path: &Path) -> Option<String> {
        self.disk.borrow().files.get(path).map(|(c, _)| c.clone())
    }

    pub fn remove(&self, path: &Path) {
        self.disk.borrow_mut().files.remove(path);
    }

    /// Reject writes to this path with a permission error.
    pub fn deny(&self, path: impl Into<PathBuf>) {
        self.disk.borrow_mut().denied.insert(path.into());
    }

    /// Fail writes to this path with a generic I/O error.
    pub fn break_path(&self, path: impl Into<PathBuf>) {
        self.disk.borrow_mut().broken.insert(path.into());
    }

    pub fn writes(&self) -> Vec<PathBuf> {
        self.disk.borrow().writes.clone()
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_file(&mut self, path: &Path) -> Result<RawFile> {
        let disk = self.disk.borrow();
        let (contents, stamp) = disk.files.get(path).ok_or_else(|| Error::FileRead {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        })?;
        let mut raw = RawFile::new(path.to_path_buf(), contents.clone());
        raw.last_modified = Some(*stamp);
        Ok(raw)
    }

    fn write_file(&mut self, file: &FileDescriptor) -> Result<FileDescriptor> {
        let path = file
            .path
            .clone()
            .ok_or_else(|| Error::Application("no location".to_string()))?;
        let mut disk = self.disk.borrow_mut();
        if disk.denied.contains(&path) {
            let denied = io::Error::new(io::ErrorKind::PermissionDenied, "read-only");
            return Err(Error::write_failed(path, denied));
        }
        if disk.broken.contains(&path) {
            let broken = io::Error::new(io::ErrorKind::Other, "disk full");
            return Err(Error::write_failed(path, broken));
        }
        disk.clock += 100;
        let stamp = disk.clock;
        disk.files.insert(path.clone(), (file.contents.clone(), stamp));
        disk.writes.push(path);
        Ok(file.with_last_modified(Some(stamp)))
    }

    fn read_file_stats(&mut self, file: &FileDescriptor) -> Result<FileStats> {
        let disk = self.disk.borrow();
        let last_modified = file
            .path
            .as_ref()
            .and_then(|p| disk.files.get(p))
            .map(|(_, stamp)| *stamp);
        Ok(FileStats { last_modified })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Workspace Store
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct MemoryWorkspaceStore {
    stored: Rc<RefCell<Option<WorkspaceConfig>>>,
    saves: Rc<RefCell<usize>>,
    failing: Rc<RefCell<bool>>,
}

impl MemoryWorkspaceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: WorkspaceConfig) -> Self {
        let store = Self::default();
        *store.stored.borrow_mut() = Some(config);
        store
    }

    pub fn stored(&self) -> Option<WorkspaceConfig> {
        self.stored.borrow().clone()
    }

    pub fn saves(&self) -> usize {
        *self.saves.borrow()
    }

    pub fn fail_saves(&self, fail: bool) {
        *self.failing.borrow_mut() = fail;
    }
}

impl WorkspaceStore for MemoryWorkspaceStore {
    fn save(&mut self, config: &WorkspaceConfig) -> Result<()> {
        if *self.failing.borrow() {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "workspace store is read-only",
            )));
        }
        *self.stored.borrow_mut() = Some(config.clone());
        *self.saves.borrow_mut() += 1;
        Ok(())
    }

    fn load(&mut self, default: WorkspaceConfig) -> Result<WorkspaceConfig> {
        Ok(self.stored.borrow().clone().unwrap_or(default))
    }
}
