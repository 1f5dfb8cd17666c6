use super::*;
use crate::editor::{DiagramEditor, Editor, EditorAction, ImportReport, UndoState, XmlEditor};
use crate::files::{
    CloseAnswer, ContentChangedAnswer, ConvertAnswer, ExportType, FileDescriptor, Notation, RawFile,
    SavingDeniedAnswer,
};
use crate::tabs::{DiagramTabProvider, MultiEditorTab, TabProvider};
use crate::test_support::{
    bpmn_xml, MemoryFileSystem, MemoryWorkspaceStore, MockEngines, ScriptedDialog,
};
use crate::workspaces::{LayoutUpdate, LogLayout, WorkspaceConfig};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

struct Harness {
    app: App,
    dialog: ScriptedDialog,
    fs: MemoryFileSystem,
    store: MemoryWorkspaceStore,
    engines: MockEngines,
}

fn harness() -> Harness {
    harness_with(Settings::default(), MemoryWorkspaceStore::new(), MockEngines::new())
}

fn harness_with(settings: Settings, store: MemoryWorkspaceStore, engines: MockEngines) -> Harness {
    let dialog = ScriptedDialog::new();
    let fs = MemoryFileSystem::new();
    let app = App::new(
        settings,
        Collaborators {
            dialog: Box::new(dialog.clone()),
            file_system: Box::new(fs.clone()),
            workspace: Box::new(store.clone()),
        },
        DiagramTabProvider::all(engines.factory()),
    );
    Harness {
        app,
        dialog,
        fs,
        store,
        engines,
    }
}

impl Harness {
    fn read(&self, path: &str) -> RawFile {
        self.fs.clone().read_file(Path::new(path)).unwrap()
    }

    /// Put a BPMN file on disk and open it.
    fn open(&mut self, path: &str, id: &str) -> TabId {
        self.fs.put(path, bpmn_xml(id));
        let raw = self.read(path);
        self.app.open_files(vec![raw]).unwrap().unwrap()
    }

    fn tab(&self, id: TabId) -> &MultiEditorTab {
        self.app.tab(id).unwrap()
    }

    fn disk(&self, path: &str) -> Option<String> {
        self.fs.contents(Path::new(path))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Opening
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_open_selects_last_file() {
    let mut h = harness();
    let a = h.open("/d/a.bpmn", "a");
    let b = h.open("/d/b.bpmn", "b");

    assert_eq!(h.app.tabs().len(), 2);
    assert_eq!(h.app.active_tab_id(), Some(b));
    assert_ne!(a, b);
    assert!(!h.tab(a).is_dirty());

    let events = h.app.take_events();
    assert!(events.contains(&AppEvent::TabSelected(b)));
    assert!(events.contains(&AppEvent::WorkspaceChanged));
    assert_eq!(h.app.settings().recent_files[0], PathBuf::from("/d/b.bpmn"));
}

#[test]
fn test_open_same_file_twice_reuses_tab() {
    let mut h = harness();
    h.fs.put("/d/a.bpmn", bpmn_xml("a"));
    let first = h.read("/d/a.bpmn");
    let second = h.read("/d/a.bpmn");

    let id = h.app.open_files(vec![first, second]).unwrap();
    assert_eq!(h.app.tabs().len(), 1);
    assert_eq!(h.app.active_tab_id(), id);

    let again = h.read("/d/a.bpmn");
    assert_eq!(h.app.open_files(vec![again]).unwrap(), id);
    assert_eq!(h.app.tabs().len(), 1);
}

#[test]
fn test_unrecognized_file_is_skipped() {
    let mut h = harness();
    h.fs.put("/d/notes.txt", "just some text");
    h.fs.put("/d/a.bpmn", bpmn_xml("a"));
    let files = vec![h.read("/d/notes.txt"), h.read("/d/a.bpmn")];

    let id = h.app.open_files(files).unwrap();
    assert!(id.is_some());
    assert_eq!(h.app.tabs().len(), 1);
    assert_eq!(h.dialog.count("unrecognized_file_error"), 1);
    assert!(h.app.logger().is_empty());
}

#[test]
fn test_deprecated_namespace_conversion() {
    let activiti = r#"<?xml version="1.0" encoding="UTF-8"?>
<bpmn:definitions xmlns:bpmn="http://www.omg.org/spec/BPMN/20100524/MODEL" xmlns:activiti="http://activiti.org/bpmn" id="old">
  <bpmn:process id="p" activiti:async="true"/>
</bpmn:definitions>"#;

    let mut h = harness();
    h.fs.put("/d/old.bpmn", activiti);
    h.dialog.answer_convert(ConvertAnswer::Yes);
    let raw = h.read("/d/old.bpmn");
    let id = h.app.open_files(vec![raw]).unwrap().unwrap();

    let contents = &h.tab(id).file().contents;
    assert!(contents.contains("http://camunda.org/schema/1.0/bpmn"));
    assert!(contents.contains("camunda:async"));
    assert!(!contents.contains("activiti"));
}

#[test]
fn test_canceled_conversion_opens_nothing() {
    let activiti = r#"<bpmn:definitions xmlns:bpmn="http://www.omg.org/spec/BPMN/20100524/MODEL" xmlns:activiti="http://activiti.org/bpmn" id="old"/>"#;

    let mut h = harness();
    h.fs.put("/d/old.bpmn", activiti);
    let raw = h.read("/d/old.bpmn");
    let result = h.app.open_files(vec![raw]).unwrap();

    assert_eq!(result, None);
    assert!(h.app.tabs().is_empty());
    assert_eq!(h.dialog.count("convert_namespace"), 1);
    assert!(h.app.logger().is_empty());
}

#[test]
fn test_open_dialog_reports_unreadable_files() {
    let mut h = harness();
    h.fs.put("/d/a.bpmn", bpmn_xml("a"));
    h.dialog
        .answer_open(vec![PathBuf::from("/d/a.bpmn"), PathBuf::from("/d/gone.bpmn")]);

    let id = h.app.trigger_action("open-diagram", &Value::Null);
    assert!(id.is_ok());
    assert_eq!(h.app.tabs().len(), 1);
    assert_eq!(h.dialog.count("open_error"), 1);
    assert_eq!(h.app.logger().len(), 1);
}

#[test]
fn test_create_diagrams_of_each_notation() {
    let mut h = harness();
    h.app.trigger_action("create-bpmn-diagram", &Value::Null).unwrap();
    h.app.trigger_action("create-dmn-diagram", &Value::Null).unwrap();
    h.app.trigger_action("create-cmmn-diagram", &Value::Null).unwrap();

    let types: Vec<_> = h.app.tabs().iter().map(|t| t.file().file_type).collect();
    assert_eq!(types, vec![Notation::Bpmn, Notation::Dmn, Notation::Cmmn]);
    assert!(h.app.tabs().iter().all(|t| t.file().is_unsaved()));
    assert!(h.app.tabs().iter().all(|t| t.is_dirty()));
}

#[test]
fn test_create_diagram_uses_default_notation() {
    let settings = Settings {
        default_notation: Notation::Dmn,
        ..Settings::default()
    };
    let mut h = harness_with(settings, MemoryWorkspaceStore::new(), MockEngines::new());
    h.app.trigger_action("create-diagram", &Value::Null).unwrap();

    assert_eq!(h.app.tabs().len(), 1);
    assert_eq!(h.tab(h.app.active_tab_id().unwrap()).file().file_type, Notation::Dmn);
}

// ─────────────────────────────────────────────────────────────────────────────
// Editing and Editor Switching
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_switching_tabs_does_not_reimport() {
    let mut h = harness();
    let a = h.open("/d/a.bpmn", "a");
    let b = h.open("/d/b.bpmn", "b");
    assert_eq!(h.engines.imports(), 2);

    h.app.select_tab(a).unwrap();
    h.app.select_tab(b).unwrap();
    h.app.select_tab(a).unwrap();
    assert_eq!(h.engines.imports(), 2);
}

#[test]
fn test_undo_to_baseline_clears_dirty() {
    let mut h = harness();
    let a = h.open("/d/a.bpmn", "a");
    assert!(h.app.menu().undo.disabled);

    h.app.apply_change(bpmn_xml("b")).unwrap();
    assert!(h.tab(a).is_dirty());
    assert!(!h.app.menu().undo.disabled);

    h.app.trigger_action("undo", &Value::Null).unwrap();
    assert!(!h.tab(a).is_dirty());
    assert!(h.app.menu().undo.disabled);
    assert!(!h.app.menu().redo.disabled);
}

#[test]
fn test_unsaved_edits_survive_editor_switch() {
    let mut h = harness();
    let a = h.open("/d/a.bpmn", "a");
    h.app.apply_change(bpmn_xml("b")).unwrap();

    h.app.trigger_action("show-editor", &json!({ "editor": "xml" })).unwrap();
    let tab = h.tab(a);
    assert_eq!(tab.active_editor().id(), "xml");
    assert_eq!(tab.active_editor().last_xml(), Some(bpmn_xml("b").as_str()));
    assert!(tab.is_dirty());

    h.app.trigger_action("save", &Value::Null).unwrap();
    assert_eq!(h.disk("/d/a.bpmn"), Some(bpmn_xml("b")));
    assert!(!h.tab(a).is_dirty());
}

#[test]
fn test_failed_import_keeps_previous_editor() {
    let mut h = harness();
    let a = h.open("/d/a.bpmn", "a");
    h.app.show_editor("xml").unwrap();
    h.app.apply_change(bpmn_xml("c")).unwrap();

    h.engines.fail_imports(true);
    let result = h.app.show_editor("diagram");
    assert!(matches!(result, Err(Error::Import { .. })));

    let tab = h.tab(a);
    assert_eq!(tab.active_editor().id(), "xml");
    assert_eq!(tab.active_editor().last_xml(), Some(bpmn_xml("c").as_str()));
    assert!(tab.is_dirty());
    assert_eq!(h.dialog.count("import_error"), 1);
}

#[test]
fn test_menu_follows_active_editor() {
    let mut h = harness();
    assert!(h.app.menu().save.disabled);
    assert_eq!(h.app.menu().toolbar, None);

    h.app.create_diagram(Notation::Bpmn).unwrap();
    assert!(!h.app.menu().save.disabled);
    assert!(!h.app.menu().align.disabled);
    assert_eq!(h.app.menu().toolbar, Some(Notation::Bpmn));
    assert!(h
        .app
        .take_events()
        .iter()
        .any(|e| matches!(e, AppEvent::ToolsStateChanged(_))));

    h.app.show_editor("xml").unwrap();
    assert_eq!(h.app.menu().toolbar, None);
    assert!(!h.app.menu().find.disabled);
    assert!(h.app.menu().zoom.disabled);
}

#[test]
fn test_editor_actions_reach_active_editor() {
    let mut h = harness();
    h.open("/d/a.bpmn", "a");
    h.app.trigger_action("zoomIn", &Value::Null).unwrap();

    let result = h.app.trigger_action("fly", &Value::Null);
    assert!(matches!(
        result,
        Err(Error::ActionUnsupported { ref editor, .. }) if editor == "app"
    ));
}

#[test]
fn test_editor_actions_without_tab_do_nothing() {
    let mut h = harness();
    assert!(h.app.trigger_action("undo", &Value::Null).is_ok());
}

// ─────────────────────────────────────────────────────────────────────────────
// External Changes
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_keep_adopts_new_stamp_without_asking_again() {
    let mut h = harness();
    let a = h.open("/d/a.bpmn", "a");
    let b = h.open("/d/b.bpmn", "b");
    let first = h.tab(a).file().last_modified;

    let stamp = h.fs.put("/d/a.bpmn", bpmn_xml("external"));
    assert!(Some(stamp) > first);
    h.dialog.answer_content_changed(ContentChangedAnswer::Keep);

    h.app.select_tab(a).unwrap();
    assert_eq!(h.dialog.count("content_changed"), 1);
    assert_eq!(h.tab(a).file().last_modified, Some(stamp));
    assert_eq!(h.tab(a).file().contents, bpmn_xml("a"));

    h.app.select_tab(b).unwrap();
    h.app.select_tab(a).unwrap();
    assert_eq!(h.dialog.count("content_changed"), 1);
}

#[test]
fn test_reload_replaces_contents() {
    let mut h = harness();
    let a = h.open("/d/a.bpmn", "a");
    h.open("/d/b.bpmn", "b");

    h.fs.put("/d/a.bpmn", bpmn_xml("external"));
    h.dialog.answer_content_changed(ContentChangedAnswer::Reload);
    h.app.select_tab(a).unwrap();

    let tab = h.tab(a);
    assert_eq!(tab.file().contents, bpmn_xml("external"));
    assert_eq!(
        tab.active_editor().last_xml(),
        Some(bpmn_xml("external").as_str())
    );
    assert!(!tab.is_dirty());
}

#[test]
fn test_reload_of_unchanged_disk_contents_drops_edits() {
    let mut h = harness();
    let a = h.open("/d/a.bpmn", "a");
    h.app.apply_change(bpmn_xml("b")).unwrap();
    assert!(h.tab(a).is_dirty());

    let first = h.tab(a).file().last_modified;
    let stamp = h.fs.put("/d/a.bpmn", bpmn_xml("a"));
    assert!(Some(stamp) > first);
    h.dialog.answer_content_changed(ContentChangedAnswer::Reload);
    h.app.select_tab(a).unwrap();

    assert!(!h.tab(a).is_dirty());
    assert_eq!(h.tab(a).file().last_modified, Some(stamp));
    let saved = h.app.save_active_tab(false).unwrap().unwrap();
    assert_eq!(saved.contents, bpmn_xml("a"));
}

#[test]
fn test_vanished_file_is_not_a_change() {
    let mut h = harness();
    let a = h.open("/d/a.bpmn", "a");
    h.open("/d/b.bpmn", "b");

    h.fs.remove(Path::new("/d/a.bpmn"));
    h.app.select_tab(a).unwrap();
    assert_eq!(h.dialog.count("content_changed"), 0);
}

// ─────────────────────────────────────────────────────────────────────────────
// Saving
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_save_new_diagram_asks_for_location() {
    let mut h = harness();
    let id = h.app.create_diagram(Notation::Bpmn).unwrap();
    h.dialog.answer_save_as(Some(PathBuf::from("/d/new.bpmn")));

    let saved = h.app.save_active_tab(false).unwrap().unwrap();
    assert_eq!(saved.path, Some(PathBuf::from("/d/new.bpmn")));
    assert_eq!(saved.name, "new.bpmn");

    let tab = h.tab(id);
    assert!(!tab.is_dirty());
    assert_eq!(tab.file().path, Some(PathBuf::from("/d/new.bpmn")));
    assert!(h.disk("/d/new.bpmn").is_some());
    assert_eq!(h.app.settings().recent_files[0], PathBuf::from("/d/new.bpmn"));
    assert!(h.app.take_settings_changes().is_some());
    assert!(h.app.take_settings_changes().is_none());
}

#[test]
fn test_canceled_save_as_keeps_tab_dirty() {
    let mut h = harness();
    let id = h.app.create_diagram(Notation::Dmn).unwrap();

    let result = h.app.trigger_action("save", &Value::Null);
    assert!(matches!(result, Err(Error::Canceled)));
    assert!(h.tab(id).is_dirty());
    assert!(h.fs.writes().is_empty());
}

#[test]
fn test_saving_denied_offers_save_as() {
    let mut h = harness();
    let a = h.open("/d/a.bpmn", "a");
    h.fs.deny("/d/a.bpmn");
    h.app.apply_change(bpmn_xml("b")).unwrap();

    h.dialog.answer_saving_denied(SavingDeniedAnswer::SaveAs);
    h.dialog.answer_save_as(Some(PathBuf::from("/e/a.bpmn")));
    h.app.trigger_action("save", &Value::Null).unwrap();

    assert_eq!(h.dialog.calls(), vec!["saving_denied", "save_as"]);
    assert_eq!(h.disk("/e/a.bpmn"), Some(bpmn_xml("b")));
    assert_eq!(h.disk("/d/a.bpmn"), Some(bpmn_xml("a")));
    assert_eq!(h.tab(a).file().path, Some(PathBuf::from("/e/a.bpmn")));
    assert!(!h.tab(a).is_dirty());
}

#[test]
fn test_saving_denied_cancel_fails() {
    let mut h = harness();
    let a = h.open("/d/a.bpmn", "a");
    h.fs.deny("/d/a.bpmn");
    h.app.apply_change(bpmn_xml("b")).unwrap();

    let result = h.app.save_active_tab(false);
    assert!(matches!(result, Err(Error::SavingDenied { .. })));
    assert!(h.tab(a).is_dirty());
}

#[test]
fn test_write_failure_is_reported() {
    let mut h = harness();
    let a = h.open("/d/a.bpmn", "a");
    h.fs.break_path("/d/a.bpmn");
    h.app.apply_change(bpmn_xml("b")).unwrap();

    let result = h.app.save_active_tab(false);
    assert!(matches!(result, Err(Error::FileWrite { .. })));
    assert_eq!(h.dialog.count("save_error"), 1);
    assert!(h.tab(a).is_dirty());
}

#[test]
fn test_failed_serialization_never_writes() {
    let mut h = harness();
    let a = h.open("/d/a.bpmn", "a");
    h.app.apply_change(bpmn_xml("b")).unwrap();
    h.engines.fail_exports(true);

    let result = h.app.save_active_tab(false);
    assert!(matches!(result, Err(Error::Export { .. })));
    assert_eq!(h.dialog.count("save_error"), 1);
    assert!(h.fs.writes().is_empty());
    assert!(h.tab(a).is_dirty());
}

#[test]
fn test_save_all_stops_at_cancel() {
    let mut h = harness();
    let a = h.open("/d/a.bpmn", "a");
    h.app.apply_change(bpmn_xml("a2")).unwrap();
    let b = h.app.create_diagram(Notation::Bpmn).unwrap();
    let c = h.open("/d/c.bpmn", "c");
    h.app.apply_change(bpmn_xml("c2")).unwrap();
    h.app.take_events();

    h.dialog.answer_save_as(None);
    let result = h.app.trigger_action("save-all", &Value::Null);

    assert!(matches!(result, Err(Error::Canceled)));
    assert_eq!(h.fs.writes(), vec![PathBuf::from("/d/a.bpmn")]);
    assert!(!h.tab(a).is_dirty());
    assert!(h.tab(b).is_dirty());
    assert!(h.tab(c).is_dirty());
    assert_eq!(h.app.active_tab_id(), Some(c));
    assert!(h.app.logger().is_empty());
}

#[test]
fn test_save_all_skips_clean_tabs() {
    let mut h = harness();
    h.open("/d/a.bpmn", "a");
    h.open("/d/b.bpmn", "b");
    h.app.apply_change(bpmn_xml("b2")).unwrap();

    h.app.save_all_tabs().unwrap();
    assert_eq!(h.fs.writes(), vec![PathBuf::from("/d/b.bpmn")]);
}

#[test]
fn test_export_writes_image() {
    let engines = MockEngines::new();
    engines.support_exports(vec![ExportType::Svg, ExportType::Png]);
    let mut h = harness_with(Settings::default(), MemoryWorkspaceStore::new(), engines);
    h.open("/d/a.bpmn", "a");
    assert_eq!(h.app.menu().export_as.choices, vec!["svg", "png"]);

    h.dialog.answer_export_as(Some(PathBuf::from("/d/out.png")));
    let exported = h.app.export_tab().unwrap().unwrap();
    assert_eq!(exported.name, "out.png");
    assert_eq!(h.disk("/d/out.png"), Some("<png/>".to_string()));
}

#[test]
fn test_export_without_formats_fails() {
    let mut h = harness();
    h.open("/d/a.bpmn", "a");

    let result = h.app.trigger_action("export-tab", &Value::Null);
    assert!(matches!(result, Err(Error::ExportUnsupported { .. })));
    assert_eq!(h.dialog.count("export_error"), 1);
    assert_eq!(h.dialog.count("export_as"), 0);
}

// ─────────────────────────────────────────────────────────────────────────────
// Closing
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_close_clean_tab_without_asking() {
    let mut h = harness();
    let a = h.open("/d/a.bpmn", "a");
    h.app.take_events();

    h.app.close_tab(a).unwrap();
    assert!(h.app.tabs().is_empty());
    assert_eq!(h.app.active_tab_id(), None);
    assert!(h.dialog.calls().is_empty());
    assert!(h.app.menu().save.disabled);
    assert!(h.app.take_events().contains(&AppEvent::TabClosed(a)));
}

#[test]
fn test_closing_active_tab_selects_neighbour() {
    let mut h = harness();
    let a = h.open("/d/a.bpmn", "a");
    let b = h.open("/d/b.bpmn", "b");
    let c = h.open("/d/c.bpmn", "c");

    h.app.select_tab(b).unwrap();
    h.app.close_tab(b).unwrap();
    assert_eq!(h.app.active_tab_id(), Some(c));

    h.app.close_tab(c).unwrap();
    assert_eq!(h.app.active_tab_id(), Some(a));
}

/// XML view that keeps its tab open.
struct PinnedEditor(XmlEditor);

impl Editor for PinnedEditor {
    fn name(&self) -> &str {
        "pinned"
    }

    fn import_xml(&mut self, xml: &str) -> ImportReport {
        self.0.import_xml(xml)
    }

    fn export_xml(&mut self) -> crate::error::Result<String> {
        self.0.export_xml()
    }

    fn undo_state(&self) -> UndoState {
        self.0.undo_state()
    }

    fn undo(&mut self) -> bool {
        self.0.undo()
    }

    fn redo(&mut self) -> bool {
        self.0.redo()
    }

    fn has_imported(&self) -> bool {
        self.0.has_imported()
    }

    fn apply_change(&mut self, xml: String) -> crate::error::Result<()> {
        self.0.apply_change(xml)
    }

    fn trigger_editor_action(&mut self, action: &EditorAction) -> crate::error::Result<()> {
        self.0.trigger_editor_action(action)
    }

    fn closable(&self) -> Option<bool> {
        Some(false)
    }
}

struct PinnedProvider;

impl TabProvider for PinnedProvider {
    fn notation(&self) -> Notation {
        Notation::Bpmn
    }

    fn create_new_file(&mut self) -> FileDescriptor {
        FileDescriptor::unsaved("pinned.bpmn", bpmn_xml("pinned"), Notation::Bpmn)
    }

    fn create_tab(&self, id: TabId, file: FileDescriptor) -> crate::error::Result<MultiEditorTab> {
        let editor = DiagramEditor::new("xml", Box::new(PinnedEditor(XmlEditor::new())));
        MultiEditorTab::new(id, file, vec![editor])
    }
}

#[test]
fn test_unclosable_tab_stays_open() {
    let dialog = ScriptedDialog::new();
    let fs = MemoryFileSystem::new();
    let mut app = App::new(
        Settings::default(),
        Collaborators {
            dialog: Box::new(dialog.clone()),
            file_system: Box::new(fs.clone()),
            workspace: Box::new(MemoryWorkspaceStore::new()),
        },
        vec![Box::new(PinnedProvider)],
    );
    fs.put("/d/a.bpmn", bpmn_xml("a"));
    let raw = fs.clone().read_file(Path::new("/d/a.bpmn")).unwrap();
    let id = app.open_files(vec![raw]).unwrap().unwrap();

    assert!(!app.tab(id).unwrap().is_closable());
    assert!(app.menu().close.disabled);

    app.close_tab(id).unwrap();
    app.trigger_action("close-all-tabs", &Value::Null).unwrap();
    assert_eq!(app.tabs().len(), 1);
    assert!(dialog.calls().is_empty());
}

#[test]
fn test_close_dirty_tab_answers() {
    let mut h = harness();
    let a = h.open("/d/a.bpmn", "a");
    h.app.apply_change(bpmn_xml("b")).unwrap();

    // Cancel keeps the tab
    let result = h.app.close_active_tab();
    assert!(matches!(result, Err(Error::Canceled)));
    assert_eq!(h.app.tabs().len(), 1);

    // Save writes before closing
    h.dialog.answer_close(CloseAnswer::Save);
    h.app.close_tab(a).unwrap();
    assert!(h.app.tabs().is_empty());
    assert_eq!(h.disk("/d/a.bpmn"), Some(bpmn_xml("b")));
}

#[test]
fn test_close_discard_leaves_disk_alone() {
    let mut h = harness();
    let a = h.open("/d/a.bpmn", "a");
    h.app.apply_change(bpmn_xml("b")).unwrap();

    h.dialog.answer_close(CloseAnswer::Discard);
    h.app.close_tab(a).unwrap();
    assert!(h.app.tabs().is_empty());
    assert_eq!(h.disk("/d/a.bpmn"), Some(bpmn_xml("a")));
}

#[test]
fn test_history_only_keeps_saved_files() {
    let mut h = harness();
    let a = h.open("/d/a.bpmn", "a");
    let new = h.app.create_diagram(Notation::Bpmn).unwrap();

    h.app.close_tab(a).unwrap();
    h.dialog.answer_close(CloseAnswer::Discard);
    h.app.close_tab(new).unwrap();

    let history: Vec<_> = h.app.file_history().iter().map(|f| f.name.clone()).collect();
    assert_eq!(history, vec!["a.bpmn"]);
}

#[test]
fn test_reopen_last_tab() {
    let mut h = harness();
    let a = h.open("/d/a.bpmn", "a");
    h.app.close_tab(a).unwrap();
    h.fs.put("/d/a.bpmn", bpmn_xml("newer"));

    h.app.trigger_action("reopen-last-tab", &Value::Null).unwrap();
    assert_eq!(h.app.tabs().len(), 1);
    assert_eq!(h.app.active_tab().unwrap().file().contents, bpmn_xml("newer"));
    assert!(h.app.file_history().is_empty());

    assert_eq!(h.app.reopen_last_tab().unwrap(), None);
}

#[test]
fn test_history_is_bounded() {
    let settings = Settings {
        max_file_history: 2,
        ..Settings::default()
    };
    let mut h = harness_with(settings, MemoryWorkspaceStore::new(), MockEngines::new());
    for name in ["a", "b", "c"] {
        let id = h.open(&format!("/d/{}.bpmn", name), name);
        h.app.close_tab(id).unwrap();
    }

    let history: Vec<_> = h.app.file_history().iter().map(|f| f.name.clone()).collect();
    assert_eq!(history, vec!["b.bpmn", "c.bpmn"]);
}

#[test]
fn test_close_all_stops_at_cancel_and_restores_active() {
    let mut h = harness();
    h.open("/d/a.bpmn", "a");
    let b = h.open("/d/b.bpmn", "b");
    h.app.apply_change(bpmn_xml("b2")).unwrap();
    let c = h.open("/d/c.bpmn", "c");

    let result = h.app.trigger_action("close-all-tabs", &Value::Null);
    assert!(matches!(result, Err(Error::Canceled)));

    let open: Vec<_> = h.app.tabs().iter().map(|t| t.id()).collect();
    assert_eq!(open, vec![b, c]);
    assert_eq!(h.app.active_tab_id(), Some(c));
}

#[test]
fn test_close_other_tabs() {
    let mut h = harness();
    h.open("/d/a.bpmn", "a");
    let b = h.open("/d/b.bpmn", "b");
    h.open("/d/c.bpmn", "c");

    h.app.trigger_action("close-other-tabs", &json!({ "tab": b })).unwrap();
    assert_eq!(h.app.tabs().len(), 1);
    assert_eq!(h.app.active_tab_id(), Some(b));
}

// ─────────────────────────────────────────────────────────────────────────────
// Quitting
// ─────────────────────────────────────────────────────────────────────────────

fn four_tabs(h: &mut Harness) {
    h.open("/d/a.bpmn", "a");
    h.open("/d/b.bpmn", "b");
    h.app.apply_change(bpmn_xml("b2")).unwrap();
    h.open("/d/c.bpmn", "c");
    h.open("/d/d.bpmn", "d");
    h.app.apply_change(bpmn_xml("d2")).unwrap();
    h.app.take_events();
}

#[test]
fn test_quit_saves_dirty_tabs() {
    let mut h = harness();
    four_tabs(&mut h);
    h.dialog.answer_close(CloseAnswer::Save);
    h.dialog.answer_close(CloseAnswer::Save);

    h.app.trigger_action("quit", &Value::Null).unwrap();
    assert!(h.app.tabs().is_empty());
    assert_eq!(h.dialog.count("close"), 2);
    assert_eq!(h.disk("/d/b.bpmn"), Some(bpmn_xml("b2")));
    assert_eq!(h.disk("/d/d.bpmn"), Some(bpmn_xml("d2")));

    let events = h.app.take_events();
    assert_eq!(events.last(), Some(&AppEvent::Quitting));
    assert!(events.contains(&AppEvent::WorkspacePersisted));
    assert_eq!(h.store.stored().unwrap().tabs.len(), 4);
}

#[test]
fn test_quit_aborts_on_cancel() {
    let mut h = harness();
    four_tabs(&mut h);
    h.dialog.answer_close(CloseAnswer::Save);
    h.dialog.answer_close(CloseAnswer::Cancel);

    let result = h.app.quit();
    assert!(matches!(result, Err(Error::Canceled)));
    assert_eq!(h.app.tabs().len(), 4);

    let events = h.app.take_events();
    assert!(events.contains(&AppEvent::QuitAborted));
    assert!(!events.contains(&AppEvent::Quitting));
}

#[test]
fn test_quit_aborts_when_workspace_cannot_be_stored() {
    let mut h = harness();
    four_tabs(&mut h);
    h.store.fail_saves(true);
    h.dialog.answer_close(CloseAnswer::Discard);
    h.dialog.answer_close(CloseAnswer::Discard);

    assert!(matches!(h.app.quit(), Err(Error::Io(_))));
    assert_eq!(h.app.tabs().len(), 4);

    let events = h.app.take_events();
    assert!(events.contains(&AppEvent::QuitAborted));
    assert!(!events.contains(&AppEvent::Quitting));
    assert_eq!(h.app.logger().len(), 1);
}

// ─────────────────────────────────────────────────────────────────────────────
// Navigation
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_select_tab_cycles() {
    let mut h = harness();
    let a = h.open("/d/a.bpmn", "a");
    let b = h.open("/d/b.bpmn", "b");
    let c = h.open("/d/c.bpmn", "c");

    h.app.trigger_action("select-tab", &json!("next")).unwrap();
    assert_eq!(h.app.active_tab_id(), Some(a));
    h.app.trigger_action("select-tab", &json!("previous")).unwrap();
    assert_eq!(h.app.active_tab_id(), Some(c));
    h.app.trigger_action("select-tab", &json!(1)).unwrap();
    assert_eq!(h.app.active_tab_id(), Some(b));
    h.app.trigger_action("select-tab", &json!(99)).unwrap();
    assert_eq!(h.app.active_tab_id(), Some(c));

    assert!(h.app.trigger_action("select-tab", &json!("up")).is_err());
}

#[test]
fn test_select_unknown_tab_fails() {
    let mut h = harness();
    assert!(matches!(h.app.select_tab(42), Err(Error::UnknownTab(42))));
}

// ─────────────────────────────────────────────────────────────────────────────
// Workspace
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_workspace_persists_saved_files_only() {
    let mut h = harness();
    let a = h.open("/d/a.bpmn", "a");
    h.app.create_diagram(Notation::Bpmn).unwrap();

    let stored = h.store.stored().unwrap();
    assert_eq!(stored.tabs.len(), 1);
    assert_eq!(stored.tabs[0].path, Some(PathBuf::from("/d/a.bpmn")));
    assert!(stored.tabs[0].contents.is_empty());
    assert_eq!(stored.active_tab, None);

    h.app.select_tab(a).unwrap();
    assert_eq!(h.store.stored().unwrap().active_tab, Some(0));
}

#[test]
fn test_restore_skips_missing_files() {
    let stored = |path: &str| {
        crate::files::FileDescriptor::new(PathBuf::from(path), "", Notation::Bpmn)
    };
    let config = WorkspaceConfig {
        tabs: vec![stored("/d/a.bpmn"), stored("/d/gone.bpmn"), stored("/d/c.bpmn")],
        active_tab: Some(1),
        layout: Layout::default().with_log_toggled(),
    };
    let mut h = harness_with(
        Settings::default(),
        MemoryWorkspaceStore::with_config(config),
        MockEngines::new(),
    );
    h.fs.put("/d/a.bpmn", bpmn_xml("a"));
    h.fs.put("/d/c.bpmn", bpmn_xml("c"));

    h.app.restore_workspace().unwrap();
    let names: Vec<_> = h.app.tabs().iter().map(|t| t.file().name.clone()).collect();
    assert_eq!(names, vec!["a.bpmn", "c.bpmn"]);
    assert_eq!(h.app.active_tab().unwrap().file().name, "c.bpmn");
    assert_eq!(h.app.active_tab().unwrap().file().contents, bpmn_xml("c"));
    assert!(h.app.layout().log.open);
    assert_eq!(h.app.logger().len(), 1);
}

#[test]
fn test_restore_disabled_keeps_layout_only() {
    let config = WorkspaceConfig {
        tabs: vec![crate::files::FileDescriptor::new(
            PathBuf::from("/d/a.bpmn"),
            "",
            Notation::Bpmn,
        )],
        active_tab: Some(0),
        layout: Layout::default().with_log_toggled(),
    };
    let settings = Settings {
        restore_workspace: false,
        ..Settings::default()
    };
    let mut h = harness_with(settings, MemoryWorkspaceStore::with_config(config), MockEngines::new());
    h.fs.put("/d/a.bpmn", bpmn_xml("a"));

    h.app.restore_workspace().unwrap();
    assert!(h.app.tabs().is_empty());
    assert!(h.app.layout().log.open);
}

#[test]
fn test_layout_updates_are_persisted() {
    let mut h = harness();
    h.app.trigger_action("toggle-log", &Value::Null).unwrap();
    assert!(h.app.layout().log.open);

    h.app.update_layout(LayoutUpdate {
        log: Some(LogLayout {
            open: true,
            height: 300,
        }),
        ..LayoutUpdate::default()
    });
    assert_eq!(h.store.stored().unwrap().layout.log.height, 300);

    let saves = h.store.saves();
    h.app.update_layout(LayoutUpdate::default());
    assert_eq!(h.store.saves(), saves);

    let events = h.app.take_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, AppEvent::LayoutUpdated(l) if l.log.height == 300)));
}

#[test]
fn test_import_warnings_reach_log() {
    let engines = MockEngines::new();
    engines.warn_on_import(vec!["unknown element".to_string()]);
    let mut h = harness_with(Settings::default(), MemoryWorkspaceStore::new(), engines);
    h.open("/d/a.bpmn", "a");

    let entry = h.app.logger().entries().next().unwrap();
    assert_eq!(entry.category, "a.bpmn");
    assert_eq!(entry.message, "unknown element");
    assert!(h.app.take_events().contains(&AppEvent::LogChanged));
}
