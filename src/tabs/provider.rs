//! Tab providers: one per notation.

use super::{MultiEditorTab, TabId};
use crate::editor::{DiagramEditor, EngineFactory, ModelerEditor, XmlEditor};
use crate::error::Result;
use crate::files::{FileDescriptor, Notation};
use log::debug;
use uuid::Uuid;

const ID_PLACEHOLDER: &str = "{{ ID }}";

/// Creates new files and tabs for one notation.
pub trait TabProvider {
    fn notation(&self) -> Notation;

    fn can_create(&self, file_type: Notation) -> bool {
        file_type == self.notation()
    }

    /// A fresh, unsaved diagram.
    fn create_new_file(&mut self) -> FileDescriptor;

    fn create_tab(&self, id: TabId, file: FileDescriptor) -> Result<MultiEditorTab>;
}

/// Provider offering the graphical modeler and the XML source of a notation.
pub struct DiagramTabProvider {
    notation: Notation,
    engines: EngineFactory,
    /// Diagrams created so far, for naming
    created: usize,
}

impl DiagramTabProvider {
    pub fn new(notation: Notation, engines: EngineFactory) -> Self {
        Self {
            notation,
            engines,
            created: 0,
        }
    }

    /// One provider per supported notation.
    pub fn all(engines: EngineFactory) -> Vec<Box<dyn TabProvider>> {
        Notation::all()
            .iter()
            .map(|&notation| {
                Box::new(DiagramTabProvider::new(notation, engines.clone())) as Box<dyn TabProvider>
            })
            .collect()
    }

    fn template(&self) -> &'static str {
        match self.notation {
            Notation::Bpmn => include_str!("templates/bpmn.xml"),
            Notation::Dmn => include_str!("templates/dmn.xml"),
            Notation::Cmmn => include_str!("templates/cmmn.xml"),
        }
    }
}

fn definitions_id() -> String {
    let uuid = Uuid::new_v4().simple().to_string();
    format!("Definitions_{}", &uuid[..7])
}

impl TabProvider for DiagramTabProvider {
    fn notation(&self) -> Notation {
        self.notation
    }

    fn create_new_file(&mut self) -> FileDescriptor {
        self.created += 1;
        let name = format!("diagram_{}.{}", self.created, self.notation.extension());
        let contents = self.template().replace(ID_PLACEHOLDER, &definitions_id());
        debug!("Created new {} diagram '{}'", self.notation.display_name(), name);
        FileDescriptor::unsaved(name, contents, self.notation)
    }

    fn create_tab(&self, id: TabId, file: FileDescriptor) -> Result<MultiEditorTab> {
        let editors = vec![
            DiagramEditor::new(
                "diagram",
                Box::new(ModelerEditor::new(self.notation, self.engines.clone())),
            ),
            DiagramEditor::new("xml", Box::new(XmlEditor::new())),
        ];
        MultiEditorTab::new(id, file, editors)
    }
}
