use serde::{Deserialize, Serialize};

use super::page::{ElementId, ElementKind, HostPage};

/// Prioritized element ids tried when binding to a host page. The first id
/// that exists with a compatible kind wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementLookup {
    pub file_input: Vec<String>,
    pub trigger: Vec<String>,
    pub form: Vec<String>,
    pub status: Vec<String>,
    pub selection_info: Vec<String>,
    /// Id given to the status surface when the page has none.
    pub created_status_id: String,
    /// Id given to the selection info surface when the page has none.
    pub created_selection_info_id: String,
}

impl Default for ElementLookup {
    fn default() -> Self {
        Self {
            file_input: strings(&["csvFiles", "fileInput", "files"]),
            trigger: strings(&["processBtn", "uploadBtn", "submitBtn"]),
            form: strings(&["uploadForm", "form"]),
            status: strings(&["result", "status", "output"]),
            selection_info: strings(&["fileInfo"]),
            created_status_id: "result".to_string(),
            created_selection_info_id: "fileInfo".to_string(),
        }
    }
}

fn strings(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

impl ElementLookup {
    pub(crate) fn find_file_input(&self, page: &dyn HostPage) -> Option<ElementId> {
        first_match(page, &self.file_input, |kind| kind == ElementKind::FileInput)
    }

    pub(crate) fn find_trigger(&self, page: &dyn HostPage) -> Option<ElementId> {
        first_match(page, &self.trigger, |kind| kind == ElementKind::Button)
    }

    pub(crate) fn find_form(&self, page: &dyn HostPage) -> Option<ElementId> {
        first_match(page, &self.form, |kind| kind == ElementKind::Form)
    }

    pub(crate) fn find_status(&self, page: &dyn HostPage) -> Option<ElementId> {
        first_match(page, &self.status, is_surface)
    }

    pub(crate) fn find_selection_info(&self, page: &dyn HostPage) -> Option<ElementId> {
        first_match(page, &self.selection_info, is_surface)
    }
}

fn is_surface(kind: ElementKind) -> bool {
    matches!(kind, ElementKind::Container | ElementKind::Other)
}

fn first_match(
    page: &dyn HostPage,
    candidates: &[String],
    accept: impl Fn(ElementKind) -> bool,
) -> Option<ElementId> {
    candidates
        .iter()
        .find(|id| page.find(id).is_some_and(&accept))
        .map(ElementId::new)
}
