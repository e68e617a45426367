use std::fmt;

use crate::FileHandle;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    FileInput,
    Button,
    Form,
    Container,
    Other,
}

/// Piece of content placed inside a surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    /// Raw text shown verbatim, whitespace preserved.
    Preformatted(String),
    /// Download affordance pointing at an object URL.
    Link {
        href: String,
        download_name: String,
        text: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCommand {
    SetText { element: ElementId, text: String },
    SetContent { element: ElementId, content: Vec<Content> },
    SetEnabled { element: ElementId, enabled: bool },
}

/// User interaction reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    Click { element: ElementId },
    Submit { element: ElementId },
    FilesChanged {
        element: ElementId,
        files: Vec<FileHandle>,
    },
    LinkActivated { href: String },
}

/// What the host should do with the default action of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventDisposition {
    pub handled: bool,
    pub prevent_default: bool,
}

/// The page hosting the controls: a DOM, a terminal, a test double.
pub trait HostPage {
    fn find(&self, id: &str) -> Option<ElementKind>;

    /// Current text of an element, e.g. a button label.
    fn text(&self, element: &ElementId) -> Option<String>;

    /// Creates an element, placed right after `after` when given.
    fn create_element(
        &mut self,
        kind: ElementKind,
        id: &str,
        after: Option<&ElementId>,
    ) -> ElementId;

    fn apply(&mut self, command: HostCommand);
}
