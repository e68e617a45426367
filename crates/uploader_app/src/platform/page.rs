//! Terminal host for the control binder.
//!
//! Elements live in memory; every visible change is printed as a line
//! prefixed with the element id.

use std::io::{self, Write};

use uploader_core::binder::{Content, ElementId, ElementKind, HostCommand, HostPage};
use uploader_logging::{uploader_debug, uploader_warn};

use super::config::PageElement;

#[derive(Debug, Clone)]
struct Element {
    id: ElementId,
    kind: ElementKind,
    text: String,
    content: Vec<Content>,
    enabled: bool,
}

impl Element {
    fn new(id: ElementId, kind: ElementKind, text: String) -> Self {
        Self {
            id,
            kind,
            text,
            content: Vec::new(),
            enabled: true,
        }
    }
}

pub struct TerminalPage<W: Write> {
    elements: Vec<Element>,
    out: W,
}

impl TerminalPage<io::Stdout> {
    pub fn stdout(layout: &[PageElement]) -> Self {
        Self::new(layout, io::stdout())
    }
}

impl<W: Write> TerminalPage<W> {
    pub fn new(layout: &[PageElement], out: W) -> Self {
        let elements = layout
            .iter()
            .map(|element| {
                Element::new(
                    ElementId::new(element.id.clone()),
                    element.kind.into(),
                    element.text.clone(),
                )
            })
            .collect();
        Self { elements, out }
    }

    #[cfg(test)]
    pub fn output(&self) -> &W {
        &self.out
    }

    #[cfg(test)]
    pub fn element_ids(&self) -> Vec<&str> {
        self.elements.iter().map(|e| e.id.as_str()).collect()
    }

    #[cfg(test)]
    pub fn content(&self, id: &str) -> Option<&[Content]> {
        self.get(id).map(|e| e.content.as_slice())
    }

    #[cfg(test)]
    pub fn is_enabled(&self, id: &str) -> Option<bool> {
        self.get(id).map(|e| e.enabled)
    }

    fn get(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id.as_str() == id)
    }

    fn get_mut(&mut self, id: &ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| &e.id == id)
    }

    fn print(&mut self, element: &ElementId, line: &str) {
        if let Err(err) = writeln!(self.out, "[{element}] {line}") {
            uploader_warn!("Failed to write to terminal: {}", err);
        }
    }

    fn print_content(&mut self, element: &ElementId, content: &[Content]) {
        for piece in content {
            match piece {
                Content::Text(text) => self.print(element, text),
                // Headed by the text piece before it; printed as an indented block.
                Content::Preformatted(raw) => {
                    for line in raw.lines() {
                        if let Err(err) = writeln!(self.out, "    {line}") {
                            uploader_warn!("Failed to write to terminal: {}", err);
                            return;
                        }
                    }
                }
                Content::Link {
                    href,
                    download_name,
                    text,
                } => self.print(element, &format!("{text} <{href}> ({download_name})")),
            }
        }
    }
}

impl<W: Write> HostPage for TerminalPage<W> {
    fn find(&self, id: &str) -> Option<ElementKind> {
        self.get(id).map(|e| e.kind)
    }

    fn text(&self, element: &ElementId) -> Option<String> {
        self.get(element.as_str())
            .map(|e| e.text.clone())
            .filter(|text| !text.is_empty())
    }

    fn create_element(
        &mut self,
        kind: ElementKind,
        id: &str,
        after: Option<&ElementId>,
    ) -> ElementId {
        let element_id = ElementId::new(id);
        if self.get(id).is_some() {
            return element_id;
        }
        let position = after
            .and_then(|after| self.elements.iter().position(|e| &e.id == after))
            .map(|index| index + 1)
            .unwrap_or(self.elements.len());
        uploader_debug!("Creating element #{} at position {}", id, position);
        self.elements
            .insert(position, Element::new(element_id.clone(), kind, String::new()));
        element_id
    }

    fn apply(&mut self, command: HostCommand) {
        match command {
            HostCommand::SetText { element, text } => {
                let Some(target) = self.get_mut(&element) else {
                    uploader_warn!("SetText for unknown element #{}", element);
                    return;
                };
                if target.text != text {
                    target.text = text.clone();
                    self.print(&element, &text);
                }
            }
            HostCommand::SetContent { element, content } => {
                let Some(target) = self.get_mut(&element) else {
                    uploader_warn!("SetContent for unknown element #{}", element);
                    return;
                };
                if target.content != content {
                    target.content = content.clone();
                    self.print_content(&element, &content);
                }
            }
            HostCommand::SetEnabled { element, enabled } => {
                if let Some(target) = self.get_mut(&element) {
                    if target.enabled != enabled {
                        target.enabled = enabled;
                        uploader_debug!("#{} enabled={}", element, enabled);
                    }
                }
            }
        }
    }
}
