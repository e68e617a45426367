//! Control Binder: attaches the orchestrator to whatever page hosts it.
//!
//! Elements are found through an [`ElementLookup`] of prioritized ids, so
//! pages that name their controls differently bind without code changes.
//! Missing output surfaces are created; a page without any trigger gets a
//! diagnostic instead of a crash.

mod lookup;
mod page;
mod render;

pub use lookup::ElementLookup;
pub use page::{
    Content, ElementId, ElementKind, EventDisposition, HostCommand, HostEvent, HostPage,
};
pub use render::{selection_text, status_content, Labels};

use thiserror::Error;
use uploader_logging::{uploader_debug, uploader_error, uploader_info};

use crate::view_model::{AppViewModel, StatusView, TriggerView};
use crate::FileHandle;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    #[error(
        "no submission trigger found; expected a button with one of the ids {buttons:?} \
         or a form with one of the ids {forms:?}"
    )]
    NoTriggerFound {
        buttons: Vec<String>,
        forms: Vec<String>,
    },
}

impl BindError {
    /// Integrator-facing explanation of what the page must provide.
    pub fn guidance(&self) -> String {
        match self {
            BindError::NoTriggerFound { buttons, forms } => format!(
                "Upload controls are not wired: add a button with id {} or a form with id {}.",
                quoted_list(buttons),
                quoted_list(forms)
            ),
        }
    }
}

fn quoted_list(ids: &[String]) -> String {
    if ids.is_empty() {
        return "(none configured)".to_string();
    }
    ids.iter()
        .map(|id| format!("\"{id}\""))
        .collect::<Vec<_>>()
        .join(" or ")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    Button(ElementId),
    Form(ElementId),
    /// Dedicated button on a page that also has a submittable form; the
    /// button triggers, the form's default submission is suppressed.
    ButtonInForm { button: ElementId, form: ElementId },
}

impl Trigger {
    /// Element that is disabled while a submission runs.
    pub fn control(&self) -> &ElementId {
        match self {
            Trigger::Button(button) | Trigger::ButtonInForm { button, .. } => button,
            Trigger::Form(form) => form,
        }
    }

    fn button(&self) -> Option<&ElementId> {
        match self {
            Trigger::Button(button) | Trigger::ButtonInForm { button, .. } => Some(button),
            Trigger::Form(_) => None,
        }
    }

    fn form(&self) -> Option<&ElementId> {
        match self {
            Trigger::Form(form) | Trigger::ButtonInForm { form, .. } => Some(form),
            Trigger::Button(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundControls {
    pub file_input: Option<ElementId>,
    pub trigger: Trigger,
    pub status: ElementId,
    pub selection_info: ElementId,
}

type TriggerHandler = Box<dyn FnMut()>;
type SelectionHandler = Box<dyn FnMut(Vec<FileHandle>)>;
type LinkHandler = Box<dyn FnMut(String)>;

pub struct ControlBinder {
    controls: BoundControls,
    labels: Labels,
    idle_label: Option<String>,
    trigger_enabled: bool,
    on_trigger: Option<TriggerHandler>,
    on_selection: Option<SelectionHandler>,
    on_link: Option<LinkHandler>,
}

impl ControlBinder {
    /// Resolves the controls on `page`, creating missing output surfaces.
    pub fn resolve(
        page: &mut dyn HostPage,
        lookup: &ElementLookup,
        labels: Labels,
    ) -> Result<Self, BindError> {
        let file_input = lookup.find_file_input(page);
        let trigger = match (lookup.find_trigger(page), lookup.find_form(page)) {
            (Some(button), Some(form)) => Trigger::ButtonInForm { button, form },
            (Some(button), None) => Trigger::Button(button),
            (None, Some(form)) => Trigger::Form(form),
            (None, None) => {
                let err = BindError::NoTriggerFound {
                    buttons: lookup.trigger.clone(),
                    forms: lookup.form.clone(),
                };
                uploader_error!("{}", err);
                return Err(err);
            }
        };

        let status = match lookup.find_status(page) {
            Some(status) => status,
            None => {
                uploader_info!("Creating status surface #{}", lookup.created_status_id);
                page.create_element(
                    ElementKind::Container,
                    &lookup.created_status_id,
                    Some(trigger.control()),
                )
            }
        };
        let selection_info = match lookup.find_selection_info(page) {
            Some(info) => info,
            None => {
                uploader_debug!(
                    "Creating selection info surface #{}",
                    lookup.created_selection_info_id
                );
                page.create_element(
                    ElementKind::Container,
                    &lookup.created_selection_info_id,
                    file_input.as_ref(),
                )
            }
        };

        let idle_label = trigger
            .button()
            .map(|button| page.text(button).unwrap_or_else(|| labels.trigger_idle.clone()));

        let controls = BoundControls {
            file_input,
            trigger,
            status,
            selection_info,
        };
        uploader_info!("Bound controls: {:?}", controls);
        Ok(Self {
            controls,
            labels,
            idle_label,
            trigger_enabled: true,
            on_trigger: None,
            on_selection: None,
            on_link: None,
        })
    }

    /// Writes integrator guidance for a failed [`ControlBinder::resolve`].
    pub fn render_diagnostic(page: &mut dyn HostPage, lookup: &ElementLookup, err: &BindError) {
        let surface = lookup.find_status(page).unwrap_or_else(|| {
            page.create_element(ElementKind::Container, &lookup.created_status_id, None)
        });
        page.apply(HostCommand::SetContent {
            element: surface,
            content: vec![Content::Text(err.guidance())],
        });
    }

    pub fn controls(&self) -> &BoundControls {
        &self.controls
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    /// Registers the orchestrator entry point for the resolved trigger.
    pub fn on_triggered(&mut self, handler: impl FnMut() + 'static) {
        self.on_trigger = Some(Box::new(handler));
    }

    pub fn on_selection(&mut self, handler: impl FnMut(Vec<FileHandle>) + 'static) {
        self.on_selection = Some(Box::new(handler));
    }

    pub fn on_link_activated(&mut self, handler: impl FnMut(String) + 'static) {
        self.on_link = Some(Box::new(handler));
    }

    /// Routes a host event to the registered handlers.
    pub fn handle_event(&mut self, event: HostEvent) -> EventDisposition {
        match event {
            HostEvent::Click { element } if self.controls.trigger.button() == Some(&element) => {
                // A disabled control produces no activation.
                if self.trigger_enabled {
                    fire(&mut self.on_trigger);
                }
                EventDisposition {
                    handled: true,
                    prevent_default: true,
                }
            }
            HostEvent::Submit { element } if self.controls.trigger.form() == Some(&element) => {
                let form_triggers = matches!(self.controls.trigger, Trigger::Form(_));
                if form_triggers && self.trigger_enabled {
                    fire(&mut self.on_trigger);
                }
                EventDisposition {
                    handled: form_triggers,
                    prevent_default: true,
                }
            }
            HostEvent::FilesChanged { element, files }
                if self.controls.file_input.as_ref() == Some(&element) =>
            {
                if let Some(handler) = self.on_selection.as_mut() {
                    handler(files);
                }
                EventDisposition {
                    handled: true,
                    prevent_default: false,
                }
            }
            HostEvent::LinkActivated { href } => {
                if let Some(handler) = self.on_link.as_mut() {
                    handler(href);
                }
                EventDisposition {
                    handled: true,
                    // The host must not follow the link itself.
                    prevent_default: true,
                }
            }
            _ => EventDisposition::default(),
        }
    }

    pub fn render_selection_count(
        &self,
        page: &mut dyn HostPage,
        count: usize,
        first_name: Option<&str>,
    ) {
        page.apply(HostCommand::SetText {
            element: self.controls.selection_info.clone(),
            text: selection_text(&self.labels, count, first_name),
        });
    }

    /// Renders the trigger state, then the status surface. The trigger goes
    /// first so a host that fails on content still gets the control back.
    pub fn render_status(&mut self, page: &mut dyn HostPage, view: &AppViewModel) {
        self.render_trigger(page, view.trigger);
        page.apply(HostCommand::SetContent {
            element: self.controls.status.clone(),
            content: status_content(&self.labels, view),
        });
    }

    pub fn render_trigger(&mut self, page: &mut dyn HostPage, trigger: TriggerView) {
        self.trigger_enabled = trigger.enabled;
        page.apply(HostCommand::SetEnabled {
            element: self.controls.trigger.control().clone(),
            enabled: trigger.enabled,
        });
        if let (Some(button), Some(idle_label)) = (self.controls.trigger.button(), &self.idle_label)
        {
            let text = if trigger.busy {
                self.labels.trigger_busy.clone()
            } else {
                idle_label.clone()
            };
            page.apply(HostCommand::SetText {
                element: button.clone(),
                text,
            });
        }
    }

    /// Renders the whole view model.
    pub fn render(&mut self, page: &mut dyn HostPage, view: &AppViewModel) {
        self.render_selection_count(page, view.selection_count, view.first_file_name.as_deref());
        self.render_status(page, view);
    }

    /// True while a success link is on screen.
    pub fn shows_download_link(view: &AppViewModel) -> bool {
        matches!(
            view.status,
            StatusView::DownloadReady {
                auto_triggered: false,
                ..
            }
        )
    }
}

fn fire(handler: &mut Option<TriggerHandler>) {
    if let Some(handler) = handler.as_mut() {
        handler();
    }
}
