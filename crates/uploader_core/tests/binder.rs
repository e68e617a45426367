use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use uploader_core::binder::{
    BindError, Content, ControlBinder, ElementId, ElementKind, ElementLookup, HostCommand,
    HostEvent, HostPage, Labels, Trigger,
};
use uploader_core::{update, AppState, FileHandle, Msg, ResponseOutcome, UiState};

#[derive(Debug, Default)]
struct FakeElement {
    kind: Option<ElementKind>,
    text: String,
    content: Vec<Content>,
    enabled: bool,
}

#[derive(Debug, Default)]
struct FakePage {
    elements: BTreeMap<String, FakeElement>,
    created: Vec<(String, Option<String>)>,
}

impl FakePage {
    fn with(elements: &[(&str, ElementKind, &str)]) -> Self {
        let mut page = Self::default();
        for (id, kind, text) in elements {
            page.elements.insert(
                id.to_string(),
                FakeElement {
                    kind: Some(*kind),
                    text: text.to_string(),
                    enabled: true,
                    ..FakeElement::default()
                },
            );
        }
        page
    }

    fn element(&self, id: &str) -> &FakeElement {
        self.elements.get(id).expect("element exists")
    }
}

impl HostPage for FakePage {
    fn find(&self, id: &str) -> Option<ElementKind> {
        self.elements.get(id).and_then(|e| e.kind)
    }

    fn text(&self, element: &ElementId) -> Option<String> {
        self.elements
            .get(element.as_str())
            .map(|e| e.text.clone())
            .filter(|t| !t.is_empty())
    }

    fn create_element(
        &mut self,
        kind: ElementKind,
        id: &str,
        after: Option<&ElementId>,
    ) -> ElementId {
        self.elements.insert(
            id.to_string(),
            FakeElement {
                kind: Some(kind),
                enabled: true,
                ..FakeElement::default()
            },
        );
        self.created
            .push((id.to_string(), after.map(|a| a.as_str().to_string())));
        ElementId::new(id)
    }

    fn apply(&mut self, command: HostCommand) {
        match command {
            HostCommand::SetText { element, text } => {
                self.elements.entry(element.as_str().to_string()).or_default().text = text;
            }
            HostCommand::SetContent { element, content } => {
                self.elements.entry(element.as_str().to_string()).or_default().content = content;
            }
            HostCommand::SetEnabled { element, enabled } => {
                self.elements.entry(element.as_str().to_string()).or_default().enabled = enabled;
            }
        }
    }
}

fn standard_page() -> FakePage {
    FakePage::with(&[
        ("csvFiles", ElementKind::FileInput, ""),
        ("processBtn", ElementKind::Button, "Run"),
        ("result", ElementKind::Container, ""),
        ("fileInfo", ElementKind::Container, ""),
    ])
}

fn bind(page: &mut FakePage) -> ControlBinder {
    ControlBinder::resolve(page, &ElementLookup::default(), Labels::default()).expect("bind")
}

#[test]
fn first_present_candidate_wins() {
    let mut page = FakePage::with(&[
        ("files", ElementKind::FileInput, ""),
        ("fileInput", ElementKind::FileInput, ""),
        ("submitBtn", ElementKind::Button, "Go"),
        ("uploadBtn", ElementKind::Button, "Upload"),
        ("output", ElementKind::Container, ""),
    ]);
    let binder = bind(&mut page);
    let controls = binder.controls();

    assert_eq!(controls.file_input, Some(ElementId::new("fileInput")));
    assert_eq!(controls.trigger, Trigger::Button(ElementId::new("uploadBtn")));
    assert_eq!(controls.status, ElementId::new("output"));
}

#[test]
fn candidate_with_wrong_kind_is_skipped() {
    let mut page = FakePage::with(&[
        ("processBtn", ElementKind::Container, ""),
        ("uploadBtn", ElementKind::Button, "Upload"),
    ]);
    let binder = bind(&mut page);

    assert_eq!(
        binder.controls().trigger,
        Trigger::Button(ElementId::new("uploadBtn"))
    );
}

#[test]
fn missing_surfaces_are_created() {
    let mut page = FakePage::with(&[
        ("csvFiles", ElementKind::FileInput, ""),
        ("processBtn", ElementKind::Button, "Run"),
    ]);
    let binder = bind(&mut page);

    assert_eq!(binder.controls().status, ElementId::new("result"));
    assert_eq!(binder.controls().selection_info, ElementId::new("fileInfo"));
    assert_eq!(
        page.created,
        vec![
            ("result".to_string(), Some("processBtn".to_string())),
            ("fileInfo".to_string(), Some("csvFiles".to_string())),
        ]
    );
}

#[test]
fn no_trigger_reports_expected_ids() {
    let mut page = FakePage::with(&[("csvFiles", ElementKind::FileInput, "")]);
    let lookup = ElementLookup::default();
    let err = match ControlBinder::resolve(&mut page, &lookup, Labels::default()) {
        Err(err) => err,
        Ok(_) => panic!("binding must fail without a trigger"),
    };

    assert!(matches!(err, BindError::NoTriggerFound { .. }));
    let guidance = err.guidance();
    assert!(guidance.contains("\"processBtn\""));
    assert!(guidance.contains("\"uploadForm\""));

    ControlBinder::render_diagnostic(&mut page, &lookup, &err);
    assert_eq!(page.element("result").content, vec![Content::Text(guidance)]);
}

#[test]
fn form_trigger_prevents_default_and_fires_once() {
    let mut page = FakePage::with(&[
        ("csvFiles", ElementKind::FileInput, ""),
        ("uploadForm", ElementKind::Form, ""),
    ]);
    let mut binder = bind(&mut page);
    let fired = Rc::new(RefCell::new(0));
    let counter = fired.clone();
    binder.on_triggered(move || *counter.borrow_mut() += 1);

    let disposition = binder.handle_event(HostEvent::Submit {
        element: ElementId::new("uploadForm"),
    });

    assert!(disposition.prevent_default);
    assert!(disposition.handled);
    assert_eq!(*fired.borrow(), 1);
}

#[test]
fn button_with_form_suppresses_duplicate_submit() {
    let mut page = FakePage::with(&[
        ("processBtn", ElementKind::Button, "Run"),
        ("uploadForm", ElementKind::Form, ""),
    ]);
    let mut binder = bind(&mut page);
    let fired = Rc::new(RefCell::new(0));
    let counter = fired.clone();
    binder.on_triggered(move || *counter.borrow_mut() += 1);

    let click = binder.handle_event(HostEvent::Click {
        element: ElementId::new("processBtn"),
    });
    let submit = binder.handle_event(HostEvent::Submit {
        element: ElementId::new("uploadForm"),
    });

    assert!(click.handled);
    assert!(submit.prevent_default);
    assert!(!submit.handled);
    assert_eq!(*fired.borrow(), 1);
}

#[test]
fn unrelated_events_are_not_handled() {
    let mut page = standard_page();
    let mut binder = bind(&mut page);
    let disposition = binder.handle_event(HostEvent::Click {
        element: ElementId::new("somewhereElse"),
    });

    assert!(!disposition.handled);
    assert!(!disposition.prevent_default);
}

#[test]
fn selection_events_reach_handler() {
    let mut page = standard_page();
    let mut binder = bind(&mut page);
    let received = Rc::new(RefCell::new(Vec::new()));
    let sink = received.clone();
    binder.on_selection(move |files| sink.borrow_mut().extend(files));

    binder.handle_event(HostEvent::FilesChanged {
        element: ElementId::new("csvFiles"),
        files: vec![FileHandle::new("a.csv", "x")],
    });

    assert_eq!(received.borrow().len(), 1);
}

#[test]
fn render_reflects_submission_lifecycle() {
    let mut page = standard_page();
    let mut binder = bind(&mut page);
    let fired = Rc::new(RefCell::new(0));
    let counter = fired.clone();
    binder.on_triggered(move || *counter.borrow_mut() += 1);

    let state = AppState::default();
    binder.render(&mut page, &state.view());
    assert_eq!(page.element("fileInfo").text, "No file selected.");

    let (state, _) = update(
        state,
        Msg::FilesSelected(vec![FileHandle::new("data.csv", "1,2")]),
    );
    binder.render(&mut page, &state.view());
    assert_eq!(page.element("fileInfo").text, "1 file selected: data.csv");

    let (state, _) = update(state, Msg::TriggerFired);
    binder.render(&mut page, &state.view());
    assert!(!page.element("processBtn").enabled);
    assert_eq!(page.element("processBtn").text, "Processing...");
    assert_eq!(
        page.element("result").content,
        vec![Content::Text("Processing...".to_string())]
    );

    // Disabled trigger swallows clicks.
    binder.handle_event(HostEvent::Click {
        element: ElementId::new("processBtn"),
    });
    assert_eq!(*fired.borrow(), 0);

    let (state, _) = update(
        state,
        Msg::SubmissionResolved {
            submission_id: 1,
            outcome: ResponseOutcome::ServerError {
                message: "bad file".to_string(),
            },
        },
    );
    let (state, _) = update(state, Msg::CycleFinished { submission_id: 1 });
    assert_eq!(state.ui_state(), UiState::Idle);
    binder.render(&mut page, &state.view());

    assert!(page.element("processBtn").enabled);
    assert_eq!(page.element("processBtn").text, "Run");
    assert_eq!(
        page.element("result").content,
        vec![Content::Text("Server error: bad file".to_string())]
    );
}

/// Host that fails whenever status content is applied.
struct ContentFailingPage(FakePage);

impl HostPage for ContentFailingPage {
    fn find(&self, id: &str) -> Option<ElementKind> {
        self.0.find(id)
    }

    fn text(&self, element: &ElementId) -> Option<String> {
        self.0.text(element)
    }

    fn create_element(
        &mut self,
        kind: ElementKind,
        id: &str,
        after: Option<&ElementId>,
    ) -> ElementId {
        self.0.create_element(kind, id, after)
    }

    fn apply(&mut self, command: HostCommand) {
        if matches!(command, HostCommand::SetContent { .. }) {
            panic!("content rejected");
        }
        self.0.apply(command);
    }
}

#[test]
fn trigger_is_restored_even_when_status_content_fails() {
    let mut page = standard_page();
    let mut binder = bind(&mut page);

    let (state, _) = update(
        AppState::default(),
        Msg::FilesSelected(vec![FileHandle::new("data.csv", "1,2")]),
    );
    let (state, _) = update(state, Msg::TriggerFired);
    binder.render(&mut page, &state.view());
    assert!(!page.element("processBtn").enabled);

    let (state, _) = update(
        state,
        Msg::SubmissionResolved {
            submission_id: 1,
            outcome: ResponseOutcome::ServerError {
                message: "bad file".to_string(),
            },
        },
    );
    let (state, _) = update(state, Msg::CycleFinished { submission_id: 1 });

    let mut failing = ContentFailingPage(page);
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        binder.render(&mut failing, &state.view())
    }));
    assert!(result.is_err());

    let page = failing.0;
    assert!(page.element("processBtn").enabled);
    assert_eq!(page.element("processBtn").text, "Run");

    let fired = Rc::new(RefCell::new(0));
    let counter = fired.clone();
    binder.on_triggered(move || *counter.borrow_mut() += 1);
    binder.handle_event(HostEvent::Click {
        element: ElementId::new("processBtn"),
    });
    assert_eq!(*fired.borrow(), 1);
}
