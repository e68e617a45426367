use std::sync::Once;

use pretty_assertions::assert_eq;
use uploader_core::{
    update, AppState, DeliveryMode, Effect, FailureKind, FileHandle, FileSelection, Msg,
    OrchestratorConfig, PayloadProfile, ResponseOutcome, StatusView, UiState,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(uploader_logging::initialize_for_tests);
}

fn files(names: &[&str]) -> Vec<FileHandle> {
    names
        .iter()
        .map(|name| FileHandle::new(*name, format!("content of {name}")))
        .collect()
}

fn select(state: AppState, names: &[&str]) -> AppState {
    let (state, effects) = update(state, Msg::FilesSelected(files(names)));
    assert!(effects.is_empty());
    state
}

/// Selects files and fires the trigger; returns the submission id.
fn start_submission(state: AppState, names: &[&str]) -> (AppState, u64) {
    let state = select(state, names);
    let (state, effects) = update(state, Msg::TriggerFired);
    match effects.as_slice() {
        [Effect::Submit { submission_id, .. }] => (state, *submission_id),
        other => panic!("expected a single submit effect, got {other:?}"),
    }
}

fn resolve(state: AppState, submission_id: u64, outcome: ResponseOutcome) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::SubmissionResolved {
            submission_id,
            outcome,
        },
    )
}

fn finish(state: AppState, submission_id: u64) -> AppState {
    let (state, effects) = update(state, Msg::CycleFinished { submission_id });
    assert!(effects.is_empty());
    state
}

#[test]
fn selecting_files_updates_count_and_stays_idle() {
    init_logging();
    let mut state = select(AppState::default(), &["a.csv", "b.csv"]);
    let view = state.view();

    assert_eq!(view.ui, UiState::Idle);
    assert_eq!(view.selection_count, 2);
    assert_eq!(view.first_file_name.as_deref(), Some("a.csv"));
    assert!(view.trigger.enabled);
    assert!(state.consume_dirty());
}

#[test]
fn trigger_without_files_warns_and_makes_no_request() {
    init_logging();
    let (state, effects) = update(AppState::default(), Msg::TriggerFired);

    assert!(effects.is_empty());
    assert_eq!(state.ui_state(), UiState::Idle);
    assert_eq!(state.status(), &StatusView::SelectionRequired);
    assert!(state.trigger_enabled());
}

#[test]
fn trigger_with_files_disables_trigger_and_submits_selection() {
    init_logging();
    let state = select(AppState::default(), &["a.csv", "b.csv"]);
    let (state, effects) = update(state, Msg::TriggerFired);

    assert_eq!(state.ui_state(), UiState::Submitting);
    assert!(!state.trigger_enabled());
    assert!(state.view().trigger.busy);
    assert_eq!(state.status(), &StatusView::Busy);
    assert_eq!(
        effects,
        vec![Effect::Submit {
            submission_id: 1,
            selection: FileSelection::new(files(&["a.csv", "b.csv"])).unwrap(),
        }]
    );
}

#[test]
fn repeated_trigger_while_submitting_is_ignored() {
    init_logging();
    let (state, _id) = start_submission(AppState::default(), &["a.csv"]);
    let (state, effects) = update(state, Msg::TriggerFired);

    assert!(effects.is_empty());
    assert_eq!(state.ui_state(), UiState::Submitting);
}

#[test]
fn success_publishes_download_then_cleanup_reenables_trigger() {
    init_logging();
    let (state, id) = start_submission(AppState::default(), &["a.csv"]);
    let (state, effects) = resolve(
        state,
        id,
        ResponseOutcome::Success {
            payload: b"PK".to_vec(),
            suggested_filename: "resultats.zip".to_string(),
        },
    );

    assert_eq!(state.ui_state(), UiState::ResolvedSuccess);
    assert!(!state.trigger_enabled());
    assert_eq!(
        effects,
        vec![Effect::PublishDownload {
            submission_id: id,
            payload: b"PK".to_vec(),
            filename: "resultats.zip".to_string(),
            auto_trigger: true,
        }]
    );

    let (state, effects) = update(
        state,
        Msg::DownloadPublished {
            submission_id: id,
            object_url: "blob:uploader/1".to_string(),
            auto_triggered: true,
        },
    );
    assert!(effects.is_empty());
    assert_eq!(
        state.status(),
        &StatusView::DownloadReady {
            filename: "resultats.zip".to_string(),
            object_url: "blob:uploader/1".to_string(),
            auto_triggered: true,
        }
    );

    let state = finish(state, id);
    assert_eq!(state.ui_state(), UiState::Idle);
    assert!(state.trigger_enabled());
    assert!(!state.view().trigger.busy);
}

#[test]
fn each_failure_kind_resolves_to_error_and_cleanup_restores_trigger() {
    init_logging();
    let cases = [
        (
            ResponseOutcome::ServerError {
                message: "bad file".to_string(),
            },
            StatusView::Failed {
                kind: FailureKind::Server,
                message: "bad file".to_string(),
            },
        ),
        (
            ResponseOutcome::TransportError {
                message: "connection refused".to_string(),
            },
            StatusView::Failed {
                kind: FailureKind::Transport,
                message: "connection refused".to_string(),
            },
        ),
        (
            ResponseOutcome::UnexpectedContent {
                raw_text: "<html>oops</html>".to_string(),
            },
            StatusView::Unexpected {
                raw_text: "<html>oops</html>".to_string(),
            },
        ),
    ];

    for (outcome, expected_status) in cases {
        let (state, id) = start_submission(AppState::default(), &["a.csv"]);
        let (state, effects) = resolve(state, id, outcome);
        assert!(effects.is_empty(), "no download for an error outcome");
        assert_eq!(state.ui_state(), UiState::ResolvedError);
        assert_eq!(state.status(), &expected_status);

        let state = finish(state, id);
        assert_eq!(state.ui_state(), UiState::Idle);
        assert!(state.trigger_enabled());
        // The error stays visible after cleanup.
        assert_eq!(state.status(), &expected_status);
    }
}

#[test]
fn only_one_outcome_is_applied_per_submission() {
    init_logging();
    let (state, id) = start_submission(AppState::default(), &["a.csv"]);
    let (state, _) = resolve(
        state,
        id,
        ResponseOutcome::ServerError {
            message: "first".to_string(),
        },
    );
    let before = state.clone();
    let (state, effects) = resolve(
        state,
        id,
        ResponseOutcome::Success {
            payload: b"PK".to_vec(),
            suggested_filename: "late.zip".to_string(),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state, before);
}

#[test]
fn outcome_for_unknown_submission_is_dropped() {
    init_logging();
    let (state, id) = start_submission(AppState::default(), &["a.csv"]);
    let (state, effects) = resolve(
        state,
        id + 41,
        ResponseOutcome::TransportError {
            message: "stray".to_string(),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.ui_state(), UiState::Submitting);
    assert_eq!(state.in_flight(), Some(id));
}

#[test]
fn reselecting_while_submitting_keeps_request_in_flight() {
    init_logging();
    let (state, id) = start_submission(AppState::default(), &["a.csv"]);
    let (state, effects) = update(state, Msg::FilesSelected(files(&["b.csv", "c.csv"])));

    assert!(effects.is_empty());
    assert_eq!(state.ui_state(), UiState::Submitting);
    assert!(!state.trigger_enabled());
    assert_eq!(state.in_flight(), Some(id));
    assert_eq!(state.status(), &StatusView::Empty);
    assert_eq!(state.view().selection_count, 2);

    let (state, _) = resolve(
        state,
        id,
        ResponseOutcome::ServerError {
            message: "late".to_string(),
        },
    );
    let state = finish(state, id);
    assert!(state.trigger_enabled());
    assert_eq!(state.selection().len(), 2);
}

#[test]
fn reselecting_after_outcome_clears_it() {
    init_logging();
    let (state, id) = start_submission(AppState::default(), &["a.csv"]);
    let (state, _) = resolve(
        state,
        id,
        ResponseOutcome::ServerError {
            message: "bad file".to_string(),
        },
    );
    let state = finish(state, id);
    let state = select(state, &["b.csv"]);

    assert_eq!(state.status(), &StatusView::Empty);
    assert_eq!(state.ui_state(), UiState::Idle);
}

#[test]
fn resubmitting_uses_current_selection_and_new_id() {
    init_logging();
    let (state, first) = start_submission(AppState::default(), &["a.csv"]);
    let (state, _) = resolve(
        state,
        first,
        ResponseOutcome::TransportError {
            message: "offline".to_string(),
        },
    );
    let state = finish(state, first);
    let (_state, effects) = update(state, Msg::TriggerFired);

    match effects.as_slice() {
        [Effect::Submit {
            submission_id,
            selection,
        }] => {
            assert_eq!(*submission_id, first + 1);
            assert_eq!(selection.files()[0].name, "a.csv");
        }
        other => panic!("expected submit, got {other:?}"),
    }
}

#[test]
fn cycle_finished_for_other_submission_is_ignored() {
    init_logging();
    let (state, id) = start_submission(AppState::default(), &["a.csv"]);
    let state = finish(state, id);

    assert!(!state.trigger_enabled(), "still submitting");
    assert_eq!(state.ui_state(), UiState::Submitting);
}

#[test]
fn delivery_failure_turns_success_into_error() {
    init_logging();
    let (state, id) = start_submission(AppState::default(), &["a.csv"]);
    let (state, _) = resolve(
        state,
        id,
        ResponseOutcome::Success {
            payload: b"PK".to_vec(),
            suggested_filename: "resultats.zip".to_string(),
        },
    );
    let (state, _) = update(
        state,
        Msg::DeliveryFailed {
            submission_id: id,
            message: "disk full".to_string(),
        },
    );
    let state = finish(state, id);

    assert_eq!(
        state.status(),
        &StatusView::Failed {
            kind: FailureKind::Delivery,
            message: "disk full".to_string(),
        }
    );
    assert!(state.trigger_enabled());
}

fn link_state() -> (AppState, u64) {
    let config = OrchestratorConfig {
        payload: PayloadProfile::spreadsheet(),
        delivery: DeliveryMode::Link,
    };
    let (state, id) = start_submission(AppState::new(config), &["a.csv"]);
    let (state, effects) = resolve(
        state,
        id,
        ResponseOutcome::Success {
            payload: b"xlsx".to_vec(),
            suggested_filename: "resultat.xlsx".to_string(),
        },
    );
    assert!(matches!(
        effects.as_slice(),
        [Effect::PublishDownload {
            auto_trigger: false,
            ..
        }]
    ));
    let (state, _) = update(
        state,
        Msg::DownloadPublished {
            submission_id: id,
            object_url: "blob:uploader/9".to_string(),
            auto_triggered: false,
        },
    );
    (finish(state, id), id)
}

#[test]
fn link_activation_triggers_download_once() {
    init_logging();
    let (state, id) = link_state();
    let activate = || Msg::DownloadActivated {
        object_url: "blob:uploader/9".to_string(),
    };

    let (state, effects) = update(state, activate());
    assert_eq!(
        effects,
        vec![Effect::TriggerDownload {
            submission_id: id,
            object_url: "blob:uploader/9".to_string()
        }]
    );

    let (state, effects) = update(state, activate());
    assert!(effects.is_empty());

    // Already released on schedule; clearing must not release again.
    let (_state, effects) = update(state, Msg::Reset);
    assert!(effects.is_empty());
}

#[test]
fn clearing_unused_link_discards_object() {
    init_logging();
    let (state, _id) = link_state();
    let (state, effects) = update(state, Msg::FilesSelected(files(&["b.csv"])));

    assert_eq!(
        effects,
        vec![Effect::DiscardDownload {
            object_url: "blob:uploader/9".to_string()
        }]
    );
    assert_eq!(state.status(), &StatusView::Empty);

    let (_state, effects) = update(
        state,
        Msg::DownloadActivated {
            object_url: "blob:uploader/9".to_string(),
        },
    );
    assert!(effects.is_empty(), "stale link does nothing");
}

#[test]
fn publish_after_outcome_was_cleared_discards_link_object() {
    init_logging();
    let config = OrchestratorConfig {
        delivery: DeliveryMode::Link,
        ..OrchestratorConfig::default()
    };
    let (state, id) = start_submission(AppState::new(config), &["a.csv"]);
    let (state, _) = resolve(
        state,
        id,
        ResponseOutcome::Success {
            payload: b"PK".to_vec(),
            suggested_filename: "resultats.zip".to_string(),
        },
    );
    let state = select(state, &["b.csv"]);
    let (state, effects) = update(
        state,
        Msg::DownloadPublished {
            submission_id: id,
            object_url: "blob:uploader/3".to_string(),
            auto_triggered: false,
        },
    );

    assert_eq!(
        effects,
        vec![Effect::DiscardDownload {
            object_url: "blob:uploader/3".to_string()
        }]
    );
    assert_eq!(state.status(), &StatusView::Empty);
}

#[test]
fn reset_clears_selection_and_outcome() {
    init_logging();
    let (state, id) = start_submission(AppState::default(), &["a.csv"]);
    let (state, _) = resolve(
        state,
        id,
        ResponseOutcome::ServerError {
            message: "x".to_string(),
        },
    );
    let state = finish(state, id);
    let (state, effects) = update(state, Msg::Reset);

    assert!(effects.is_empty());
    assert!(state.selection().is_empty());
    assert_eq!(state.status(), &StatusView::Empty);
    assert_eq!(state.ui_state(), UiState::Idle);
}

#[test]
fn link_delivery_failure_after_cleanup_keeps_trigger_enabled() {
    init_logging();
    let (state, id) = link_state();
    let (state, _) = update(
        state,
        Msg::DownloadActivated {
            object_url: "blob:uploader/9".to_string(),
        },
    );
    let (state, effects) = update(
        state,
        Msg::DeliveryFailed {
            submission_id: id,
            message: "read-only directory".to_string(),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.ui_state(), UiState::Idle);
    assert!(state.trigger_enabled());
    assert_eq!(
        state.status(),
        &StatusView::Failed {
            kind: FailureKind::Delivery,
            message: "read-only directory".to_string(),
        }
    );
}
