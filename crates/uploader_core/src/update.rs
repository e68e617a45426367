use uploader_logging::{uploader_debug, uploader_info, uploader_warn};

use crate::view_model::{FailureKind, StatusView};
use crate::{
    AppState, DeliveryMode, Effect, FileSelection, Msg, ResponseOutcome, SubmissionId, UiState,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FilesSelected(files) => {
            // A new selection always invalidates the previous result, even
            // while a request is in flight. The request itself is untouched.
            let effects: Vec<Effect> = state.clear_outcome().into_iter().collect();
            state.replace_selection(files);
            if state.ui_state() != UiState::Submitting {
                state.set_ui(UiState::Idle);
            }
            effects
        }
        Msg::TriggerFired => {
            if !state.trigger_enabled() {
                uploader_debug!("Trigger fired while disabled; ignoring");
                return (state, Vec::new());
            }
            let Some(selection) = FileSelection::new(state.selection().to_vec()) else {
                state.set_status(StatusView::SelectionRequired);
                return (state, Vec::new());
            };
            let mut effects: Vec<Effect> = state.clear_outcome().into_iter().collect();
            let submission_id = state.begin_submission();
            uploader_info!(
                "Submitting {} file(s), {} bytes as submission {}",
                selection.len(),
                selection.total_bytes(),
                submission_id
            );
            effects.push(Effect::Submit {
                submission_id,
                selection,
            });
            effects
        }
        Msg::SubmissionResolved {
            submission_id,
            outcome,
        } => {
            if state.in_flight() != Some(submission_id) {
                uploader_warn!(
                    "Dropping {} outcome for submission {} (in flight: {:?})",
                    outcome.kind(),
                    submission_id,
                    state.in_flight()
                );
                return (state, Vec::new());
            }
            state.resolve_submission(submission_id);
            apply_outcome(&mut state, submission_id, outcome)
        }
        Msg::DownloadPublished {
            submission_id,
            object_url,
            auto_triggered,
        } => {
            let filename = match state.status() {
                StatusView::Preparing { filename }
                    if state.last_resolved() == Some(submission_id) =>
                {
                    Some(filename.clone())
                }
                _ => None,
            };
            match filename {
                Some(filename) => {
                    state.set_download(submission_id, object_url.clone(), auto_triggered);
                    state.set_status(StatusView::DownloadReady {
                        filename,
                        object_url,
                        auto_triggered,
                    });
                    Vec::new()
                }
                // Outcome was cleared before the object existed.
                None if auto_triggered => Vec::new(),
                None => vec![Effect::DiscardDownload { object_url }],
            }
        }
        Msg::DeliveryFailed {
            submission_id,
            message,
        } => {
            if state.last_resolved() == Some(submission_id) {
                // Link downloads fail after cleanup; only an unfinished
                // cycle changes state.
                if state.ui_state() == UiState::ResolvedSuccess {
                    state.set_ui(UiState::ResolvedError);
                }
                state.set_status(StatusView::Failed {
                    kind: FailureKind::Delivery,
                    message,
                });
            }
            Vec::new()
        }
        Msg::DownloadActivated { object_url } => match state.activate_download(&object_url) {
            Some(submission_id) => vec![Effect::TriggerDownload {
                submission_id,
                object_url,
            }],
            None => {
                uploader_debug!("Ignoring activation of stale link {}", object_url);
                Vec::new()
            }
        },
        Msg::CycleFinished { submission_id } => {
            let resolved = state.in_flight().is_none()
                && state.last_resolved() == Some(submission_id)
                && !state.trigger_enabled();
            if resolved {
                state.finish_cycle();
            }
            Vec::new()
        }
        Msg::Reset => {
            let effects: Vec<Effect> = state.clear_outcome().into_iter().collect();
            state.clear_selection();
            if state.ui_state() != UiState::Submitting {
                state.set_ui(UiState::Idle);
            }
            effects
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn apply_outcome(
    state: &mut AppState,
    submission_id: SubmissionId,
    outcome: ResponseOutcome,
) -> Vec<Effect> {
    match outcome {
        ResponseOutcome::Success {
            payload,
            suggested_filename,
        } => {
            uploader_info!(
                "Submission {} succeeded: {} bytes as {}",
                submission_id,
                payload.len(),
                suggested_filename
            );
            state.set_ui(UiState::ResolvedSuccess);
            state.set_status(StatusView::Preparing {
                filename: suggested_filename.clone(),
            });
            vec![Effect::PublishDownload {
                submission_id,
                payload,
                filename: suggested_filename,
                auto_trigger: state.config().delivery == DeliveryMode::AutoDownload,
            }]
        }
        ResponseOutcome::ServerError { message } => {
            uploader_warn!("Submission {} rejected by server: {}", submission_id, message);
            state.set_ui(UiState::ResolvedError);
            state.set_status(StatusView::Failed {
                kind: FailureKind::Server,
                message,
            });
            Vec::new()
        }
        ResponseOutcome::UnexpectedContent { raw_text } => {
            uploader_warn!(
                "Submission {} returned unexpected content ({} chars)",
                submission_id,
                raw_text.len()
            );
            state.set_ui(UiState::ResolvedError);
            state.set_status(StatusView::Unexpected { raw_text });
            Vec::new()
        }
        ResponseOutcome::TransportError { message } => {
            uploader_warn!("Submission {} failed in transport: {}", submission_id, message);
            state.set_ui(UiState::ResolvedError);
            state.set_status(StatusView::Failed {
                kind: FailureKind::Transport,
                message,
            });
            Vec::new()
        }
    }
}
