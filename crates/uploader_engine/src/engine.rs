use std::panic::AssertUnwindSafe;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use futures_util::FutureExt;
use uploader_core::{transport_error, FileSelection, SubmissionId};
use uploader_logging::uploader_error;

use crate::submit::{ReqwestSubmitter, SubmitSettings, Submitter};
use crate::{EngineError, EngineEvent};

enum EngineCommand {
    Submit {
        submission_id: SubmissionId,
        selection: FileSelection,
    },
}

/// Runs submissions on a background thread that owns a tokio runtime.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: SubmitSettings) -> Result<Self, EngineError> {
        let submitter = Arc::new(ReqwestSubmitter::new(settings)?);
        Self::with_submitter(submitter)
    }

    pub fn with_submitter(submitter: Arc<dyn Submitter>) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let submitter = submitter.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(submitter.as_ref(), command, event_tx).await;
                });
            }
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn submit(&self, submission_id: SubmissionId, selection: FileSelection) {
        let _ = self.cmd_tx.send(EngineCommand::Submit {
            submission_id,
            selection,
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_command(
    submitter: &dyn Submitter,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Submit {
            submission_id,
            selection,
        } => {
            // A panicking submitter must still produce an outcome, otherwise
            // the UI would stay in Submitting forever.
            let outcome = AssertUnwindSafe(submitter.submit(submission_id, &selection))
                .catch_unwind()
                .await
                .unwrap_or_else(|_| {
                    uploader_error!("Submitter panicked during submission {}", submission_id);
                    transport_error("the upload task stopped unexpectedly")
                });
            let _ = event_tx.send(EngineEvent::SubmissionCompleted {
                submission_id,
                outcome,
            });
        }
    }
}
