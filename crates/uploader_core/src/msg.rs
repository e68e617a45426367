use crate::{FileHandle, ResponseOutcome, SubmissionId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User changed the file input; replaces the current selection.
    FilesSelected(Vec<FileHandle>),
    /// User activated the submission trigger (button click or form submit).
    TriggerFired,
    /// Transport finished a submission, successfully or not.
    SubmissionResolved {
        submission_id: SubmissionId,
        outcome: ResponseOutcome,
    },
    /// The download payload was turned into an object URL.
    DownloadPublished {
        submission_id: SubmissionId,
        object_url: String,
        auto_triggered: bool,
    },
    /// The download payload could not be handed to the user.
    DeliveryFailed {
        submission_id: SubmissionId,
        message: String,
    },
    /// User clicked the rendered download link.
    DownloadActivated { object_url: String },
    /// Cleanup after a resolved submission; always sent, whatever happened
    /// while the outcome was delivered.
    CycleFinished { submission_id: SubmissionId },
    /// User asked to start over.
    Reset,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
