use crate::{FileSelection, SubmissionId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Build a fresh multipart request from `selection` and send it.
    Submit {
        submission_id: SubmissionId,
        selection: FileSelection,
    },
    /// Turn a successful payload into an object URL, starting the download
    /// right away when `auto_trigger` is set.
    PublishDownload {
        submission_id: SubmissionId,
        payload: Vec<u8>,
        filename: String,
        auto_trigger: bool,
    },
    /// Start the download behind a rendered link, then release the object.
    TriggerDownload {
        submission_id: SubmissionId,
        object_url: String,
    },
    /// Release an object whose link was cleared before anyone used it.
    DiscardDownload { object_url: String },
}
