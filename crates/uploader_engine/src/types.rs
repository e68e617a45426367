use std::io;

use thiserror::Error;
use uploader_core::{ResponseOutcome, SubmissionId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Exactly one per submitted request.
    SubmissionCompleted {
        submission_id: SubmissionId,
        outcome: ResponseOutcome,
    },
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] io::Error),
    #[error("failed to build http client: {0}")]
    Client(String),
    #[error("invalid endpoint {endpoint}: {message}")]
    InvalidEndpoint { endpoint: String, message: String },
}
