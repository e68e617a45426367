//! Uploader engine: HTTP submission, background execution and download
//! delivery.
mod download;
mod engine;
mod persist;
mod submit;
mod types;

pub use download::{DownloadError, DownloadStore};
pub use engine::EngineHandle;
pub use persist::{ensure_output_dir, DownloadWriter, PersistError};
pub use submit::{ReqwestSubmitter, SubmitSettings, Submitter, DEFAULT_ENDPOINT, FILES_FIELD};
pub use types::{EngineError, EngineEvent};
