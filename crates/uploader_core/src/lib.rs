//! Uploader core: pure orchestrator state machine, response classification
//! and the control binder. No IO happens here.
pub mod binder;
mod disposition;
mod effect;
mod filename;
mod msg;
mod outcome;
mod payload;
mod selection;
mod state;
mod update;
mod view_model;

pub use disposition::{filename_from_disposition, suggested_filename};
pub use effect::Effect;
pub use filename::sanitize_download_name;
pub use msg::Msg;
pub use outcome::{classify, transport_error, HttpReply, ResponseOutcome};
pub use payload::{
    DeliveryMode, OrchestratorConfig, PayloadProfile, XLSX_CONTENT_TYPE, ZIP_CONTENT_TYPE,
};
pub use selection::{FileHandle, FileSelection};
pub use state::{AppState, SubmissionId, UiState};
pub use update::update;
pub use view_model::{AppViewModel, FailureKind, StatusView, TriggerView};
