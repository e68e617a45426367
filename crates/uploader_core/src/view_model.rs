use crate::UiState;

/// What the status/output surface currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusView {
    #[default]
    Empty,
    /// Trigger fired with no files selected.
    SelectionRequired,
    Busy,
    /// Success payload received, object URL not yet available.
    Preparing { filename: String },
    DownloadReady {
        filename: String,
        object_url: String,
        auto_triggered: bool,
    },
    Failed { kind: FailureKind, message: String },
    /// Successful status but not the expected payload; shown verbatim.
    Unexpected { raw_text: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Server,
    Transport,
    Delivery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerView {
    pub enabled: bool,
    pub busy: bool,
}

impl Default for TriggerView {
    fn default() -> Self {
        Self {
            enabled: true,
            busy: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub ui: UiState,
    pub selection_count: usize,
    pub first_file_name: Option<String>,
    pub status: StatusView,
    pub trigger: TriggerView,
    pub expected_content_type: String,
    /// Artifact label of the payload profile, e.g. `ZIP`.
    pub payload_label: String,
    pub dirty: bool,
}
