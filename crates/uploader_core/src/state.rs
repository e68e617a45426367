use crate::view_model::{AppViewModel, StatusView, TriggerView};
use crate::{Effect, FileHandle, OrchestratorConfig};

pub type SubmissionId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UiState {
    #[default]
    Idle,
    Submitting,
    ResolvedSuccess,
    ResolvedError,
}

/// Object URL handed out for a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PublishedDownload {
    pub(crate) submission_id: SubmissionId,
    pub(crate) object_url: String,
    pub(crate) release_scheduled: bool,
}

/// Orchestrator state. Only `update` mutates it.
///
/// Invariant: the trigger is disabled from `TriggerFired` until the matching
/// `CycleFinished`; nothing else re-enables it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    config: OrchestratorConfig,
    ui: UiState,
    selection: Vec<FileHandle>,
    status: StatusView,
    trigger_enabled: bool,
    next_submission_id: SubmissionId,
    in_flight: Option<SubmissionId>,
    last_resolved: Option<SubmissionId>,
    download: Option<PublishedDownload>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(OrchestratorConfig::default())
    }
}

impl AppState {
    pub fn new(config: OrchestratorConfig) -> Self {
        Self {
            config,
            ui: UiState::Idle,
            selection: Vec::new(),
            status: StatusView::Empty,
            trigger_enabled: true,
            next_submission_id: 1,
            in_flight: None,
            last_resolved: None,
            download: None,
            dirty: false,
        }
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            ui: self.ui,
            selection_count: self.selection.len(),
            first_file_name: self.selection.first().map(|f| f.name.clone()),
            status: self.status.clone(),
            trigger: TriggerView {
                enabled: self.trigger_enabled,
                busy: self.ui == UiState::Submitting,
            },
            expected_content_type: self.config.payload.content_type.clone(),
            payload_label: self.config.payload.label.clone(),
            dirty: self.dirty,
        }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn ui_state(&self) -> UiState {
        self.ui
    }

    pub fn selection(&self) -> &[FileHandle] {
        &self.selection
    }

    pub fn status(&self) -> &StatusView {
        &self.status
    }

    pub fn trigger_enabled(&self) -> bool {
        self.trigger_enabled
    }

    pub fn in_flight(&self) -> Option<SubmissionId> {
        self.in_flight
    }

    pub fn last_resolved(&self) -> Option<SubmissionId> {
        self.last_resolved
    }

    /// Returns whether anything changed since the last call and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn set_ui(&mut self, ui: UiState) {
        if self.ui != ui {
            self.ui = ui;
            self.dirty = true;
        }
    }

    pub(crate) fn set_status(&mut self, status: StatusView) {
        if self.status != status {
            self.status = status;
            self.dirty = true;
        }
    }

    pub(crate) fn replace_selection(&mut self, files: Vec<FileHandle>) {
        self.selection = files;
        self.dirty = true;
    }

    pub(crate) fn clear_selection(&mut self) {
        if !self.selection.is_empty() {
            self.selection.clear();
            self.dirty = true;
        }
    }

    /// Clears the rendered outcome. Returns the discard effect for a link
    /// nobody activated.
    pub(crate) fn clear_outcome(&mut self) -> Option<Effect> {
        self.set_status(StatusView::Empty);
        let download = self.download.take()?;
        if download.release_scheduled {
            None
        } else {
            Some(Effect::DiscardDownload {
                object_url: download.object_url,
            })
        }
    }

    pub(crate) fn begin_submission(&mut self) -> SubmissionId {
        let id = self.next_submission_id;
        self.next_submission_id += 1;
        self.in_flight = Some(id);
        self.trigger_enabled = false;
        self.ui = UiState::Submitting;
        self.status = StatusView::Busy;
        self.dirty = true;
        id
    }

    pub(crate) fn resolve_submission(&mut self, submission_id: SubmissionId) {
        self.in_flight = None;
        self.last_resolved = Some(submission_id);
        self.dirty = true;
    }

    pub(crate) fn finish_cycle(&mut self) {
        self.trigger_enabled = true;
        self.ui = UiState::Idle;
        self.dirty = true;
    }

    pub(crate) fn set_download(
        &mut self,
        submission_id: SubmissionId,
        object_url: String,
        release_scheduled: bool,
    ) {
        self.download = Some(PublishedDownload {
            submission_id,
            object_url,
            release_scheduled,
        });
    }

    /// Marks the current link as activated and returns its submission.
    /// `None` when `object_url` is not the current link or its release is
    /// already scheduled.
    pub(crate) fn activate_download(&mut self, object_url: &str) -> Option<SubmissionId> {
        match self.download.as_mut() {
            Some(download) if download.object_url == object_url && !download.release_scheduled => {
                download.release_scheduled = true;
                Some(download.submission_id)
            }
            _ => None,
        }
    }
}
