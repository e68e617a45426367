use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{Context, Result};
use uploader_core::binder::{
    BoundControls, ControlBinder, EventDisposition, HostEvent, HostPage, Trigger,
};
use uploader_core::{
    update, AppState, AppViewModel, FileHandle, Msg, ResponseOutcome, StatusView, SubmissionId,
};
use uploader_engine::{DownloadStore, EngineEvent, EngineHandle};
use uploader_logging::{uploader_error, uploader_info, uploader_warn};

use super::config::AppConfig;
use super::effects::{CycleGuard, EffectRunner};

const ENGINE_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A bound page plus the orchestrator driving it.
pub struct App<P: HostPage> {
    page: P,
    binder: ControlBinder,
    state: AppState,
    runner: EffectRunner,
    msg_tx: mpsc::Sender<Msg>,
    msg_rx: mpsc::Receiver<Msg>,
}

/// Binds `page` and starts the engine. Taking the page by value means a page
/// can be initialized once.
///
/// When no trigger can be found, integrator guidance is rendered on the page
/// and the `BindError` is returned.
pub fn initialize<P: HostPage>(config: &AppConfig, mut page: P) -> Result<App<P>> {
    let mut binder = match ControlBinder::resolve(&mut page, &config.lookup, config.labels.clone()) {
        Ok(binder) => binder,
        Err(err) => {
            ControlBinder::render_diagnostic(&mut page, &config.lookup, &err);
            return Err(err.into());
        }
    };

    let engine =
        EngineHandle::new(config.submit_settings()).context("failed to start the upload engine")?;

    let (msg_tx, msg_rx) = mpsc::channel();
    let tx = msg_tx.clone();
    binder.on_triggered(move || {
        let _ = tx.send(Msg::TriggerFired);
    });
    let tx = msg_tx.clone();
    binder.on_selection(move |files| {
        let _ = tx.send(Msg::FilesSelected(files));
    });
    let tx = msg_tx.clone();
    binder.on_link_activated(move |object_url| {
        let _ = tx.send(Msg::DownloadActivated { object_url });
    });

    let store = DownloadStore::new(config.output_dir.clone());
    let runner = EffectRunner::new(engine, store, msg_tx.clone(), config.release_delay());

    let mut app = App {
        page,
        binder,
        state: AppState::new(config.orchestrator()),
        runner,
        msg_tx,
        msg_rx,
    };
    app.render();
    uploader_info!("Uploader ready, posting to {}", config.endpoint);
    Ok(app)
}

impl<P: HostPage> App<P> {
    pub fn controls(&self) -> &BoundControls {
        self.binder.controls()
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    #[cfg(test)]
    pub fn downloads(&self) -> &DownloadStore {
        self.runner.store()
    }

    pub fn is_submitting(&self) -> bool {
        self.state.in_flight().is_some()
    }

    /// Entry point for everything the host reports.
    pub fn handle_event(&mut self, event: HostEvent) -> EventDisposition {
        let disposition = self.binder.handle_event(event);
        self.process_pending_messages();
        disposition
    }

    /// The event a user activating the bound trigger produces.
    pub fn trigger_event(&self) -> HostEvent {
        match &self.controls().trigger {
            Trigger::Button(button) | Trigger::ButtonInForm { button, .. } => HostEvent::Click {
                element: button.clone(),
            },
            Trigger::Form(form) => HostEvent::Submit {
                element: form.clone(),
            },
        }
    }

    /// Selects `files` (when given), activates the trigger and waits for the
    /// cycle to settle. There is no upper bound on the wait.
    pub fn run_once(&mut self, files: Vec<FileHandle>) -> AppViewModel {
        if !files.is_empty() {
            match self.controls().file_input.clone() {
                Some(element) => {
                    self.handle_event(HostEvent::FilesChanged { element, files });
                }
                None => uploader_warn!("Page has no file input; ignoring {} file(s)", files.len()),
            }
        }
        let trigger = self.trigger_event();
        self.handle_event(trigger);
        while self.is_submitting() {
            self.pump_engine(ENGINE_POLL_INTERVAL);
        }
        self.view()
    }

    /// Activates the download link on screen. False when there is none.
    pub fn activate_download_link(&mut self) -> bool {
        let href = match self.state.status() {
            StatusView::DownloadReady {
                object_url,
                auto_triggered: false,
                ..
            } => object_url.clone(),
            _ => return false,
        };
        self.handle_event(HostEvent::LinkActivated { href });
        true
    }

    /// Waits up to `timeout` for the engine. Returns true when a submission
    /// completed.
    pub fn pump_engine(&mut self, timeout: Duration) -> bool {
        match self.runner.engine().recv_timeout(timeout) {
            Some(EngineEvent::SubmissionCompleted {
                submission_id,
                outcome,
            }) => {
                self.complete_submission(submission_id, outcome);
                true
            }
            None => false,
        }
    }

    /// Waits for pending releases and hands the page back.
    pub fn shutdown(mut self) -> P {
        self.runner.wait_for_releases();
        self.page
    }

    /// Resolves the cycle and ends it. A panic while delivering or rendering
    /// the outcome still ends the cycle before it propagates.
    fn complete_submission(&mut self, submission_id: SubmissionId, outcome: ResponseOutcome) {
        let resolved = panic::catch_unwind(AssertUnwindSafe(|| {
            uploader_logging::with_submission(submission_id, || {
                let _cycle = CycleGuard::new(self.msg_tx.clone(), submission_id);
                self.dispatch_msg(Msg::SubmissionResolved {
                    submission_id,
                    outcome,
                });
                self.process_pending_messages();
            })
        }));
        // Picks up the guard's CycleFinished.
        self.process_pending_messages();
        if let Err(payload) = resolved {
            uploader_error!("Submission {} failed while showing its outcome", submission_id);
            panic::resume_unwind(payload);
        }
    }

    fn process_pending_messages(&mut self) {
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.dispatch_msg(msg);
        }
    }

    fn dispatch_msg(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        self.state = state;
        if was_dirty {
            self.render();
        }
        self.runner.run(effects);
    }

    fn render(&mut self) {
        let view = self.state.view();
        self.binder.render(&mut self.page, &view);
    }
}

/// Reads the files to upload, keeping only their base names.
pub fn read_files(paths: &[PathBuf]) -> Result<Vec<FileHandle>> {
    paths
        .iter()
        .map(|path| {
            let content =
                fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            Ok(FileHandle::new(name, content))
        })
        .collect()
}
