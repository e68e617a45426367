use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use uploader_core::{Effect, Msg, SubmissionId};
use uploader_engine::{DownloadError, DownloadStore, EngineHandle};
use uploader_logging::{uploader_debug, uploader_error, uploader_warn};

/// Executes effects emitted by `update` against the engine and the download
/// store. Follow-up results come back as messages on `msg_tx`.
pub struct EffectRunner {
    engine: EngineHandle,
    store: DownloadStore,
    msg_tx: mpsc::Sender<Msg>,
    release_delay: Duration,
    pending_releases: Vec<thread::JoinHandle<bool>>,
}

impl EffectRunner {
    pub fn new(
        engine: EngineHandle,
        store: DownloadStore,
        msg_tx: mpsc::Sender<Msg>,
        release_delay: Duration,
    ) -> Self {
        Self {
            engine,
            store,
            msg_tx,
            release_delay,
            pending_releases: Vec::new(),
        }
    }

    pub fn engine(&self) -> &EngineHandle {
        &self.engine
    }

    #[cfg(test)]
    pub fn store(&self) -> &DownloadStore {
        &self.store
    }

    pub fn run(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Submit {
                    submission_id,
                    selection,
                } => {
                    uploader_debug!("Handing submission {} to the engine", submission_id);
                    self.engine.submit(submission_id, selection);
                }
                Effect::PublishDownload {
                    submission_id,
                    payload,
                    filename,
                    auto_trigger,
                } => self.publish(submission_id, payload, &filename, auto_trigger),
                Effect::TriggerDownload {
                    submission_id,
                    object_url,
                } => {
                    if let Err(err) = self.deliver(&object_url) {
                        self.report_delivery_failure(submission_id, &err);
                    }
                }
                Effect::DiscardDownload { object_url } => {
                    if self.store.release(&object_url) {
                        uploader_debug!("Discarded unused download {}", object_url);
                    }
                }
            }
        }
    }

    fn publish(
        &mut self,
        submission_id: SubmissionId,
        payload: Vec<u8>,
        filename: &str,
        auto_trigger: bool,
    ) {
        let object_url = self.store.create_object_url(payload, filename);
        if auto_trigger {
            if let Err(err) = self.deliver(&object_url) {
                self.report_delivery_failure(submission_id, &err);
                return;
            }
        }
        self.send(Msg::DownloadPublished {
            submission_id,
            object_url,
            auto_triggered: auto_trigger,
        });
    }

    /// Writes the object to disk and schedules its release. A failed write
    /// releases the object at once.
    fn deliver(&mut self, object_url: &str) -> Result<PathBuf, DownloadError> {
        match self.store.trigger_download(object_url) {
            Ok(path) => {
                let release = self
                    .store
                    .schedule_release(object_url.to_string(), self.release_delay);
                self.pending_releases.push(release);
                Ok(path)
            }
            Err(err) => {
                self.store.release(object_url);
                Err(err)
            }
        }
    }

    fn report_delivery_failure(&self, submission_id: SubmissionId, err: &DownloadError) {
        uploader_error!("Download failed: {}", err);
        self.send(Msg::DeliveryFailed {
            submission_id,
            message: err.to_string(),
        });
    }

    fn send(&self, msg: Msg) {
        if self.msg_tx.send(msg).is_err() {
            uploader_warn!("Dispatch loop is gone; dropping message");
        }
    }

    /// Blocks until every scheduled release has run.
    pub fn wait_for_releases(&mut self) {
        for release in self.pending_releases.drain(..) {
            if release.join().is_err() {
                uploader_warn!("A release timer panicked");
            }
        }
    }
}

/// Reports the end of a submission cycle when dropped, so the trigger comes
/// back even if delivering or rendering the outcome panics.
pub struct CycleGuard {
    msg_tx: mpsc::Sender<Msg>,
    submission_id: SubmissionId,
}

impl CycleGuard {
    pub fn new(msg_tx: mpsc::Sender<Msg>, submission_id: SubmissionId) -> Self {
        Self {
            msg_tx,
            submission_id,
        }
    }
}

impl Drop for CycleGuard {
    fn drop(&mut self) {
        let _ = self.msg_tx.send(Msg::CycleFinished {
            submission_id: self.submission_id,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_reports_cycle_end_on_panic() {
        let (tx, rx) = mpsc::channel();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            let _guard = CycleGuard::new(tx, 4);
            panic!("render failed");
        }));

        assert!(result.is_err());
        assert_eq!(
            rx.try_recv().unwrap(),
            Msg::CycleFinished { submission_id: 4 }
        );
    }
}
