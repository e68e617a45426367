//! Object URLs for downloaded payloads.
//!
//! A successful payload is parked under a `blob:uploader/<n>` URL until the
//! download starts, then released. Release is idempotent: the first call
//! frees the object, later calls report that nothing was left.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use bytes::Bytes;
use thiserror::Error;
use uploader_core::sanitize_download_name;
use uploader_logging::{uploader_debug, uploader_info};

use crate::persist::{DownloadWriter, PersistError};

const URL_PREFIX: &str = "blob:uploader/";

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("object url {0} is unknown or already released")]
    UnknownObject(String),
    #[error("refusing to write {0:?}: not a plain file name")]
    UnsafeName(String),
    #[error("failed to write download: {0}")]
    Persist(#[from] PersistError),
}

#[derive(Debug)]
struct StoredObject {
    payload: Bytes,
    filename: String,
}

#[derive(Debug, Default)]
struct StoreInner {
    next_id: u64,
    objects: HashMap<String, StoredObject>,
    released: u64,
}

#[derive(Debug, Clone)]
pub struct DownloadStore {
    inner: Arc<Mutex<StoreInner>>,
    writer: DownloadWriter,
}

impl DownloadStore {
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            inner: Arc::new(Mutex::new(StoreInner::default())),
            writer: DownloadWriter::new(output_dir),
        }
    }

    pub fn output_dir(&self) -> &Path {
        self.writer.dir()
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Parks `payload` under a fresh object URL. `filename` must already be
    /// a plain file name, as produced by `sanitize_download_name`.
    pub fn create_object_url(&self, payload: impl Into<Bytes>, filename: &str) -> String {
        let mut inner = self.lock();
        inner.next_id += 1;
        let url = format!("{URL_PREFIX}{}", inner.next_id);
        inner.objects.insert(
            url.clone(),
            StoredObject {
                payload: payload.into(),
                filename: filename.to_string(),
            },
        );
        uploader_debug!("Created {} for {}", url, filename);
        url
    }

    /// Writes the object behind `object_url` into the output directory and
    /// returns the written path. The object stays alive until released.
    pub fn trigger_download(&self, object_url: &str) -> Result<PathBuf, DownloadError> {
        let (payload, filename) = {
            let inner = self.lock();
            let object = inner
                .objects
                .get(object_url)
                .ok_or_else(|| DownloadError::UnknownObject(object_url.to_string()))?;
            (object.payload.clone(), object.filename.clone())
        };
        // Naming is decided upstream; a name that would change under
        // sanitizing is refused instead of being renamed here.
        if sanitize_download_name(&filename, "") != filename {
            return Err(DownloadError::UnsafeName(filename));
        }
        let path = self.writer.write(&filename, &payload)?;
        uploader_info!("Downloaded {} bytes to {}", payload.len(), path.display());
        Ok(path)
    }

    /// Frees the object. Returns false when it was already gone.
    pub fn release(&self, object_url: &str) -> bool {
        let mut inner = self.lock();
        if inner.objects.remove(object_url).is_some() {
            inner.released += 1;
            uploader_debug!("Released {}", object_url);
            true
        } else {
            false
        }
    }

    /// Releases `object_url` once `delay` has passed, leaving the download
    /// time to start first.
    pub fn schedule_release(&self, object_url: String, delay: Duration) -> thread::JoinHandle<bool> {
        let store = self.clone();
        thread::spawn(move || {
            thread::sleep(delay);
            store.release(&object_url)
        })
    }

    pub fn live_objects(&self) -> usize {
        self.lock().objects.len()
    }

    pub fn released_count(&self) -> u64 {
        self.lock().released
    }
}
