//! Download files on disk.
//!
//! A payload is staged in a temp file inside the target directory, then
//! linked under its final name without replacing anything already there. A
//! taken name gets a numbered variant: `report (1).xlsx`, `report (2).xlsx`.

use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

const MAX_VARIANTS: u32 = 999;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("every numbered variant of {0} is taken")]
    NoFreeName(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Creates `dir` when it does not exist yet.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(PersistError::NotADirectory(dir.to_path_buf())),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(fs::create_dir_all(dir)?),
        Err(err) => Err(err.into()),
    }
}

#[derive(Debug, Clone)]
pub struct DownloadWriter {
    dir: PathBuf,
}

impl DownloadWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes `payload` as `filename`, or as its first free numbered variant,
    /// and returns the path written. Existing files are never replaced.
    pub fn write(&self, filename: &str, payload: &[u8]) -> Result<PathBuf, PersistError> {
        ensure_output_dir(&self.dir)?;

        let mut staged = NamedTempFile::new_in(&self.dir)?;
        staged.write_all(payload)?;
        staged.as_file().sync_all()?;

        for variant in 0..=MAX_VARIANTS {
            let target = self.dir.join(numbered_name(filename, variant));
            match staged.persist_noclobber(&target) {
                Ok(_) => return Ok(target),
                Err(err) if err.error.kind() == ErrorKind::AlreadyExists => staged = err.file,
                Err(err) => return Err(err.error.into()),
            }
        }
        Err(PersistError::NoFreeName(filename.to_string()))
    }
}

/// Variant 0 is the name itself; `report.xlsx` becomes `report (2).xlsx`.
fn numbered_name(filename: &str, variant: u32) -> String {
    if variant == 0 {
        return filename.to_string();
    }
    match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem} ({variant}).{ext}"),
        _ => format!("{filename} ({variant})"),
    }
}
