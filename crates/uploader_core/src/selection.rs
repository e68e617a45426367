/// One user-selected file: its display name and full content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    pub name: String,
    pub content: Vec<u8>,
}

impl FileHandle {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Ordered, non-empty set of files snapshotted for one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSelection {
    files: Vec<FileHandle>,
}

impl FileSelection {
    /// Returns `None` when `files` is empty.
    pub fn new(files: Vec<FileHandle>) -> Option<Self> {
        if files.is_empty() {
            None
        } else {
            Some(Self { files })
        }
    }

    pub fn files(&self) -> &[FileHandle] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    // Never empty, but clippy wants the pair.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.content.len() as u64).sum()
    }

    pub fn into_files(self) -> Vec<FileHandle> {
        self.files
    }
}
