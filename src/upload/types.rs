use crate::error::UploadError;
use std::path::{Path, PathBuf};

/// Multipart field the prediction API reads the upload from.
pub const FILE_FIELD: &str = "file";

/// Name the result is always saved under, whatever the input was called.
pub const RESULT_FILE_NAME: &str = "hasil_prediksi.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
}

impl SelectedFile {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, UploadError> {
        let path = path.as_ref();
        let read_err = |source| UploadError::Read {
            path: path.to_path_buf(),
            source,
        };
        let metadata = std::fs::metadata(path).map_err(read_err)?;
        if !metadata.is_file() {
            return Err(read_err(not_a_regular_file()));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            path: path.to_path_buf(),
            name,
            size: metadata.len(),
        })
    }
}

pub(crate) fn not_a_regular_file() -> std::io::Error {
    std::io::Error::other("not a regular file")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferProgress {
    pub sent: u64,
    pub total: u64,
}

impl TransferProgress {
    pub fn percent(&self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        ((self.sent as f64 / self.total as f64) * 100.0).clamp(0.0, 100.0) as f32
    }
}

/// Why a submission ended without a saved result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Read,
    Server(u16),
    Transport,
    Save,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Saved(PathBuf),
    Failed(FailureKind),
}

/// Zero or more `Progress` events, then exactly one `Finished`.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadEvent {
    Progress(TransferProgress),
    Finished(UploadOutcome),
}

impl UploadEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, UploadEvent::Finished(_))
    }
}

/// Receives events from an upload task. Implementations must not block.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: UploadEvent);
}

impl EventSink for std::sync::mpsc::Sender<UploadEvent> {
    fn emit(&self, event: UploadEvent) {
        // The receiver goes away when the window closes mid-upload.
        let _ = self.send(event);
    }
}
