use crate::upload::{FailureKind, UploadEvent, UploadOutcome};
use std::path::PathBuf;

pub const NOTICE_NO_FILE: &str = "Pilih file terlebih dahulu";
pub const STATUS_SUCCESS: &str = "Selesai ✔ File berhasil diproses";
pub const STATUS_SERVER_FAILED: &str = "Gagal memproses file ❌";
pub const STATUS_CONNECTION_FAILED: &str = "Koneksi ke server gagal ❌";
pub const STATUS_READ_FAILED: &str = "Gagal membaca file ❌";
pub const STATUS_SAVE_FAILED: &str = "Gagal menyimpan hasil ❌";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UploadPhase {
    #[default]
    Idle,
    Uploading,
    Success {
        saved_to: PathBuf,
    },
    ServerError {
        status: u16,
    },
    NetworkError,
    ReadError,
    SaveError,
}

impl UploadPhase {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, UploadPhase::Idle | UploadPhase::Uploading)
    }
}

#[derive(Debug, Clone, Default)]
pub struct UploadState {
    pub phase: UploadPhase,
    /// Fill of the progress bar, 0.0 to 1.0.
    pub progress: f32,
    pub status_text: String,
    /// Blocking notice shown instead of starting an upload.
    pub notice: Option<String>,
}

impl UploadState {
    pub fn is_uploading(&self) -> bool {
        self.phase == UploadPhase::Uploading
    }

    pub fn begin(&mut self) {
        self.phase = UploadPhase::Uploading;
        self.progress = 0.0;
        self.status_text = progress_text(0.0);
        self.notice = None;
    }

    pub fn reject_missing_file(&mut self) {
        self.notice = Some(NOTICE_NO_FILE.to_string());
    }

    pub fn get_progress_percentage(&self) -> f32 {
        self.progress * 100.0
    }

    pub fn saved_to(&self) -> Option<&PathBuf> {
        match &self.phase {
            UploadPhase::Success { saved_to } => Some(saved_to),
            _ => None,
        }
    }

    pub fn apply(&mut self, event: &UploadEvent) {
        match event {
            UploadEvent::Progress(progress) => {
                if !self.is_uploading() {
                    return;
                }
                let fraction = progress.percent() / 100.0;
                if fraction > self.progress {
                    self.progress = fraction;
                }
                self.status_text = progress_text(self.get_progress_percentage());
            }
            UploadEvent::Finished(UploadOutcome::Saved(path)) => {
                self.phase = UploadPhase::Success {
                    saved_to: path.clone(),
                };
                self.progress = 1.0;
                self.status_text = STATUS_SUCCESS.to_string();
            }
            UploadEvent::Finished(UploadOutcome::Failed(kind)) => {
                let (phase, text) = match kind {
                    FailureKind::Server(status) => {
                        (UploadPhase::ServerError { status: *status }, STATUS_SERVER_FAILED)
                    }
                    FailureKind::Transport => (UploadPhase::NetworkError, STATUS_CONNECTION_FAILED),
                    FailureKind::Read => (UploadPhase::ReadError, STATUS_READ_FAILED),
                    FailureKind::Save => (UploadPhase::SaveError, STATUS_SAVE_FAILED),
                };
                self.phase = phase;
                self.status_text = text.to_string();
            }
        }
    }
}

fn progress_text(percent: f32) -> String {
    format!("Upload {}%", percent.round() as u32)
}
