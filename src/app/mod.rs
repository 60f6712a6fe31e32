mod controller;
mod state;
mod ui;

pub use controller::{RepaintHook, SubmitOutcome, UploadController};
pub use state::{
    UploadPhase, UploadState, NOTICE_NO_FILE, STATUS_CONNECTION_FAILED, STATUS_READ_FAILED,
    STATUS_SAVE_FAILED, STATUS_SERVER_FAILED, STATUS_SUCCESS,
};

use crate::upload::SelectedFile;
use eframe::{egui, App};
use tracing::{info, warn};

pub struct SentimentUploader {
    controller: UploadController,
    selected_file: Option<SelectedFile>,
    error_message: Option<String>,
}

impl SentimentUploader {
    pub fn new(_cc: &eframe::CreationContext<'_>, controller: UploadController) -> Self {
        info!("Initializing sentiment uploader for {}", controller.endpoint());
        Self {
            controller,
            selected_file: None,
            error_message: None,
        }
    }

    pub fn select_file(&mut self, path: std::path::PathBuf) {
        match SelectedFile::from_path(&path) {
            Ok(file) => {
                info!("Selected '{}' ({} bytes)", file.name, file.size);
                self.selected_file = Some(file);
                self.error_message = None;
            }
            Err(e) => {
                warn!("Cannot use selected file: {}", e);
                self.selected_file = None;
                self.error_message = Some(format!("Tidak dapat membuka {}", path.display()));
            }
        }
    }

    pub fn submit(&mut self, ctx: &egui::Context) {
        let repaint_ctx = ctx.clone();
        let repaint: RepaintHook = Box::new(move || repaint_ctx.request_repaint());
        self.controller
            .handle_submit(self.selected_file.clone(), Some(repaint));
    }

    pub fn open_result(&mut self) {
        let Some(path) = self.controller.state().saved_to().cloned() else {
            return;
        };
        if let Err(e) = open::that(&path) {
            warn!("Failed to open {}: {}", path.display(), e);
            self.error_message = Some(format!("Tidak dapat membuka {}", path.display()));
        }
    }
}

impl App for SentimentUploader {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.controller.poll_events() {
            ctx.request_repaint();
        }
        self.render(ctx);
    }
}
