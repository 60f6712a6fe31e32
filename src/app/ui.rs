use super::state::UploadPhase;
use super::SentimentUploader;
use crate::utils::file_size::format_size;
use eframe::egui::{self, Align2, Color32, RichText};
use rfd::FileDialog;

const ACCENT: Color32 = Color32::from_rgb(161, 89, 225);
const SUCCESS: Color32 = Color32::from_rgb(0, 180, 0);
const FAILURE: Color32 = Color32::from_rgb(220, 50, 50);

impl SentimentUploader {
    pub fn render(&mut self, ctx: &egui::Context) {
        let blocked = self.controller.state().notice.is_some();
        let mut pick_clicked = false;
        let mut submit_clicked = false;
        let mut open_clicked = false;

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(!blocked, |ui| {
                ui.add_space(20.0);
                ui.vertical_centered(|ui| {
                    ui.heading("Sentiment Batch Uploader");
                    ui.add_space(5.0);
                    ui.label(
                        RichText::new("Unggah file CSV/XLSX berisi kolom 'text' untuk diprediksi")
                            .color(ui.visuals().text_color().gamma_multiply(0.7)),
                    );
                });

                ui.add_space(20.0);

                ui.group(|ui| {
                    ui.horizontal(|ui| {
                        if ui.button("📁 Pilih File").clicked() {
                            pick_clicked = true;
                        }
                        match &self.selected_file {
                            Some(file) => {
                                ui.label(format!("{} ({})", file.name, format_size(file.size)));
                            }
                            None => {
                                ui.label(
                                    RichText::new("Belum ada file dipilih")
                                        .color(ui.visuals().text_color().gamma_multiply(0.6)),
                                );
                            }
                        }
                    });
                });

                ui.add_space(20.0);

                ui.vertical_centered(|ui| {
                    let uploading = self.controller.state().is_uploading();
                    ui.add_enabled_ui(!uploading, |ui| {
                        let button = egui::Button::new("📤 Upload & Proses")
                            .min_size(egui::vec2(200.0, 40.0));
                        if ui.add(button).clicked() {
                            submit_clicked = true;
                        }
                    });
                });

                ui.add_space(20.0);

                let state = self.controller.state();
                if state.phase != UploadPhase::Idle {
                    ui.group(|ui| {
                        let progress_bar = egui::ProgressBar::new(state.progress)
                            .show_percentage()
                            .animate(state.is_uploading())
                            .fill(ACCENT);
                        ui.add(progress_bar);

                        let color = match state.phase {
                            UploadPhase::Success { .. } => SUCCESS,
                            UploadPhase::Uploading | UploadPhase::Idle => ui.visuals().text_color(),
                            _ => FAILURE,
                        };
                        ui.colored_label(color, &state.status_text);

                        if let Some(saved_to) = state.saved_to() {
                            ui.horizontal(|ui| {
                                ui.label(format!("Disimpan ke {}", saved_to.display()));
                                if ui.button("📂 Buka Hasil").clicked() {
                                    open_clicked = true;
                                }
                            });
                        }
                    });
                }

                if let Some(error) = &self.error_message {
                    ui.add_space(10.0);
                    ui.vertical_centered(|ui| {
                        ui.colored_label(FAILURE, error);
                    });
                }
            });
        });

        self.render_notice(ctx);

        if pick_clicked {
            if let Some(path) = FileDialog::new()
                .add_filter("CSV / Excel", &["csv", "xlsx"])
                .pick_file()
            {
                self.select_file(path);
            }
        }
        if submit_clicked {
            self.submit(ctx);
        }
        if open_clicked {
            self.open_result();
        }
    }

    fn render_notice(&mut self, ctx: &egui::Context) {
        let Some(notice) = self.controller.state().notice.clone() else {
            return;
        };

        let mut dismissed = false;
        egui::Window::new("Perhatian")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(notice);
                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    if ui.button("OK").clicked() {
                        dismissed = true;
                    }
                });
            });

        if dismissed {
            self.controller.dismiss_notice();
        }
    }
}
