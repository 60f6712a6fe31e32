use anyhow::{anyhow, Context, Result};
use clap::Parser;
use eframe::CreationContext;
use sentiment_uploader::app::{SentimentUploader, UploadController};
use sentiment_uploader::config::{AppConfig, Cli};
use sentiment_uploader::upload::FileSender;
use sentiment_uploader::{headless, logging};

fn main() -> Result<()> {
    logging::init_logging();

    let cli = Cli::parse();
    let config = AppConfig::from_cli(&cli)?;
    tracing::debug!("loaded config: {:?}", config);

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    let sender = FileSender::new(&config).context("failed to build HTTP client")?;
    let controller = UploadController::new(sender, runtime.handle().clone());

    match &cli.file {
        Some(path) => headless::run(controller, path),
        None => run_window(controller),
    }
}

fn run_window(controller: UploadController) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([560.0, 420.0])
            .with_min_inner_size([400.0, 320.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Sentiment Batch Uploader",
        options,
        Box::new(|cc: &CreationContext| Box::new(SentimentUploader::new(cc, controller))),
    )
    .map_err(|e| anyhow!("failed to open window: {e}"))
}
