//! Command-line and environment configuration.

use crate::error::ConfigError;
use clap::Parser;
use std::path::PathBuf;
use url::Url;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/predict-csv";

#[derive(Debug, Parser)]
#[command(name = "sentiment-uploader", version)]
#[command(about = "Upload a CSV/XLSX file to the sentiment prediction API and save the result", long_about = None)]
pub struct Cli {
    /// Prediction endpoint the file is posted to.
    #[arg(long, env = "API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Directory the result file is written into.
    #[arg(long, env = "OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Upload this file without opening a window.
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_url: Url,
    pub output_dir: PathBuf,
}

impl AppConfig {
    pub fn new(api_url: &str, output_dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let parsed = Url::parse(api_url).map_err(|source| ConfigError::InvalidApiUrl {
            url: api_url.to_string(),
            source,
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(parsed.scheme().to_string()));
        }

        Ok(Self {
            api_url: parsed,
            output_dir: output_dir.into(),
        })
    }

    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        Self::new(&cli.api_url, cli.output_dir.clone())
    }
}
