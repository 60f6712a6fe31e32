//! Desktop and headless client for the sentiment batch prediction API.
//!
//! A selected CSV/XLSX file is posted as `multipart/form-data`, upload
//! progress is reported as [`upload::UploadEvent`]s, and a successful answer
//! is saved as `hasil_prediksi.csv`.

pub mod app;
pub mod config;
pub mod error;
pub mod headless;
pub mod logging;
pub mod upload;
pub mod utils;
