use crate::config::AppConfig;
use crate::error::UploadError;
use crate::upload::types::{
    not_a_regular_file, EventSink, SelectedFile, TransferProgress, UploadEvent, UploadOutcome,
    FILE_FIELD, RESULT_FILE_NAME,
};
use bytes::Bytes;
use futures_util::TryStreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, StatusCode, Url};
use serde::Deserialize;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio_util::io::ReaderStream;
use tracing::{debug, info, warn};

const CHUNK_SIZE: usize = 64 * 1024;
const MAX_DETAIL_LEN: usize = 200;

/// Error payload of the prediction API (`{"error": ...}`, or FastAPI's `{"detail": ...}`).
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(alias = "detail")]
    error: serde_json::Value,
}

#[derive(Debug, Clone)]
pub struct FileSender {
    client: Client,
    endpoint: Url,
    output_dir: PathBuf,
}

impl FileSender {
    pub fn new(config: &AppConfig) -> Result<Self, UploadError> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.api_url.clone(),
            output_dir: config.output_dir.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn result_path(&self) -> PathBuf {
        self.output_dir.join(RESULT_FILE_NAME)
    }

    /// Uploads `file` and saves the answer. Every call ends with exactly one
    /// `UploadEvent::Finished` on `sink`, carrying the returned outcome.
    pub async fn send_file(&self, file: &SelectedFile, sink: Arc<dyn EventSink>) -> UploadOutcome {
        info!("Uploading '{}' to {}", file.name, self.endpoint);

        let outcome = match self.upload(file, Arc::clone(&sink)).await {
            Ok(saved_to) => {
                info!("Result of '{}' saved to {}", file.name, saved_to.display());
                UploadOutcome::Saved(saved_to)
            }
            Err(err) => {
                warn!("Upload of '{}' failed: {}", file.name, err);
                UploadOutcome::Failed(err.kind())
            }
        };

        sink.emit(UploadEvent::Finished(outcome.clone()));
        outcome
    }

    async fn upload(&self, file: &SelectedFile, sink: Arc<dyn EventSink>) -> Result<PathBuf, UploadError> {
        let read_err = |source| UploadError::Read {
            path: file.path.clone(),
            source,
        };

        let handle = tokio::fs::File::open(&file.path).await.map_err(read_err)?;
        let metadata = handle.metadata().await.map_err(read_err)?;
        if !metadata.is_file() {
            return Err(read_err(not_a_regular_file()));
        }
        let total = metadata.len();

        let read_failure = Arc::new(Mutex::new(None));
        let stream = progress_stream(handle, total, sink, Arc::clone(&read_failure));

        let mime = mime_guess::from_path(&file.path).first_or_octet_stream();
        let part = Part::stream_with_length(Body::wrap_stream(stream), total)
            .file_name(file.name.clone())
            .mime_str(mime.essence_str())?;
        let form = Form::new().part(FILE_FIELD, part);

        let sent = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await;
        let response = match sent {
            Ok(response) => response,
            // A body that failed on the local disk is a read error, not a network one.
            Err(err) => match take_read_failure(&read_failure) {
                Some(source) => return Err(read_err(source)),
                None => return Err(err.into()),
            },
        };

        let status = response.status();
        debug!("prediction API answered {}", status);
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(UploadError::Server {
                status,
                detail: error_detail(&body),
            });
        }

        let payload = response.bytes().await?;
        self.save(&payload).await
    }

    /// Writes through a `.part` file so a failed write never leaves a truncated result.
    async fn save(&self, payload: &[u8]) -> Result<PathBuf, UploadError> {
        let target = self.result_path();
        let partial = partial_path(&target);
        let save_err = |source| UploadError::Save {
            path: target.clone(),
            source,
        };

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(save_err)?;
        tokio::fs::write(&partial, payload).await.map_err(save_err)?;
        if let Err(source) = tokio::fs::rename(&partial, &target).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(save_err(source));
        }

        debug!("wrote {} bytes to {}", payload.len(), target.display());
        Ok(target)
    }
}

type ReadFailure = Arc<Mutex<Option<io::Error>>>;

/// File content as a body stream. Reports progress per chunk and stashes the
/// first read error into `read_failure`.
fn progress_stream(
    handle: tokio::fs::File,
    total: u64,
    sink: Arc<dyn EventSink>,
    read_failure: ReadFailure,
) -> impl futures_util::Stream<Item = io::Result<Bytes>> + Send + Sync + 'static {
    let mut sent = 0u64;
    let mut next_log_percent = 10u32;
    ReaderStream::with_capacity(handle, CHUNK_SIZE)
        .inspect_ok(move |chunk| {
            sent += chunk.len() as u64;
            if total == 0 {
                return;
            }

            let progress = TransferProgress { sent, total };
            let percent = progress.percent() as u32;
            if percent >= next_log_percent {
                debug!("upload_progress: percent={} bytes={}/{}", percent, sent, total);
                next_log_percent = (percent / 10 + 1) * 10;
            }
            sink.emit(UploadEvent::Progress(progress));
        })
        .inspect_err(move |err| {
            warn!("reading upload body failed: {}", err);
            if let Ok(mut slot) = read_failure.lock() {
                slot.get_or_insert_with(|| io::Error::new(err.kind(), err.to_string()));
            }
        })
}

fn take_read_failure(read_failure: &ReadFailure) -> Option<io::Error> {
    read_failure.lock().ok()?.take()
}

fn partial_path(target: &Path) -> PathBuf {
    let mut name = target.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

fn error_detail(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    let detail = match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            error: serde_json::Value::String(message),
        }) => message,
        Ok(ErrorBody { error }) => error.to_string(),
        Err(_) => body.to_string(),
    };
    Some(detail.chars().take(MAX_DETAIL_LEN).collect())
}
