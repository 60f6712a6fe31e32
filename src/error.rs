use crate::upload::FailureKind;
use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("request to prediction API failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("prediction API answered {status}{}", .detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default())]
    Server {
        status: StatusCode,
        detail: Option<String>,
    },

    #[error("failed to save result to {}: {source}", .path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl UploadError {
    /// What the user gets to see; the details stay in the log.
    pub fn kind(&self) -> FailureKind {
        match self {
            UploadError::Read { .. } => FailureKind::Read,
            UploadError::Transport(_) => FailureKind::Transport,
            UploadError::Server { status, .. } => FailureKind::Server(status.as_u16()),
            UploadError::Save { .. } => FailureKind::Save,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid API URL {url:?}: {source}")]
    InvalidApiUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("API URL must use http or https, got {0:?}")]
    UnsupportedScheme(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_message_includes_detail() {
        let err = UploadError::Server {
            status: StatusCode::BAD_REQUEST,
            detail: Some("Kolom wajib: text".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "prediction API answered 400 Bad Request: Kolom wajib: text"
        );
        assert_eq!(err.kind(), FailureKind::Server(400));
    }

    #[test]
    fn server_error_without_detail() {
        let err = UploadError::Server {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: None,
        };
        assert_eq!(
            err.to_string(),
            "prediction API answered 500 Internal Server Error"
        );
    }
}
