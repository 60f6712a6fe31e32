mod sender;
mod types;

pub use sender::FileSender;
pub use types::{
    EventSink, FailureKind, SelectedFile, TransferProgress, UploadEvent, UploadOutcome,
    FILE_FIELD, RESULT_FILE_NAME,
};
