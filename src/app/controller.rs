use super::state::UploadState;
use crate::upload::{EventSink, FailureKind, FileSender, SelectedFile, UploadEvent, UploadOutcome};
use derivative::Derivative;
use std::sync::mpsc::{self as std_mpsc, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

/// Called from the upload task after every event, e.g. to wake the UI.
pub type RepaintHook = Box<dyn Fn() + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Started,
    MissingFile,
    Busy,
}

#[derive(Derivative)]
#[derivative(Debug)]
struct ChannelSink {
    sender: Sender<UploadEvent>,
    #[derivative(Debug = "ignore")]
    repaint: Option<RepaintHook>,
}

impl EventSink for ChannelSink {
    fn emit(&self, event: UploadEvent) {
        self.sender.emit(event);
        if let Some(repaint) = &self.repaint {
            repaint();
        }
    }
}

#[derive(Derivative)]
#[derivative(Debug)]
pub struct UploadController {
    sender: FileSender,
    #[derivative(Debug = "ignore")]
    runtime: Handle,
    state: UploadState,
    event_receiver: Option<Receiver<UploadEvent>>,
}

impl UploadController {
    pub fn new(sender: FileSender, runtime: Handle) -> Self {
        Self {
            sender,
            runtime,
            state: UploadState::default(),
            event_receiver: None,
        }
    }

    pub fn state(&self) -> &UploadState {
        &self.state
    }

    pub fn endpoint(&self) -> &reqwest::Url {
        self.sender.endpoint()
    }

    /// True while an upload task can still deliver events.
    pub fn has_pending_events(&self) -> bool {
        self.event_receiver.is_some()
    }

    pub fn dismiss_notice(&mut self) {
        self.state.notice = None;
    }

    pub fn handle_submit(
        &mut self,
        file: Option<SelectedFile>,
        repaint: Option<RepaintHook>,
    ) -> SubmitOutcome {
        let Some(file) = file else {
            info!("Submit without a selected file");
            self.state.reject_missing_file();
            return SubmitOutcome::MissingFile;
        };

        if self.state.is_uploading() {
            debug!("Ignoring submit of '{}': upload in flight", file.name);
            return SubmitOutcome::Busy;
        }

        let (event_sender, event_receiver) = std_mpsc::channel();
        self.event_receiver = Some(event_receiver);
        self.state.begin();

        let sink: Arc<dyn EventSink> = Arc::new(ChannelSink {
            sender: event_sender,
            repaint,
        });
        let sender = self.sender.clone();
        self.runtime.spawn(async move {
            sender.send_file(&file, sink).await;
        });

        SubmitOutcome::Started
    }

    /// Applies every queued event without blocking. Returns true when anything changed.
    pub fn poll_events(&mut self) -> bool {
        let mut had_updates = false;
        while let Some(receiver) = &self.event_receiver {
            match receiver.try_recv() {
                Ok(event) => self.apply(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => self.abandon_upload(),
            }
            had_updates = true;
        }
        had_updates
    }

    /// Blocks for at most `timeout` on the next event. Returns false once no
    /// upload is in flight or the wait timed out.
    pub fn wait_for_event(&mut self, timeout: Duration) -> bool {
        let Some(receiver) = &self.event_receiver else {
            return false;
        };

        match receiver.recv_timeout(timeout) {
            Ok(event) => {
                self.apply(event);
                true
            }
            Err(RecvTimeoutError::Timeout) => false,
            Err(RecvTimeoutError::Disconnected) => {
                self.abandon_upload();
                true
            }
        }
    }

    /// The upload task went away without a `Finished` event (panic, runtime
    /// shutdown). Ends the submission so a new one can start.
    fn abandon_upload(&mut self) {
        self.event_receiver = None;
        if self.state.is_uploading() {
            warn!("Upload task ended without a result");
            self.state
                .apply(&UploadEvent::Finished(UploadOutcome::Failed(FailureKind::Transport)));
        }
    }

    fn apply(&mut self, event: UploadEvent) {
        self.state.apply(&event);
        if event.is_terminal() {
            self.event_receiver = None;
        }
    }
}
