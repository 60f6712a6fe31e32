//! One submission without a window, for scripts and terminals.

use crate::app::{SubmitOutcome, UploadController};
use crate::upload::SelectedFile;
use anyhow::{bail, Context, Result};
use std::path::Path;
use std::time::Duration;

const WAIT_SLICE: Duration = Duration::from_millis(250);

pub fn run(mut controller: UploadController, path: &Path) -> Result<()> {
    let file = SelectedFile::from_path(path)
        .with_context(|| format!("cannot use {} as upload", path.display()))?;

    match controller.handle_submit(Some(file), None) {
        SubmitOutcome::Started => {}
        SubmitOutcome::MissingFile | SubmitOutcome::Busy => {
            bail!("upload of {} was not started", path.display())
        }
    }

    let mut last_status = String::new();
    while !controller.state().phase.is_terminal() {
        if !controller.wait_for_event(WAIT_SLICE) && !controller.has_pending_events() {
            bail!("upload of {} ended without a result", path.display());
        }
        let status = &controller.state().status_text;
        if *status != last_status {
            println!("{}", status);
            last_status = status.clone();
        }
    }

    match controller.state().saved_to() {
        Some(saved_to) => {
            println!("{}", saved_to.display());
            Ok(())
        }
        None => bail!("{}", controller.state().status_text),
    }
}
