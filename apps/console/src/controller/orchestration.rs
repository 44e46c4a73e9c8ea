//! Command orchestration from UI actions to the backend command queue.

use std::time::Instant;

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{QUEUE_FULL_MESSAGE, WORKER_GONE_MESSAGE};
use crate::ui::Page;

/// Queues `cmd`; on failure shows a banner and returns false.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    page: &mut Page,
    now: Instant,
) -> bool {
    let cmd_name = cmd.name();
    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            true
        }
        Err(TrySendError::Full(_)) => {
            tracing::error!(command = cmd_name, "backend command queue is full");
            page.show_error(QUEUE_FULL_MESSAGE, now);
            false
        }
        Err(TrySendError::Disconnected(_)) => {
            tracing::error!(command = cmd_name, "backend command processor disconnected");
            page.show_error(WORKER_GONE_MESSAGE, now);
            false
        }
    }
}
