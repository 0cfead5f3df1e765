//! Queueing from UI actions to the backend command channel.

use client_core::controller::Command;
use crossbeam_channel::{Sender, TrySendError};

pub fn dispatch_backend_command(cmd_tx: &Sender<Command>, command: Command, status: &mut String) {
    let name = command.name();
    match cmd_tx.try_send(command) {
        Ok(()) => tracing::debug!(command = name, "queued ui->backend command"),
        Err(TrySendError::Full(_)) => {
            *status = "Command queue is full; retry".to_string();
        }
        Err(TrySendError::Disconnected(_)) => {
            *status = "Backend worker disconnected; restart the console".to_string();
        }
    }
}
