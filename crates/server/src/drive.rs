use async_trait::async_trait;
use shared::domain::Direction;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DriveCommand {
    Move(Direction),
    Stop,
}

impl DriveCommand {
    /// Single-byte wire format of the motor controller link.
    pub(crate) fn wire_byte(self) -> u8 {
        match self {
            DriveCommand::Move(Direction::Forward) => b'F',
            DriveCommand::Move(Direction::Back) => b'B',
            DriveCommand::Move(Direction::Left) => b'L',
            DriveCommand::Move(Direction::Right) => b'R',
            DriveCommand::Stop => b'S',
        }
    }
}

#[derive(Debug, Error)]
#[error("drive link unavailable: {reason}")]
pub(crate) struct DriveUnavailable {
    pub(crate) reason: String,
}

/// Seam between the control routes and whatever carries drive bytes to the
/// motor controller (serial in the field, a capture buffer in tests).
#[async_trait]
pub(crate) trait DriveLink: Send + Sync {
    async fn send(&self, command: DriveCommand) -> Result<(), DriveUnavailable>;
}

/// Default link when no motor controller is wired up; logs what it would
/// have written so the rest of the stack can still be driven end to end.
pub(crate) struct LogDriveLink;

#[async_trait]
impl DriveLink for LogDriveLink {
    async fn send(&self, command: DriveCommand) -> Result<(), DriveUnavailable> {
        tracing::info!(command = ?command, wire = %(command.wire_byte() as char), "drive command");
        Ok(())
    }
}
