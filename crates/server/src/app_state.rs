use std::sync::Arc;

use chrono::{DateTime, Utc};
use shared::domain::Mode;
use tokio::sync::{watch, Mutex, Notify};

use crate::{drive::DriveLink, speech::SpeechSink, telemetry::TelemetryFrame};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) robot: Arc<Mutex<RobotState>>,
    pub(crate) drive: Arc<dyn DriveLink>,
    pub(crate) speech: Arc<dyn SpeechSink>,
    pub(crate) telemetry: watch::Receiver<TelemetryFrame>,
    pub(crate) shutdown: Arc<Notify>,
}

#[derive(Debug)]
pub(crate) struct RobotState {
    pub(crate) mode: Mode,
    pub(crate) lights_on: bool,
    /// One-shot latch; stays set for the life of the process.
    pub(crate) medkit_deployed: bool,
    pub(crate) recording: Option<RecordingSession>,
    pub(crate) status: String,
}

impl RobotState {
    pub(crate) fn new() -> Self {
        Self {
            mode: Mode::Manual,
            lights_on: false,
            medkit_deployed: false,
            recording: None,
            status: "Standing by".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct RecordingSession {
    pub(crate) name: String,
    pub(crate) started_at: DateTime<Utc>,
}

impl RecordingSession {
    pub(crate) fn begin(now: DateTime<Utc>) -> Self {
        Self {
            name: format!("rec_{}", now.format("%Y%m%d-%H%M%S")),
            started_at: now,
        }
    }
}
