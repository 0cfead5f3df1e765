use serde::{Deserialize, Serialize};

use crate::domain::{Direction, Mode, RecordingState};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MoveRequest {
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ModeRequest {
    pub mode: Mode,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RecordRequest {
    pub status: RecordingState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeakRequest {
    pub text: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MoveAck {
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ModeAck {
    pub mode: Mode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusAck {
    pub status: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RecordAck {
    pub recording: bool,
}

/// One full sensor reading. Replaced wholesale every poll; never merged
/// with the previous snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorSnapshot {
    pub fire: bool,
    pub gas_level: u8,
    pub vibration: bool,
    pub violence: bool,
}

/// Body of `GET /sensor_data`: the snapshot merged with robot-state fields.
/// Clients that only care about the snapshot deserialize `SensorSnapshot`
/// directly and ignore the rest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorReport {
    #[serde(flatten)]
    pub snapshot: SensorSnapshot,
    pub distance: u32,
    pub mode: Mode,
    pub medkit_deployed: bool,
    pub status: String,
}
