use serde::{Deserialize, Serialize};

/// Operating mode of the console. `Manual` keeps the drive pad live;
/// `Idle` suppresses movement commands while leaving toggles active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mode {
    Manual,
    Idle,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Mode::Manual => Mode::Idle,
            Mode::Idle => Mode::Manual,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Manual => "MANUAL",
            Mode::Idle => "IDLE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Forward,
    Back,
    Left,
    Right,
}

impl Direction {
    pub fn label(self) -> &'static str {
        match self {
            Direction::Forward => "FORWARD",
            Direction::Back => "BACK",
            Direction::Left => "LEFT",
            Direction::Right => "RIGHT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordingState {
    Start,
    Stop,
}

/// Discrete one-shot robot actions carried by `POST /action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum RobotAction {
    #[serde(rename = "LIGHTS")]
    Lights { state: bool },
    #[serde(rename = "MEDKIT")]
    MedKit,
}
