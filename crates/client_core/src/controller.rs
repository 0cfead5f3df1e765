//! Input-to-command dispatch as a pure reducer.
//!
//! The GUI adapter translates raw key/pointer events into [`ControlEvent`]s,
//! feeds them through [`reduce`], and carries out the returned effects
//! (queue an HTTP command, move the pad highlight, show a notice). Keeping
//! the dispatch logic here means it is testable without any UI attached.

use shared::domain::{Direction, Mode, RecordingState, RobotAction};

/// Physical keys bound to drive directions. Unbound keys never reach the
/// reducer; the adapter maps them to `None` and drops them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriveKey {
    W,
    A,
    S,
    D,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
}

impl DriveKey {
    pub fn direction(self) -> Direction {
        match self {
            DriveKey::W | DriveKey::ArrowUp => Direction::Forward,
            DriveKey::S | DriveKey::ArrowDown => Direction::Back,
            DriveKey::A | DriveKey::ArrowLeft => Direction::Left,
            DriveKey::D | DriveKey::ArrowRight => Direction::Right,
        }
    }
}

/// Dispatcher state. Plain scalars, immutably updated by [`reduce`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlState {
    pub mode: Mode,
    /// Currently held movement key; at most one, last-key-wins.
    pub active_key: Option<DriveKey>,
    pub lights_on: bool,
    pub recording: bool,
    /// One-shot latch; irreversible for the session once set.
    pub medkit_deployed: bool,
}

impl ControlState {
    pub fn new() -> Self {
        Self {
            mode: Mode::Manual,
            active_key: None,
            lights_on: false,
            recording: false,
            medkit_deployed: false,
        }
    }
}

impl Default for ControlState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ControlEvent {
    /// `typing` is true while a text entry has focus; drive keys must not
    /// hijack typing.
    KeyDown { key: DriveKey, typing: bool },
    KeyUp { key: DriveKey },
    PadPress { direction: Direction },
    PadRelease,
    ToggleMode,
    ToggleRecording,
    ToggleLights,
    DeployMedKit { confirmed: bool },
    Speak { text: String },
    Shutdown { confirmed: bool },
}

/// Outbound command for the control server, one per wire intent.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Move(Direction),
    Stop,
    SetMode(Mode),
    Record(RecordingState),
    Action(RobotAction),
    Speak(String),
    Shutdown,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Move(_) => "move",
            Command::Stop => "stop",
            Command::SetMode(_) => "mode",
            Command::Record(_) => "record",
            Command::Action(_) => "action",
            Command::Speak(_) => "speak",
            Command::Shutdown => "shutdown",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Command(Command),
    Highlight(Direction),
    ClearHighlight,
    /// Operator-facing status text that does not go on the wire.
    Notice(String),
}

/// Applies one input event to the dispatcher state.
///
/// Movement is suppressed entirely while `Idle`; toggles, speak, shutdown
/// and the mode switch itself stay live in any mode. A repeated key-down
/// for the held key is ignored, as is a key-up for anything but the held
/// key (a stale release must not stop a newer hold).
pub fn reduce(state: ControlState, event: ControlEvent) -> (ControlState, Vec<Effect>) {
    let mut next = state;
    let mut effects = Vec::new();

    match event {
        ControlEvent::KeyDown { key, typing } => {
            if !typing && next.mode == Mode::Manual && next.active_key != Some(key) {
                let direction = key.direction();
                next.active_key = Some(key);
                effects.push(Effect::Highlight(direction));
                effects.push(Effect::Command(Command::Move(direction)));
            }
        }
        ControlEvent::KeyUp { key } => {
            if next.active_key == Some(key) {
                next.active_key = None;
                effects.push(Effect::ClearHighlight);
                if next.mode == Mode::Manual {
                    effects.push(Effect::Command(Command::Stop));
                }
            }
        }
        ControlEvent::PadPress { direction } => {
            if next.mode == Mode::Manual {
                effects.push(Effect::Highlight(direction));
                effects.push(Effect::Command(Command::Move(direction)));
            }
        }
        ControlEvent::PadRelease => {
            // Clearing when nothing is highlighted is fine.
            effects.push(Effect::ClearHighlight);
            if next.mode == Mode::Manual {
                effects.push(Effect::Command(Command::Stop));
            }
        }
        ControlEvent::ToggleMode => {
            next.mode = next.mode.toggled();
            effects.push(Effect::Command(Command::SetMode(next.mode)));
        }
        ControlEvent::ToggleRecording => {
            next.recording = !next.recording;
            let status = if next.recording {
                RecordingState::Start
            } else {
                RecordingState::Stop
            };
            effects.push(Effect::Command(Command::Record(status)));
        }
        ControlEvent::ToggleLights => {
            next.lights_on = !next.lights_on;
            effects.push(Effect::Command(Command::Action(RobotAction::Lights {
                state: next.lights_on,
            })));
        }
        ControlEvent::DeployMedKit { confirmed } => {
            if next.medkit_deployed {
                effects.push(Effect::Notice("Med kit already deployed".to_string()));
            } else if confirmed {
                next.medkit_deployed = true;
                effects.push(Effect::Command(Command::Action(RobotAction::MedKit)));
            }
        }
        ControlEvent::Speak { text } => {
            effects.push(Effect::Command(Command::Speak(text)));
        }
        ControlEvent::Shutdown { confirmed } => {
            if confirmed {
                effects.push(Effect::Command(Command::Shutdown));
            }
        }
    }

    (next, effects)
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
