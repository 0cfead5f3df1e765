//! Events flowing from the backend worker to the UI thread.

use client_core::sensors::SensorView;

pub enum UiEvent {
    /// Operator-facing line from the backend itself (startup, link state).
    Info(String),
    /// Command acknowledgement reflected into the status line.
    Status(String),
    SensorUpdated(SensorView),
}
