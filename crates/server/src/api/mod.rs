//! Route logic, kept free of axum extractors so tests can call it directly.

use shared::{
    domain::{Direction, Mode, RecordingState, RobotAction},
    error::{ApiError, ErrorCode},
    protocol::{ModeAck, MoveAck, RecordAck, SensorReport, StatusAck},
};

use crate::{
    app_state::{AppState, RecordingSession},
    drive::{DriveCommand, DriveUnavailable},
};

fn drive_error(error: DriveUnavailable) -> ApiError {
    ApiError::new(ErrorCode::Unavailable, error.to_string())
}

pub(crate) async fn apply_move(
    state: &AppState,
    direction: Direction,
) -> Result<MoveAck, ApiError> {
    state
        .drive
        .send(DriveCommand::Move(direction))
        .await
        .map_err(drive_error)?;

    let mut robot = state.robot.lock().await;
    // Driving the pad always drops the robot back into manual control.
    robot.mode = Mode::Manual;
    robot.status = format!("Moving: {}", direction.label());
    Ok(MoveAck { direction })
}

pub(crate) async fn apply_stop(state: &AppState) -> Result<StatusAck, ApiError> {
    state
        .drive
        .send(DriveCommand::Stop)
        .await
        .map_err(drive_error)?;

    let mut robot = state.robot.lock().await;
    robot.status = "Stopped".to_string();
    Ok(StatusAck {
        status: "ok".to_string(),
    })
}

pub(crate) async fn apply_mode(state: &AppState, mode: Mode) -> Result<ModeAck, ApiError> {
    let mut robot = state.robot.lock().await;
    robot.mode = mode;
    robot.status = format!("Mode: {}", mode.label());
    Ok(ModeAck { mode })
}

pub(crate) async fn apply_record(
    state: &AppState,
    status: RecordingState,
) -> Result<RecordAck, ApiError> {
    let mut robot = state.robot.lock().await;
    match status {
        RecordingState::Start => {
            if robot.recording.is_none() {
                let session = RecordingSession::begin(chrono::Utc::now());
                tracing::info!(name = %session.name, "recording started");
                robot.recording = Some(session);
            }
        }
        RecordingState::Stop => {
            if let Some(session) = robot.recording.take() {
                tracing::info!(name = %session.name, started_at = %session.started_at, "recording stopped");
            }
        }
    }
    Ok(RecordAck {
        recording: robot.recording.is_some(),
    })
}

pub(crate) async fn apply_action(
    state: &AppState,
    action: RobotAction,
) -> Result<StatusAck, ApiError> {
    let mut robot = state.robot.lock().await;
    match action {
        RobotAction::Lights { state: on } => {
            robot.lights_on = on;
            tracing::info!(on, "work lights switched");
            Ok(StatusAck {
                status: if on { "lights on" } else { "lights off" }.to_string(),
            })
        }
        RobotAction::MedKit => {
            if robot.medkit_deployed {
                return Err(ApiError::new(
                    ErrorCode::Validation,
                    "med kit already deployed",
                ));
            }
            robot.medkit_deployed = true;
            robot.status = "Med kit deployed".to_string();
            tracing::info!("med kit deployed");
            Ok(StatusAck {
                status: "ok".to_string(),
            })
        }
    }
}

pub(crate) async fn apply_speak(state: &AppState, text: &str) -> Result<StatusAck, ApiError> {
    state
        .speech
        .say(text)
        .await
        .map_err(|error| ApiError::new(ErrorCode::Unavailable, error.to_string()))?;
    Ok(StatusAck {
        status: "ok".to_string(),
    })
}

pub(crate) async fn sensor_report(state: &AppState) -> SensorReport {
    let frame = *state.telemetry.borrow();
    let robot = state.robot.lock().await;
    SensorReport {
        snapshot: frame.snapshot,
        distance: frame.distance,
        mode: robot.mode,
        medkit_deployed: robot.medkit_deployed,
        status: robot.status.clone(),
    }
}
