use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use shared::{
    error::{ApiError, ErrorCode},
    protocol::{
        ModeAck, ModeRequest, MoveAck, MoveRequest, RecordAck, RecordRequest, SensorReport,
        SpeakRequest, StatusAck,
    },
};
use tokio::sync::{watch, Mutex, Notify};
use tracing::info;

mod api;
mod app_state;
mod config;
mod drive;
mod speech;
mod telemetry;

use app_state::{AppState, RobotState};
use config::load_settings;
use drive::LogDriveLink;
use speech::LogSpeechSink;
use telemetry::{spawn_telemetry_reader, TelemetryFrame};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = load_settings();

    let (telemetry_tx, telemetry_rx) = watch::channel(TelemetryFrame::default());
    if let Some(path) = settings.telemetry_path.clone() {
        spawn_telemetry_reader(path.into(), telemetry_tx);
    }

    let shutdown = Arc::new(Notify::new());
    let state = AppState {
        robot: Arc::new(Mutex::new(RobotState::new())),
        drive: Arc::new(LogDriveLink),
        speech: Arc::new(LogSpeechSink),
        telemetry: telemetry_rx,
        shutdown: Arc::clone(&shutdown),
    };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "control server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.notified().await })
        .await?;
    info!("control server stopped");
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/move", post(http_move))
        .route("/stop", post(http_stop))
        .route("/mode", post(http_mode))
        .route("/record", post(http_record))
        .route("/action", post(http_action))
        .route("/speak", post(http_speak))
        .route("/shutdown", post(http_shutdown))
        .route("/sensor_data", get(http_sensor_data))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

fn error_response(error: ApiError) -> (StatusCode, Json<ApiError>) {
    let status = match error.code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(error))
}

async fn http_move(
    State(state): State<Arc<AppState>>,
    Json(req): Json<MoveRequest>,
) -> Result<Json<MoveAck>, (StatusCode, Json<ApiError>)> {
    api::apply_move(&state, req.direction)
        .await
        .map(Json)
        .map_err(error_response)
}

async fn http_stop(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusAck>, (StatusCode, Json<ApiError>)> {
    api::apply_stop(&state).await.map(Json).map_err(error_response)
}

async fn http_mode(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ModeRequest>,
) -> Result<Json<ModeAck>, (StatusCode, Json<ApiError>)> {
    api::apply_mode(&state, req.mode)
        .await
        .map(Json)
        .map_err(error_response)
}

async fn http_record(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RecordRequest>,
) -> Result<Json<RecordAck>, (StatusCode, Json<ApiError>)> {
    api::apply_record(&state, req.status)
        .await
        .map(Json)
        .map_err(error_response)
}

async fn http_action(
    State(state): State<Arc<AppState>>,
    Json(action): Json<shared::domain::RobotAction>,
) -> Result<Json<StatusAck>, (StatusCode, Json<ApiError>)> {
    api::apply_action(&state, action)
        .await
        .map(Json)
        .map_err(error_response)
}

async fn http_speak(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SpeakRequest>,
) -> Result<Json<StatusAck>, (StatusCode, Json<ApiError>)> {
    api::apply_speak(&state, &req.text)
        .await
        .map(Json)
        .map_err(error_response)
}

async fn http_shutdown(State(state): State<Arc<AppState>>) -> Json<StatusAck> {
    tracing::warn!("shutdown requested by operator");
    state.shutdown.notify_one();
    Json(StatusAck {
        status: "shutting down".to_string(),
    })
}

async fn http_sensor_data(State(state): State<Arc<AppState>>) -> Json<SensorReport> {
    Json(api::sensor_report(&state).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::{body, body::Body, http::Request};
    use crate::drive::{DriveCommand, DriveLink, DriveUnavailable};
    use shared::domain::{Direction, Mode};
    use tower::ServiceExt;

    struct TestDriveLink {
        sent: Arc<Mutex<Vec<u8>>>,
        fail: bool,
    }

    #[async_trait]
    impl DriveLink for TestDriveLink {
        async fn send(&self, command: DriveCommand) -> Result<(), DriveUnavailable> {
            if self.fail {
                return Err(DriveUnavailable {
                    reason: "link down".to_string(),
                });
            }
            self.sent.lock().await.push(command.wire_byte());
            Ok(())
        }
    }

    struct TestHarness {
        app: Router,
        sent: Arc<Mutex<Vec<u8>>>,
        telemetry: watch::Sender<TelemetryFrame>,
        robot: Arc<Mutex<RobotState>>,
    }

    fn test_app(fail_drive: bool) -> TestHarness {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let (telemetry, telemetry_rx) = watch::channel(TelemetryFrame::default());
        let robot = Arc::new(Mutex::new(RobotState::new()));
        let state = AppState {
            robot: Arc::clone(&robot),
            drive: Arc::new(TestDriveLink {
                sent: Arc::clone(&sent),
                fail: fail_drive,
            }),
            speech: Arc::new(LogSpeechSink),
            telemetry: telemetry_rx,
            shutdown: Arc::new(Notify::new()),
        };
        TestHarness {
            app: build_router(Arc::new(state)),
            sent,
            telemetry,
            robot,
        }
    }

    fn post_json(path: &str, body: serde_json::Value) -> Request<Body> {
        Request::post(path)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    async fn json_body<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let bytes = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        serde_json::from_slice(&bytes).expect("json")
    }

    #[tokio::test]
    async fn healthz_reports_ok() {
        let harness = test_app(false);
        let response = harness
            .app
            .oneshot(Request::get("/healthz").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn move_forces_manual_mode_and_encodes_drive_byte() {
        let harness = test_app(false);
        harness.robot.lock().await.mode = Mode::Idle;

        let response = harness
            .app
            .oneshot(post_json("/move", serde_json::json!({ "direction": "LEFT" })))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let ack: MoveAck = json_body(response).await;
        assert_eq!(ack.direction, Direction::Left);
        assert_eq!(*harness.sent.lock().await, vec![b'L']);
        assert_eq!(harness.robot.lock().await.mode, Mode::Manual);
    }

    #[tokio::test]
    async fn stop_sends_the_stop_byte() {
        let harness = test_app(false);
        let response = harness
            .app
            .oneshot(Request::post("/stop").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(*harness.sent.lock().await, vec![b'S']);
    }

    #[tokio::test]
    async fn mode_round_trips_the_ack() {
        let harness = test_app(false);
        let response = harness
            .app
            .oneshot(post_json("/mode", serde_json::json!({ "mode": "IDLE" })))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let ack: ModeAck = json_body(response).await;
        assert_eq!(ack.mode, Mode::Idle);
        assert_eq!(harness.robot.lock().await.mode, Mode::Idle);
    }

    #[tokio::test]
    async fn record_toggle_opens_and_closes_a_session() {
        let harness = test_app(false);

        let response = harness
            .app
            .clone()
            .oneshot(post_json("/record", serde_json::json!({ "status": "start" })))
            .await
            .expect("response");
        let ack: RecordAck = json_body(response).await;
        assert!(ack.recording);
        let name = harness
            .robot
            .lock()
            .await
            .recording
            .as_ref()
            .expect("session")
            .name
            .clone();
        assert!(name.starts_with("rec_"), "unexpected session name {name}");

        let response = harness
            .app
            .oneshot(post_json("/record", serde_json::json!({ "status": "stop" })))
            .await
            .expect("response");
        let ack: RecordAck = json_body(response).await;
        assert!(!ack.recording);
        assert!(harness.robot.lock().await.recording.is_none());
    }

    #[tokio::test]
    async fn medkit_latches_after_first_deploy() {
        let harness = test_app(false);

        let response = harness
            .app
            .clone()
            .oneshot(post_json("/action", serde_json::json!({ "action": "MEDKIT" })))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let response = harness
            .app
            .oneshot(post_json("/action", serde_json::json!({ "action": "MEDKIT" })))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = json_body(response).await;
        assert_eq!(error.code, ErrorCode::Validation);
    }

    #[tokio::test]
    async fn lights_action_tracks_the_requested_state() {
        let harness = test_app(false);
        let response = harness
            .app
            .oneshot(post_json(
                "/action",
                serde_json::json!({ "action": "LIGHTS", "state": true }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let ack: StatusAck = json_body(response).await;
        assert_eq!(ack.status, "lights on");
        assert!(harness.robot.lock().await.lights_on);
    }

    #[tokio::test]
    async fn sensor_data_merges_telemetry_and_robot_state() {
        let harness = test_app(false);
        harness
            .telemetry
            .send(TelemetryFrame {
                snapshot: shared::protocol::SensorSnapshot {
                    fire: true,
                    gas_level: 45,
                    vibration: false,
                    violence: false,
                },
                distance: 38,
            })
            .expect("telemetry");

        let response = harness
            .app
            .oneshot(
                Request::get("/sensor_data")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let report: SensorReport = json_body(response).await;
        assert!(report.snapshot.fire);
        assert_eq!(report.snapshot.gas_level, 45);
        assert_eq!(report.distance, 38);
        assert_eq!(report.mode, Mode::Manual);
        assert!(!report.medkit_deployed);
    }

    #[tokio::test]
    async fn drive_failure_maps_to_service_unavailable() {
        let harness = test_app(true);
        let response = harness
            .app
            .oneshot(post_json(
                "/move",
                serde_json::json!({ "direction": "FORWARD" }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let error: ApiError = json_body(response).await;
        assert_eq!(error.code, ErrorCode::Unavailable);
    }

    #[tokio::test]
    async fn shutdown_acknowledges_and_is_repeatable() {
        let harness = test_app(false);
        for _ in 0..2 {
            let response = harness
                .app
                .clone()
                .oneshot(
                    Request::post("/shutdown")
                        .body(Body::empty())
                        .expect("request"),
                )
                .await
                .expect("response");
            assert_eq!(response.status(), StatusCode::OK);
            let ack: StatusAck = json_body(response).await;
            assert_eq!(ack.status, "shutting down");
        }
    }

    #[tokio::test]
    async fn speak_relays_to_the_speech_sink() {
        let harness = test_app(false);
        let response = harness
            .app
            .oneshot(post_json("/speak", serde_json::json!({ "text": "clear the area" })))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }
}
