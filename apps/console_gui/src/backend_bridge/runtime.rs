//! Backend worker: owns the tokio runtime and the HTTP client, executes
//! queued commands fire-and-forget, and feeds sensor views back to the UI.

use std::{sync::Arc, thread, time::Duration};

use client_core::{controller::Command, sensors::spawn_sensor_poll, RobotClient};
use crossbeam_channel::{Receiver, Sender};

use crate::controller::events::UiEvent;

pub struct BackendOptions {
    pub server_url: String,
    pub poll_interval: Duration,
}

pub fn spawn_backend_worker(
    cmd_rx: Receiver<Command>,
    ui_tx: Sender<UiEvent>,
    options: BackendOptions,
) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Info(format!(
                    "Backend worker startup failure: {err}"
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let client = match RobotClient::new(&options.server_url) {
                Ok(client) => Arc::new(client),
                Err(err) => {
                    let _ = ui_tx.try_send(UiEvent::Info(format!("Bad server url: {err}")));
                    tracing::error!("invalid control server url: {err}");
                    return;
                }
            };

            let _ = ui_tx.try_send(UiEvent::Info(format!("Linked to {}", client.server_url())));

            let poll_tx = ui_tx.clone();
            let _poll = spawn_sensor_poll(Arc::clone(&client), options.poll_interval, move |view| {
                let _ = poll_tx.try_send(UiEvent::SensorUpdated(view));
            });

            while let Ok(command) = cmd_rx.recv() {
                let client = Arc::clone(&client);
                let ui_tx = ui_tx.clone();
                tokio::spawn(async move {
                    run_command(&client, &ui_tx, command).await;
                });
            }
        });
    });
}

/// Commands are notifications. Failures on the movement path are logged and
/// dropped rather than surfaced; move/mode acks land in the status line;
/// everything else is fire-and-forget.
async fn run_command(client: &RobotClient, ui_tx: &Sender<UiEvent>, command: Command) {
    match command {
        Command::Move(direction) => match client.move_robot(direction).await {
            Ok(ack) => {
                let _ = ui_tx.try_send(UiEvent::Status(format!(
                    "Moving: {}",
                    ack.direction.label()
                )));
            }
            Err(error) => tracing::warn!(%error, "move command dropped"),
        },
        Command::Stop => {
            if let Err(error) = client.stop().await {
                tracing::warn!(%error, "stop command dropped");
            }
        }
        Command::SetMode(mode) => match client.set_mode(mode).await {
            Ok(ack) => {
                let _ = ui_tx.try_send(UiEvent::Status(format!("Mode: {}", ack.mode.label())));
            }
            Err(error) => tracing::warn!(%error, "mode command dropped"),
        },
        Command::Record(status) => {
            if let Err(error) = client.record(status).await {
                tracing::warn!(%error, "record command dropped");
            }
        }
        Command::Action(action) => {
            if let Err(error) = client.action(action).await {
                tracing::warn!(%error, "action command dropped");
            }
        }
        Command::Speak(text) => {
            if let Err(error) = client.speak(&text).await {
                tracing::warn!(%error, "speak command dropped");
            }
        }
        Command::Shutdown => match client.shutdown().await {
            Ok(()) => {
                let _ = ui_tx.try_send(UiEvent::Status("Robot shutting down".to_string()));
            }
            Err(error) => tracing::warn!(%error, "shutdown command dropped"),
        },
    }
}
