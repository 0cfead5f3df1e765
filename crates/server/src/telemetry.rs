use std::{path::PathBuf, time::Duration};

use shared::protocol::SensorSnapshot;
use tokio::{
    fs::File,
    io::{AsyncBufReadExt, BufReader},
    sync::watch,
    task::JoinHandle,
};

/// Reopen delay while the sensor link is unplugged or closed.
const TELEMETRY_RETRY: Duration = Duration::from_secs(10);

/// Latest readings from the sensor link plus the rangefinder distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TelemetryFrame {
    pub(crate) snapshot: SensorSnapshot,
    pub(crate) distance: u32,
}

impl Default for TelemetryFrame {
    fn default() -> Self {
        Self {
            snapshot: SensorSnapshot::default(),
            distance: 100,
        }
    }
}

/// Applies one telemetry line to the frame.
///
/// Lines are `|`-separated `K:V` fields: `D` distance, `G` gas level,
/// `F` fire, `V` vibration, `A` violence (booleans as `0`/`1`). Unknown
/// keys and unparseable values are skipped; the rest still apply.
pub(crate) fn parse_telemetry_line(line: &str, frame: &mut TelemetryFrame) {
    for part in line.trim().split('|') {
        let Some((key, value)) = part.split_once(':') else {
            continue;
        };
        match key {
            "D" => {
                if let Ok(v) = value.parse() {
                    frame.distance = v;
                }
            }
            "G" => {
                if let Ok(v) = value.parse() {
                    frame.snapshot.gas_level = v;
                }
            }
            "F" => frame.snapshot.fire = value == "1",
            "V" => frame.snapshot.vibration = value == "1",
            "A" => frame.snapshot.violence = value == "1",
            _ => {}
        }
    }
}

/// Reads telemetry lines from `path` for as long as the process lives,
/// publishing each parsed frame. Reopens the source after read errors or
/// EOF instead of giving up.
pub(crate) fn spawn_telemetry_reader(
    path: PathBuf,
    updates: watch::Sender<TelemetryFrame>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match File::open(&path).await {
                Ok(file) => {
                    tracing::info!(path = %path.display(), "telemetry link up");
                    let mut lines = BufReader::new(file).lines();
                    loop {
                        match lines.next_line().await {
                            Ok(Some(line)) => {
                                let mut frame = *updates.borrow();
                                parse_telemetry_line(&line, &mut frame);
                                let _ = updates.send(frame);
                            }
                            Ok(None) => break,
                            Err(error) => {
                                tracing::warn!(%error, "telemetry read failed");
                                break;
                            }
                        }
                    }
                }
                Err(error) => {
                    tracing::warn!(%error, path = %path.display(), "telemetry source unavailable");
                }
            }
            tokio::time::sleep(TELEMETRY_RETRY).await;
        }
    })
}
