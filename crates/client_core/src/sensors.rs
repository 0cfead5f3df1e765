//! Sensor snapshot polling and status derivation.

use std::{sync::Arc, time::Duration};

use shared::protocol::SensorSnapshot;
use tokio::task::JoinHandle;

use crate::RobotClient;

/// Gas readings above this percentage flag the gas tile.
pub const GAS_ALERT_THRESHOLD: u8 = 30;

/// Placeholder tile text before the first successful poll.
const UNKNOWN: &str = "--";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelStatus {
    pub text: String,
    pub alert: bool,
}

impl ChannelStatus {
    fn new(text: impl Into<String>, alert: bool) -> Self {
        Self {
            text: text.into(),
            alert,
        }
    }
}

/// Presentation state for the four sensor channels, derived wholesale from
/// each snapshot. A failed poll simply leaves the previous view in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorView {
    pub fire: ChannelStatus,
    pub gas: ChannelStatus,
    pub vibration: ChannelStatus,
    pub audio: ChannelStatus,
    /// Critical-alert banner; shown while violence is detected.
    pub banner_visible: bool,
}

impl Default for SensorView {
    fn default() -> Self {
        Self {
            fire: ChannelStatus::new(UNKNOWN, false),
            gas: ChannelStatus::new(UNKNOWN, false),
            vibration: ChannelStatus::new(UNKNOWN, false),
            audio: ChannelStatus::new(UNKNOWN, false),
            banner_visible: false,
        }
    }
}

impl SensorView {
    pub fn from_snapshot(snapshot: &SensorSnapshot) -> Self {
        Self {
            fire: ChannelStatus::new(
                if snapshot.fire { "ALERT" } else { "SAFE" },
                snapshot.fire,
            ),
            gas: ChannelStatus::new(
                format!("{}%", snapshot.gas_level),
                snapshot.gas_level > GAS_ALERT_THRESHOLD,
            ),
            vibration: ChannelStatus::new(
                if snapshot.vibration { "SHAKING" } else { "STABLE" },
                snapshot.vibration,
            ),
            audio: ChannelStatus::new(
                if snapshot.violence { "VIOLENCE" } else { "QUIET" },
                snapshot.violence,
            ),
            banner_visible: snapshot.violence,
        }
    }
}

/// Polls `GET /sensor_data` on a fixed period and hands each successful
/// snapshot's derived view to `apply`.
///
/// No single-flight guard: a slow response may overlap the next tick, and
/// whichever response resolves last wins. Failed polls are logged at debug
/// and otherwise dropped; the status display is best-effort.
pub fn spawn_sensor_poll<F>(client: Arc<RobotClient>, period: Duration, apply: F) -> JoinHandle<()>
where
    F: Fn(SensorView) + Clone + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let mut ticks = tokio::time::interval(period);
        loop {
            ticks.tick().await;
            let client = Arc::clone(&client);
            let apply = apply.clone();
            tokio::spawn(async move {
                match client.sensor_data().await {
                    Ok(snapshot) => apply(SensorView::from_snapshot(&snapshot)),
                    Err(error) => {
                        tracing::debug!(%error, "sensor poll failed; keeping last view");
                    }
                }
            });
        }
    })
}

#[cfg(test)]
#[path = "tests/sensors_tests.rs"]
mod tests;
