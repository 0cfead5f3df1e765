use anyhow::{bail, Context, Result};
use reqwest::Client;
use shared::{
    domain::{Direction, Mode, RecordingState, RobotAction},
    protocol::{
        ModeAck, ModeRequest, MoveAck, MoveRequest, RecordRequest, SensorSnapshot, SpeakRequest,
    },
};
use url::Url;

pub mod controller;
pub mod sensors;

/// HTTP client for the robot control server. One method per intent; bodies
/// are JSON and any non-2xx status surfaces as an error. Whether a failure
/// is swallowed or shown is the caller's call, not the transport's.
pub struct RobotClient {
    http: Client,
    server_url: String,
}

impl RobotClient {
    pub fn new(server_url: impl Into<String>) -> Result<Self> {
        let server_url = server_url.into();
        let parsed = Url::parse(&server_url)
            .with_context(|| format!("invalid control server url '{server_url}'"))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            bail!(
                "control server url must be http(s), got '{}'",
                parsed.scheme()
            );
        }
        Ok(Self {
            http: Client::new(),
            server_url: server_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub async fn move_robot(&self, direction: Direction) -> Result<MoveAck> {
        let ack = self
            .http
            .post(format!("{}/move", self.server_url))
            .json(&MoveRequest { direction })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(ack)
    }

    pub async fn stop(&self) -> Result<()> {
        self.http
            .post(format!("{}/stop", self.server_url))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    pub async fn set_mode(&self, mode: Mode) -> Result<ModeAck> {
        let ack = self
            .http
            .post(format!("{}/mode", self.server_url))
            .json(&ModeRequest { mode })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(ack)
    }

    pub async fn record(&self, status: RecordingState) -> Result<()> {
        self.http
            .post(format!("{}/record", self.server_url))
            .json(&RecordRequest { status })
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    pub async fn action(&self, action: RobotAction) -> Result<()> {
        self.http
            .post(format!("{}/action", self.server_url))
            .json(&action)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    pub async fn speak(&self, text: &str) -> Result<()> {
        self.http
            .post(format!("{}/speak", self.server_url))
            .json(&SpeakRequest {
                text: text.to_string(),
            })
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    pub async fn shutdown(&self) -> Result<()> {
        self.http
            .post(format!("{}/shutdown", self.server_url))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    pub async fn sensor_data(&self) -> Result<SensorSnapshot> {
        let snapshot = self
            .http
            .get(format!("{}/sensor_data", self.server_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(snapshot)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
