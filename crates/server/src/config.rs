use std::fs;

use serde::Deserialize;

#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub(crate) server_bind: String,
    /// Device or pipe the sensor telemetry lines are read from. Unset means
    /// the server runs with default readings only.
    pub(crate) telemetry_path: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:5000".into(),
            telemetry_path: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    bind_addr: Option<String>,
    telemetry_path: Option<String>,
}

pub(crate) fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("server.toml") {
        apply_file_config(&mut settings, &raw);
    }

    if let Ok(v) = std::env::var("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Ok(v) = std::env::var("TELEMETRY_PATH") {
        settings.telemetry_path = Some(v);
    }

    settings
}

fn apply_file_config(settings: &mut Settings, raw: &str) {
    let Ok(file_cfg) = toml::from_str::<FileConfig>(raw) else {
        tracing::warn!("ignoring malformed server.toml");
        return;
    };
    if let Some(v) = file_cfg.bind_addr {
        settings.server_bind = v;
    }
    if let Some(v) = file_cfg.telemetry_path {
        settings.telemetry_path = Some(v);
    }
}
