use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;

mod backend_bridge;
mod controller;
mod ui;

use backend_bridge::runtime::{spawn_backend_worker, BackendOptions};
use ui::app::ConsoleApp;

/// Operator console for the rescue robot control server.
#[derive(Debug, Parser)]
struct Args {
    /// Base URL of the robot control server.
    #[arg(long, default_value = "http://127.0.0.1:5000")]
    server_url: String,
    /// Sensor poll period in milliseconds.
    #[arg(long, default_value_t = 1000)]
    poll_interval_ms: u64,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    let (cmd_tx, cmd_rx) = bounded(256);
    let (ui_tx, ui_rx) = bounded(2048);
    spawn_backend_worker(
        cmd_rx,
        ui_tx,
        BackendOptions {
            server_url: args.server_url,
            poll_interval: std::time::Duration::from_millis(args.poll_interval_ms),
        },
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Rescue Robot Console")
            .with_inner_size([1080.0, 720.0])
            .with_min_inner_size([820.0, 560.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Rescue Robot Console",
        options,
        Box::new(|_cc| Ok(Box::new(ConsoleApp::new(cmd_tx, ui_rx)))),
    )
}
