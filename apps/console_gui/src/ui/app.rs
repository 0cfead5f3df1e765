//! Console UI: drive pad, sensor tiles, comms panel, and confirm dialogs.

use client_core::{
    controller::{reduce, Command, ControlEvent, ControlState, DriveKey, Effect},
    sensors::{ChannelStatus, SensorView},
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::{Direction, Mode};

use crate::controller::{events::UiEvent, orchestration::dispatch_backend_command};

const DRIVE_KEY_BINDINGS: [(egui::Key, DriveKey); 8] = [
    (egui::Key::W, DriveKey::W),
    (egui::Key::A, DriveKey::A),
    (egui::Key::S, DriveKey::S),
    (egui::Key::D, DriveKey::D),
    (egui::Key::ArrowUp, DriveKey::ArrowUp),
    (egui::Key::ArrowDown, DriveKey::ArrowDown),
    (egui::Key::ArrowLeft, DriveKey::ArrowLeft),
    (egui::Key::ArrowRight, DriveKey::ArrowRight),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfirmAction {
    MedKit,
    Shutdown,
}

impl ConfirmAction {
    fn prompt(self) -> &'static str {
        match self {
            ConfirmAction::MedKit => "Deploy the med kit? This can only be done once.",
            ConfirmAction::Shutdown => "Shut down the robot control server?",
        }
    }
}

pub struct ConsoleApp {
    cmd_tx: Sender<Command>,
    ui_rx: Receiver<UiEvent>,
    control: ControlState,
    sensors: SensorView,
    highlight: Option<Direction>,
    status: String,
    speak_text: String,
    /// True while the speak field has focus; drive keys are suppressed.
    typing: bool,
    /// Pad button currently held by the pointer.
    pad_down: Option<Direction>,
    confirm: Option<ConfirmAction>,
}

impl ConsoleApp {
    pub fn new(cmd_tx: Sender<Command>, ui_rx: Receiver<UiEvent>) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            control: ControlState::new(),
            sensors: SensorView::default(),
            highlight: None,
            status: "Connecting...".to_string(),
            speak_text: String::new(),
            typing: false,
            pad_down: None,
            confirm: None,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) | UiEvent::Status(message) => self.status = message,
                UiEvent::SensorUpdated(view) => self.sensors = view,
            }
        }
    }

    /// Runs one event through the dispatch reducer and carries out the
    /// effects it returns.
    fn apply(&mut self, event: ControlEvent) {
        let (next, effects) = reduce(self.control, event);
        self.control = next;
        for effect in effects {
            match effect {
                Effect::Command(command) => {
                    dispatch_backend_command(&self.cmd_tx, command, &mut self.status);
                }
                Effect::Highlight(direction) => self.highlight = Some(direction),
                Effect::ClearHighlight => self.highlight = None,
                Effect::Notice(message) => self.status = message,
            }
        }
    }

    fn handle_drive_keys(&mut self, ctx: &egui::Context) {
        let typing = self.typing;
        let mut events = Vec::new();
        ctx.input(|input| {
            for (key, drive_key) in DRIVE_KEY_BINDINGS {
                if input.key_pressed(key) {
                    events.push(ControlEvent::KeyDown {
                        key: drive_key,
                        typing,
                    });
                }
                if input.key_released(key) {
                    events.push(ControlEvent::KeyUp { key: drive_key });
                }
            }
        });
        for event in events {
            self.apply(event);
        }
    }

    fn show_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("mode_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new("RESCUE ROBOT CONSOLE").strong());
                    ui.separator();
                    let mode = self.control.mode;
                    let mode_color = match mode {
                        Mode::Manual => egui::Color32::from_rgb(35, 165, 90),
                        Mode::Idle => egui::Color32::GRAY,
                    };
                    if ui
                        .button(egui::RichText::new(mode.label()).color(mode_color).strong())
                        .on_hover_text("Toggle manual/idle")
                        .clicked()
                    {
                        self.apply(ControlEvent::ToggleMode);
                    }
                    ui.separator();
                    ui.label(egui::RichText::new(&self.status).weak());
                });
            });
    }

    fn show_critical_banner(&mut self, ctx: &egui::Context) {
        if !self.sensors.banner_visible {
            return;
        }
        egui::TopBottomPanel::top("critical_alert")
            .resizable(false)
            .show(ctx, |ui| {
                egui::Frame::NONE
                    .fill(egui::Color32::from_rgb(111, 53, 53))
                    .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)))
                    .corner_radius(4.0)
                    .inner_margin(egui::Margin::symmetric(10, 8))
                    .show(ui, |ui| {
                        ui.horizontal_wrapped(|ui| {
                            ui.label(
                                egui::RichText::new("CRITICAL ALERT: VIOLENCE DETECTED")
                                    .color(egui::Color32::WHITE)
                                    .strong(),
                            );
                        });
                    });
            });
    }

    fn sensor_tile(ui: &mut egui::Ui, label: &str, status: &ChannelStatus) {
        let color = if status.alert {
            egui::Color32::from_rgb(240, 71, 71)
        } else {
            egui::Color32::from_rgb(185, 187, 190)
        };
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(label).strong());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(egui::RichText::new(&status.text).color(color));
            });
        });
        ui.separator();
    }

    fn show_sensor_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("sensor_panel")
            .resizable(false)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.label(egui::RichText::new("SENSORS").strong());
                ui.separator();
                Self::sensor_tile(ui, "FIRE", &self.sensors.fire);
                Self::sensor_tile(ui, "GAS", &self.sensors.gas);
                Self::sensor_tile(ui, "VIBRATION", &self.sensors.vibration);
                Self::sensor_tile(ui, "AUDIO", &self.sensors.audio);
            });
    }

    fn show_comms_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("comms_panel")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let record_label = if self.control.recording {
                        "STOP REC"
                    } else {
                        "RECORD"
                    };
                    if ui.button(record_label).clicked() {
                        self.apply(ControlEvent::ToggleRecording);
                    }

                    let lights_label = if self.control.lights_on {
                        "LIGHTS OFF"
                    } else {
                        "LIGHTS ON"
                    };
                    if ui.button(lights_label).clicked() {
                        self.apply(ControlEvent::ToggleLights);
                    }

                    if ui.button("MED KIT").clicked() {
                        if self.control.medkit_deployed {
                            self.apply(ControlEvent::DeployMedKit { confirmed: false });
                        } else {
                            self.confirm = Some(ConfirmAction::MedKit);
                        }
                    }

                    if ui.button("SHUTDOWN").clicked() {
                        self.confirm = Some(ConfirmAction::Shutdown);
                    }
                });

                ui.horizontal(|ui| {
                    ui.label("SAY:");
                    let edit = egui::TextEdit::singleline(&mut self.speak_text)
                        .hint_text("Message for the onboard speaker");
                    let response = ui.add_sized([ui.available_width(), 24.0], edit);
                    self.typing = response.has_focus();
                    if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        let text = std::mem::take(&mut self.speak_text);
                        self.apply(ControlEvent::Speak { text });
                        response.request_focus();
                    }
                });
                ui.add_space(4.0);
            });
    }

    fn pad_button(
        ui: &mut egui::Ui,
        label: &str,
        direction: Direction,
        highlight: Option<Direction>,
        pressed: &mut Option<Direction>,
    ) {
        let fill = if highlight == Some(direction) {
            egui::Color32::from_rgb(88, 101, 242)
        } else {
            egui::Color32::from_rgb(70, 75, 90)
        };
        let response = ui.add_sized(
            [72.0, 72.0],
            egui::Button::new(egui::RichText::new(label).size(24.0)).fill(fill),
        );
        if response.is_pointer_button_down_on() {
            *pressed = Some(direction);
        }
    }

    fn show_drive_pad(&mut self, ctx: &egui::Context) {
        let mut pressed = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(16.0);
            ui.vertical_centered(|ui| {
                ui.label(egui::RichText::new("DRIVE").strong());
                ui.add_space(8.0);
                Self::pad_button(ui, "▲", Direction::Forward, self.highlight, &mut pressed);
            });
            ui.horizontal(|ui| {
                ui.add_space((ui.available_width() / 2.0 - 112.0).max(0.0));
                Self::pad_button(ui, "◀", Direction::Left, self.highlight, &mut pressed);
                Self::pad_button(ui, "▼", Direction::Back, self.highlight, &mut pressed);
                Self::pad_button(ui, "▶", Direction::Right, self.highlight, &mut pressed);
            });
        });

        // Pointer pad presses pair up like touch start/end.
        match (self.pad_down, pressed) {
            (None, Some(direction)) => {
                self.pad_down = Some(direction);
                self.apply(ControlEvent::PadPress { direction });
            }
            (Some(_), None) => {
                self.pad_down = None;
                self.apply(ControlEvent::PadRelease);
            }
            (Some(previous), Some(direction)) if previous != direction => {
                self.pad_down = Some(direction);
                self.apply(ControlEvent::PadPress { direction });
            }
            _ => {}
        }
    }

    fn show_confirm_dialog(&mut self, ctx: &egui::Context) {
        let Some(action) = self.confirm else { return };
        egui::Window::new("confirm_action")
            .title_bar(false)
            .resizable(false)
            .collapsible(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(action.prompt());
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Confirm").clicked() {
                        match action {
                            ConfirmAction::MedKit => {
                                self.apply(ControlEvent::DeployMedKit { confirmed: true });
                            }
                            ConfirmAction::Shutdown => {
                                self.apply(ControlEvent::Shutdown { confirmed: true });
                                self.status = "System halting...".to_string();
                            }
                        }
                        self.confirm = None;
                    }
                    if ui.button("Cancel").clicked() {
                        self.confirm = None;
                    }
                });
            });
    }
}

impl eframe::App for ConsoleApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        self.show_top_bar(ctx);
        self.show_critical_banner(ctx);
        self.show_comms_panel(ctx);
        self.show_sensor_panel(ctx);
        self.show_drive_pad(ctx);
        self.show_confirm_dialog(ctx);

        self.handle_drive_keys(ctx);

        // Sensor updates arrive off-thread; keep repainting while idle.
        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}
