use std::time::Duration;

use auth_core::ResultMessage;
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;
use crate::controller::reducer::LoginTestState;

const MONO_BLOCK_FILL: egui::Color32 = egui::Color32::from_rgb(0xf0, 0xf0, 0xf0);

pub struct LoginProbeApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    state: LoginTestState,
}

impl LoginProbeApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        state: LoginTestState,
    ) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            state,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> &LoginTestState {
        &self.state
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            self.state.apply(event);
        }
    }

    fn dispatch(&mut self, cmd: BackendCommand) -> Result<(), String> {
        let mut status = String::new();
        if dispatch_backend_command(&self.cmd_tx, cmd, &mut status) {
            return Ok(());
        }
        self.state.show_error(UiError::from_message(
            UiErrorContext::Dispatch,
            status.clone(),
        ));
        Err(status)
    }

    fn on_mount(&mut self) {
        if let Some(cmd) = self.state.mount() {
            tracing::warn!("login probe mounted; initializing auth store");
            let _ = self.dispatch(cmd);
        }
    }

    fn run_test(&mut self) {
        tracing::warn!("login probe test started");
        let (attempt, cmd) = self.state.begin_test();
        if let Err(reason) = self.dispatch(cmd) {
            self.state.abandon_attempt(attempt, reason);
        }
    }

    fn mono_block(ui: &mut egui::Ui, text: &str, fill: Option<egui::Color32>) {
        let mut frame = egui::Frame::NONE.inner_margin(egui::Margin::same(10));
        if let Some(fill) = fill {
            frame = frame.fill(fill);
        }
        frame.show(ui, |ui| {
            let mut label = egui::RichText::new(text).monospace();
            if fill.is_some() {
                label = label.color(egui::Color32::BLACK);
            }
            ui.add(egui::Label::new(label).selectable(true));
        });
    }

    fn labelled_field(ui: &mut egui::Ui, label: &str, value: &mut String, masked: bool) -> bool {
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(label).monospace());
            ui.add(
                egui::TextEdit::singleline(value)
                    .password(masked)
                    .desired_width(260.0),
            )
            .changed()
        })
        .inner
    }

    fn show_banner(&self, ui: &mut egui::Ui) {
        if let Some(error) = self.state.banner() {
            ui.colored_label(
                ui.visuals().error_fg_color,
                format!(
                    "{} ({}): {}",
                    error.category().label(),
                    error.context().label(),
                    error.message()
                ),
            );
        }
    }

    /// Renders one frame of the page.
    pub fn show(&mut self, ctx: &egui::Context) {
        self.on_mount();
        self.process_ui_events();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("🧪 Login test page");
            self.show_banner(ui);
            ui.add_space(20.0);

            ui.label(egui::RichText::new("AuthStore state:").strong());
            Self::mono_block(ui, &self.state.snapshot().to_pretty_json(), None);
            ui.add_space(20.0);

            ui.label(egui::RichText::new("Login test:").strong());
            let mut email_buf = self.state.email().to_string();
            if Self::labelled_field(ui, "Email:   ", &mut email_buf, false) {
                self.state.set_email(email_buf);
            }
            let mut password_buf = self.state.password().to_string();
            if Self::labelled_field(ui, "Password:", &mut password_buf, true) {
                self.state.set_password(password_buf);
            }
            if ui
                .add(egui::Button::new("Run login test").min_size(egui::vec2(160.0, 32.0)))
                .clicked()
            {
                self.run_test();
            }
            ui.add_space(20.0);

            ui.label(egui::RichText::new("Result:").strong());
            let result = match self.state.result() {
                ResultMessage::Empty => String::new(),
                message => message.to_string(),
            };
            Self::mono_block(ui, &result, Some(MONO_BLOCK_FILL));

            ui.add_space(10.0);
            ui.separator();
            ui.horizontal_wrapped(|ui| {
                ui.small("Status:");
                ui.small(egui::RichText::new(self.state.status()).weak());
                if self.state.in_flight() > 0 {
                    ui.small(format!("({} attempt(s) in flight)", self.state.in_flight()));
                }
            });
        });
    }
}

impl eframe::App for LoginProbeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.show(ctx);
        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

#[cfg(test)]
#[path = "tests/app_tests.rs"]
mod tests;
