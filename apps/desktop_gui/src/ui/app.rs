use std::time::{Duration, Instant};

use arboard::Clipboard;
use client_core::resolve_against;
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::Category;
use url::Url;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::controller::orchestration::dispatch_backend_command;
use crate::controller::reducer::{FormState, UiEffect};
use crate::ui::theme;

#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub server_url: Url,
}

pub struct MeditationApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    server_url: Url,
    form: FormState,
}

fn group_heading(category: Category) -> &'static str {
    match category {
        Category::Emotions => "Select Your Current Emotions",
        Category::Goals => "Select Your Meditation Goals",
        Category::Outcomes => "Select Your Desired Outcomes",
    }
}

impl MeditationApp {
    pub fn bootstrap(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        startup: StartupConfig,
    ) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            server_url: startup.server_url,
            form: FormState::new(),
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            self.dispatch(event);
        }
    }

    fn dispatch(&mut self, event: UiEvent) {
        if !matches!(event, UiEvent::Tick) {
            tracing::debug!(event = event.name(), "ui event");
        }
        for effect in self.form.apply(event, Instant::now()) {
            self.run_effect(effect);
        }
    }

    fn run_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Generate(request) => {
                let cmd = BackendCommand::GenerateMeditation { request };
                if let Err(err) = dispatch_backend_command(&self.cmd_tx, cmd) {
                    self.dispatch(UiEvent::GenerationFailed(err));
                }
            }
            UiEffect::CopyToClipboard(text) => match write_clipboard_text(&text) {
                Ok(()) => self.dispatch(UiEvent::CopySucceeded),
                Err(reason) => self.dispatch(UiEvent::CopyFailed(reason)),
            },
        }
    }

    fn show_tag_group(&self, ui: &mut egui::Ui, category: Category, pending: &mut Vec<UiEvent>) {
        let invalid = self.form.is_category_invalid(category);
        let palette = theme::tag_palette(category);

        egui::Frame::new()
            .stroke(theme::group_stroke(invalid, ui.visuals()))
            .corner_radius(10.0)
            .inner_margin(egui::Margin::symmetric(14, 12))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(egui::RichText::new(group_heading(category)).strong().size(16.0));
                ui.add_space(6.0);
                ui.horizontal_wrapped(|ui| {
                    for tag in self.form.selection().tags(category) {
                        let (fill, text) = if tag.selected {
                            (palette.selected_fill, palette.selected_text)
                        } else {
                            (palette.idle_fill, palette.idle_text)
                        };
                        let button = egui::Button::new(egui::RichText::new(tag.label).color(text))
                            .fill(fill)
                            .corner_radius(12.0)
                            .min_size(egui::vec2(0.0, 28.0));
                        if ui.add(button).clicked() {
                            pending.push(UiEvent::TagToggled {
                                category,
                                label: tag.label.to_string(),
                            });
                        }
                    }
                });
            });
    }

    fn show_submit_row(&self, ui: &mut egui::Ui, pending: &mut Vec<UiEvent>) {
        if let Some(instructions) = self.form.instructions() {
            ui.label(egui::RichText::new(instructions).color(theme::INVALID_BORDER));
        }

        ui.horizontal(|ui| {
            let button = egui::Button::new(egui::RichText::new("Generate Meditation").strong())
                .min_size(egui::vec2(200.0, 36.0));
            if ui.add_enabled(self.form.submit_enabled(), button).clicked() {
                pending.push(UiEvent::SubmitClicked);
            }
            if self.form.is_loading() {
                ui.add(egui::Spinner::new());
                ui.weak("Generating your meditation...");
            }
        });
    }

    fn show_error_banner(&mut self, ui: &mut egui::Ui, pending: &mut Vec<UiEvent>) {
        let scroll = self.form.take_scroll_to_error();
        let Some(banner) = self.form.error() else {
            return;
        };

        let response = egui::Frame::NONE
            .fill(theme::ERROR_FILL)
            .stroke(egui::Stroke::new(1.0, theme::ERROR_STROKE))
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(10, 8))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(egui::RichText::new("Error").strong().color(egui::Color32::WHITE));
                ui.label(egui::RichText::new(banner.message()).color(egui::Color32::WHITE));
                if banner.offers_retry() {
                    ui.add_space(6.0);
                    let retry = egui::Button::new(
                        egui::RichText::new("Try Again").strong().color(egui::Color32::WHITE),
                    )
                    .fill(theme::RETRY_FILL);
                    if ui.add(retry).clicked() {
                        pending.push(UiEvent::RetryClicked);
                    }
                }
            })
            .response;
        if scroll {
            response.scroll_to_me(Some(egui::Align::Center));
        }
    }

    fn show_result(&mut self, ui: &mut egui::Ui, now: Instant, pending: &mut Vec<UiEvent>) {
        let scroll = self.form.take_scroll_to_result();
        let Some(result) = self.form.result() else {
            return;
        };
        let audio_url = resolve_against(&self.server_url, &result.audio_src);
        let mut play_clicked = false;

        let response = egui::Frame::new()
            .stroke(egui::Stroke::new(
                1.0,
                ui.visuals().widgets.noninteractive.bg_stroke.color,
            ))
            .corner_radius(10.0)
            .inner_margin(egui::Margin::symmetric(14, 12))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                match &result.title {
                    Some(title) => ui.heading(title),
                    None => ui.heading("Your Personalized Meditation Script"),
                };
                if let Some(duration) = &result.duration_label {
                    ui.weak(format!("Duration: {duration}"));
                }
                ui.add_space(6.0);
                ui.add(egui::Label::new(result.script.as_str()).selectable(true).wrap());
                ui.add_space(6.0);

                let copy = egui::Button::new(self.form.copy_label(now));
                if ui.add_enabled(self.form.copy_enabled(now), copy).clicked() {
                    pending.push(UiEvent::CopyClicked);
                }

                ui.separator();
                ui.label(egui::RichText::new("Listen to Your Meditation").strong());
                ui.horizontal_wrapped(|ui| {
                    if ui
                        .button("Play Audio")
                        .on_hover_text("Opens the audio in your default media player.")
                        .clicked()
                    {
                        play_clicked = true;
                    }
                    ui.add(egui::Label::new(egui::RichText::new(&audio_url).weak()).selectable(true));
                });
            })
            .response;
        if scroll {
            response.scroll_to_me(Some(egui::Align::Min));
        }

        if play_clicked {
            if let Err(err) = open_in_external_player(&audio_url) {
                tracing::warn!(%audio_url, "failed to open audio: {err}");
                pending.push(UiEvent::Info(format!("Failed to open audio player: {err}")));
            }
        }
    }
}

impl eframe::App for MeditationApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.dispatch(UiEvent::Tick);

        let now = Instant::now();
        let mut pending = Vec::new();

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.small("Status:");
                ui.small(egui::RichText::new(self.form.status()).weak());
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Meditate for Me");
                ui.weak("Pick how you feel, what you want, and where you want to end up.");
                ui.add_space(10.0);

                for category in Category::ALL {
                    self.show_tag_group(ui, category, &mut pending);
                    ui.add_space(8.0);
                }

                self.show_submit_row(ui, &mut pending);
                ui.add_space(10.0);
                self.show_error_banner(ui, &mut pending);
                ui.add_space(10.0);
                self.show_result(ui, now, &mut pending);
            });
        });

        for event in pending {
            self.dispatch(event);
        }

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

fn write_clipboard_text(text: &str) -> Result<(), String> {
    let mut clipboard = Clipboard::new().map_err(|err| err.to_string())?;
    clipboard
        .set_text(text.to_string())
        .map_err(|err| err.to_string())
}

fn open_in_external_player(url: &str) -> std::io::Result<()> {
    #[cfg(target_os = "windows")]
    let result = std::process::Command::new("cmd")
        .args(["/C", "start", "", url])
        .spawn();

    #[cfg(target_os = "macos")]
    let result = std::process::Command::new("open").arg(url).spawn();

    #[cfg(all(unix, not(target_os = "macos")))]
    let result = std::process::Command::new("xdg-open").arg(url).spawn();

    result.map(|_| ())
}
