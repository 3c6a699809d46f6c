//! space-rhythm - Spacebar Rhythm Toy
//!
//! Press space in a steady rhythm. Every gap between presses becomes a bar
//! on the chart and a short sine tone, and the score rewards steady,
//! long, and on-pitch gaps.
//!
//! The window drives everything from its repaint loop:
//! - Space key events are captured at the start of each frame
//! - The chart is redrawn and the score recomputed every frame
//! - A repaint is requested unconditionally, so the loop never idles

use std::time::Instant;

use eframe::egui;

mod audio;
mod render;
mod score;
mod session;
mod settings;

use audio::ToneEngine;
use render::{BarChart, PainterSurface, SURFACE_HEIGHT, SURFACE_WIDTH};
use session::Session;
use settings::AppSettings;

const TITLE: &str = "Keyboard Space Press Visualization";

fn main() -> eframe::Result<()> {
    env_logger::init();
    log::info!("Starting space-rhythm");

    let settings = AppSettings::load();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([SURFACE_WIDTH + 40.0, SURFACE_HEIGHT + 120.0])
            .with_title("space-rhythm"),
        ..Default::default()
    };

    // Window or graphics context failures end the program here
    eframe::run_native(
        "space-rhythm",
        options,
        Box::new(move |cc| Ok(Box::new(RhythmApp::new(cc, settings)))),
    )
}

/// Count space presses (auto-repeat included) delivered this frame
fn space_presses(ctx: &egui::Context) -> usize {
    ctx.input(|i| {
        i.events
            .iter()
            .filter(|event| {
                matches!(
                    event,
                    egui::Event::Key {
                        key: egui::Key::Space,
                        pressed: true,
                        ..
                    }
                )
            })
            .count()
    })
}

/// Main application state
struct RhythmApp {
    /// Session start; press timestamps are measured from here
    epoch: Instant,
    session: Session,
    chart: BarChart,
    tones: ToneEngine,
    settings: AppSettings,
}

impl RhythmApp {
    fn new(_cc: &eframe::CreationContext<'_>, settings: AppSettings) -> Self {
        log::info!("Scoring {}", settings.score_mode.name());
        Self {
            epoch: Instant::now(),
            session: Session::new(settings.score_mode, settings.tone_duration()),
            chart: BarChart::with_settings(settings.chart_settings()),
            tones: ToneEngine::new(settings.tone_volume),
            settings,
        }
    }

    fn now_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }

    /// Feed this frame's space presses into the session
    fn capture_presses(&mut self, ctx: &egui::Context) {
        for _ in 0..space_presses(ctx) {
            let now = self.now_ms();
            self.session.press(now, &mut self.tones);
        }
    }
}

impl eframe::App for RhythmApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.request_repaint();

        self.capture_presses(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(TITLE);
            ui.separator();

            let (response, painter) = BarChart::allocate(ui);
            let mut surface =
                PainterSurface::new(&painter, response.rect.min, self.chart.settings.background);
            let score = self.session.render_frame(&self.chart, &mut surface);

            if self.session.log().is_empty() {
                ui.painter().text(
                    response.rect.center(),
                    egui::Align2::CENTER_CENTER,
                    "Press space to start",
                    egui::FontId::proportional(20.0),
                    egui::Color32::GRAY,
                );
            }

            ui.label(egui::RichText::new(format!("Score: {}", score)).size(24.0));

            ui.with_layout(egui::Layout::bottom_up(egui::Align::LEFT), |ui| {
                ui.horizontal(|ui| {
                    ui.small(format!("Presses: {}", self.session.log().len()));
                    ui.separator();
                    ui.small(format!("Scoring: {}", self.settings.score_mode.name()));
                    ui.separator();
                    ui.small(format!("Tones: {}", self.tones.active_tones()));
                    ui.separator();
                    ui.small(&self.tones.status);
                });
            });
        });
    }
}
