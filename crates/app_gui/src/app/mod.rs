//! Top-level egui application: owns the comparison form, the settings, and
//! the background submission channel.

mod results;
mod settings;
mod upload;

use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use eframe::{App, Frame, egui};
use simscope_core::{
    CompareClient, CompareError, CompareForm, ComparisonResult, ResultView, SelectedImage, SlotId,
    SubmissionStatus, format_score,
};

use crate::config::AppConfig;

pub(crate) const APP_VERSION: &str = env!("SIMSCOPE_VERSION");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Panel {
    Compare,
    Settings,
}

/// GPU texture built from a slot preview, tagged with the preview generation
/// it came from so a re-selection replaces it (and frees the old one).
pub(crate) struct SlotTexture {
    pub(crate) generation: u64,
    pub(crate) handle: egui::TextureHandle,
}

/// Textures for the two echoed images of the current result. `None` entries
/// mean the reference was not a decodable data URI.
pub(crate) struct ResultTextures {
    pub(crate) image_a: Option<egui::TextureHandle>,
    pub(crate) image_b: Option<egui::TextureHandle>,
}

type Outcome = (u64, Result<ComparisonResult, CompareError>);

pub struct UiApp {
    pub(crate) form: CompareForm,
    pub(crate) config: AppConfig,
    pub(crate) endpoint_input: String,
    pub(crate) panel: Panel,
    pub(crate) status: String,
    pub(crate) slot_textures: [Option<SlotTexture>; 2],
    pub(crate) result_textures: Option<ResultTextures>,
    pub(crate) pending_drop: Option<PathBuf>,
    outcome_tx: mpsc::Sender<Outcome>,
    outcome_rx: mpsc::Receiver<Outcome>,
}

impl UiApp {
    pub fn new() -> Self {
        let config = AppConfig::load();
        let (outcome_tx, outcome_rx) = mpsc::channel();
        Self {
            form: CompareForm::default(),
            endpoint_input: config.service_url.clone(),
            config,
            panel: Panel::Compare,
            status: String::new(),
            slot_textures: [None, None],
            result_textures: None,
            pending_drop: None,
            outcome_tx,
            outcome_rx,
        }
    }

    /// Read a file from disk into a slot, replacing the visible result.
    pub(crate) fn select_file(&mut self, id: SlotId, path: PathBuf) {
        match SelectedImage::load(&path) {
            Ok(image) => {
                self.form.select(id, image);
                self.result_textures = None;
                self.status = format!("{}: {}", id.label(), path.display());
            }
            Err(err) => {
                tracing::warn!(%err, "could not read selected file");
                self.status = err.to_string();
            }
        }
    }

    /// Kick off a submission on a worker thread. The UI thread stays free;
    /// the outcome comes back through the channel with its ticket.
    fn start_comparison(&mut self, ctx: &egui::Context) {
        let pending = match self.form.begin_submission() {
            Ok(pending) => pending,
            Err(err) => {
                self.status = err.to_string();
                return;
            }
        };
        self.result_textures = None;
        self.status = "Comparing images...".to_string();

        let client = CompareClient::new(self.config.service_url.clone());
        let tx = self.outcome_tx.clone();
        let ctx = ctx.clone();
        thread::spawn(move || {
            let outcome = client.compare(&pending.request);
            if tx.send((pending.ticket, outcome)).is_ok() {
                ctx.request_repaint();
            }
        });
    }

    fn drain_outcomes(&mut self) {
        while let Ok((ticket, outcome)) = self.outcome_rx.try_recv() {
            // A stale outcome must not touch what is currently displayed.
            if !self.form.finish_submission(ticket, outcome) {
                continue;
            }
            self.result_textures = None;
            match self.form.view() {
                ResultView::Success(result) => {
                    self.status = format!("Similarity: {}", format_score(result.score));
                }
                ResultView::Failure(message) => {
                    self.status = message.to_string();
                }
                _ => {}
            }
        }
    }
}

impl App for UiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.drain_outcomes();
        self.collect_dropped_file(ctx);

        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("SimScope");
                ui.separator();

                if ui
                    .add_enabled(self.form.can_submit(), egui::Button::new("Compare"))
                    .clicked()
                {
                    self.start_comparison(ctx);
                }
                if self.form.status() == SubmissionStatus::InFlight {
                    ui.spinner();
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let open = self.panel == Panel::Settings;
                    if ui.selectable_label(open, "Settings").clicked() {
                        self.panel = if open { Panel::Compare } else { Panel::Settings };
                    }
                });
            });
            if !self.status.is_empty() {
                ui.label(&self.status);
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| match self.panel {
            Panel::Settings => self.render_settings_panel(ui),
            Panel::Compare => {
                self.render_upload_zones(ui, ctx);
                ui.add_space(12.0);
                self.render_results(ui, ctx);
            }
        });
    }
}

pub(crate) fn slot_index(id: SlotId) -> usize {
    match id {
        SlotId::A => 0,
        SlotId::B => 1,
    }
}
