//! Settings panel rendering for the service endpoint and version info.

use eframe::egui;

use super::UiApp;
use crate::config::normalize_endpoint;

impl UiApp {
    /// Renders the settings screen: comparison service address and versions.
    pub(super) fn render_settings_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Settings");
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            ui.label("Comparison service");
            ui.text_edit_singleline(&mut self.endpoint_input);
            if ui.button("Apply").clicked() {
                match normalize_endpoint(&self.endpoint_input) {
                    Some(url) => {
                        self.config.service_url = url;
                        self.endpoint_input = self.config.service_url.clone();
                        match self.config.save() {
                            Ok(()) => {
                                self.status =
                                    format!("Service address saved: {}", self.config.service_url);
                            }
                            Err(err) => {
                                tracing::warn!(%err, "could not save settings");
                                self.status = format!("Could not save settings: {err}");
                            }
                        }
                    }
                    None => {
                        self.status = "Service address cannot be empty.".to_string();
                    }
                }
            }
        });
        ui.label("Images are POSTed to /compare/ on this origin.");

        ui.add_space(16.0);
        ui.separator();
        ui.add_space(6.0);
        ui.heading("Versions");
        ui.label(format!("App version: {}", super::APP_VERSION));
    }
}
