//! Results section: score, explanation, and the echoed images.

use eframe::egui;
use simscope_core::{ResultView, decode_data_uri, format_score};

use super::{ResultTextures, UiApp};

impl UiApp {
    pub(super) fn render_results(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        // Build echo textures lazily, once per result.
        if self.result_textures.is_none()
            && let ResultView::Success(result) = self.form.view()
        {
            let (a, b) = (result.image_a_uri.clone(), result.image_b_uri.clone());
            self.result_textures = Some(ResultTextures {
                image_a: load_echo_texture(ctx, "echo:a", &a),
                image_b: load_echo_texture(ctx, "echo:b", &b),
            });
        }

        match self.form.view() {
            ResultView::Nothing => {}
            ResultView::Pending => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Waiting for the comparison service...");
                });
            }
            ResultView::Failure(message) => {
                ui.colored_label(ui.visuals().error_fg_color, message);
            }
            ResultView::Success(result) => {
                ui.heading("Results");
                ui.add_space(4.0);
                ui.label("Similarity score:");
                ui.label(
                    egui::RichText::new(format_score(result.score))
                        .size(40.0)
                        .strong(),
                );
                ui.add_space(8.0);

                let textures = self.result_textures.as_ref();
                ui.columns(2, |columns| {
                    render_echo(
                        &mut columns[0],
                        "Image 1",
                        textures.and_then(|t| t.image_a.as_ref()),
                        &result.image_a_uri,
                    );
                    render_echo(
                        &mut columns[1],
                        "Image 2",
                        textures.and_then(|t| t.image_b.as_ref()),
                        &result.image_b_uri,
                    );
                });

                ui.add_space(8.0);
                // Rendered verbatim; label keeps the service's line breaks.
                ui.label(&result.explanation);
            }
        }
    }
}

fn render_echo(
    ui: &mut egui::Ui,
    label: &str,
    texture: Option<&egui::TextureHandle>,
    uri: &str,
) {
    ui.label(egui::RichText::new(label).strong());
    match texture {
        Some(handle) => {
            let size = handle.size_vec2();
            let scale = (320.0 / size.x.max(size.y)).min(1.0);
            ui.image(egui::load::SizedTexture::new(handle.id(), size * scale));
        }
        None => {
            ui.label(uri);
        }
    }
}

fn load_echo_texture(
    ctx: &egui::Context,
    name: &str,
    uri: &str,
) -> Option<egui::TextureHandle> {
    let bytes = decode_data_uri(uri)?;
    let decoded = match image::load_from_memory(&bytes) {
        Ok(img) => img.to_rgba8(),
        Err(err) => {
            tracing::warn!(%err, "echoed image did not decode");
            return None;
        }
    };
    let (width, height) = decoded.dimensions();
    let color = egui::ColorImage::from_rgba_unmultiplied(
        [width as usize, height as usize],
        &decoded.into_raw(),
    );
    Some(ctx.load_texture(name, color, egui::TextureOptions::LINEAR))
}
