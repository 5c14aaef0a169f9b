//! The two upload zones: previews, native file picker, drag-and-drop.

use std::path::PathBuf;

use eframe::egui;
use rfd::FileDialog;
use simscope_core::{SlotId, looks_like_image};

use super::{Panel, SlotTexture, UiApp, slot_index};

const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "webp", "bmp"];

impl UiApp {
    pub(super) fn render_upload_zones(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.columns(2, |columns| {
            self.render_zone(&mut columns[0], ctx, SlotId::A);
            self.render_zone(&mut columns[1], ctx, SlotId::B);
        });

        // A drop that landed outside both zones goes to the first empty slot.
        if let Some(path) = self.pending_drop.take() {
            let target = if self.form.slot(SlotId::A).is_empty() {
                SlotId::A
            } else {
                SlotId::B
            };
            self.accept_drop(target, path);
        }
    }

    fn render_zone(&mut self, ui: &mut egui::Ui, ctx: &egui::Context, id: SlotId) {
        let response = ui
            .group(|ui| {
                ui.label(egui::RichText::new(id.label()).strong());
                ui.add_space(4.0);

                if let Some((texture_id, size)) = self.slot_texture(ctx, id) {
                    ui.image(egui::load::SizedTexture::new(texture_id, size));
                } else if let Some(image) = self.form.slot(id).image() {
                    ui.label(format!("{} (no preview available)", image.file_name()));
                } else {
                    ui.label("Drop an image here or pick one below.");
                }

                ui.add_space(4.0);
                ui.horizontal(|ui| {
                    if ui.button("Pick image...").clicked()
                        && let Some(path) = FileDialog::new()
                            .add_filter("Images", &IMAGE_EXTENSIONS)
                            .add_filter("All files", &["*"])
                            .pick_file()
                    {
                        self.select_file(id, path);
                    }
                    let has_file = !self.form.slot(id).is_empty();
                    if ui.add_enabled(has_file, egui::Button::new("Clear")).clicked() {
                        self.form.clear(id);
                        self.slot_textures[slot_index(id)] = None;
                        self.result_textures = None;
                        self.status = format!("{} cleared.", id.label());
                    }
                });
            })
            .response;

        if self.pending_drop.is_some()
            && let Some(pos) = ctx.input(|i| i.pointer.latest_pos())
            && response.rect.contains(pos)
            && let Some(path) = self.pending_drop.take()
        {
            self.accept_drop(id, path);
        }
    }

    /// Stash the first file of this frame's drop, if any; the zones claim it
    /// during rendering. Drops only make sense while the compare panel is
    /// visible; anything pending from another panel is discarded.
    pub(super) fn collect_dropped_file(&mut self, ctx: &egui::Context) {
        if self.panel != Panel::Compare {
            self.pending_drop = None;
            return;
        }
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if let Some(file) = dropped.into_iter().next()
            && let Some(path) = file.path
        {
            self.pending_drop = Some(path);
        }
    }

    /// Extension check applies at the drop boundary only; the picker above
    /// accepts anything.
    fn accept_drop(&mut self, id: SlotId, path: PathBuf) {
        if !looks_like_image(&path) {
            self.status = format!("Ignored {}: not an image file.", path.display());
            return;
        }
        self.select_file(id, path);
    }

    /// Texture for the slot's current preview, rebuilt when the selection
    /// generation changes. Replacing the handle releases the old texture.
    fn slot_texture(
        &mut self,
        ctx: &egui::Context,
        id: SlotId,
    ) -> Option<(egui::TextureId, egui::Vec2)> {
        let preview = self.form.slot(id).preview()?;
        let index = slot_index(id);

        let stale = self.slot_textures[index]
            .as_ref()
            .is_none_or(|t| t.generation != preview.generation);
        if stale {
            let color = egui::ColorImage::from_rgba_unmultiplied(
                [preview.width as usize, preview.height as usize],
                &preview.rgba,
            );
            let handle = ctx.load_texture(
                format!("slot:{index}:{}", preview.generation),
                color,
                egui::TextureOptions::LINEAR,
            );
            self.slot_textures[index] = Some(SlotTexture {
                generation: preview.generation,
                handle,
            });
        }

        let size = egui::vec2(preview.width as f32, preview.height as f32);
        self.slot_textures[index]
            .as_ref()
            .map(|t| (t.handle.id(), size))
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::super::{Panel, UiApp};

    #[test]
    fn drops_are_discarded_outside_the_compare_panel() {
        let ctx = eframe::egui::Context::default();
        let mut app = UiApp::new();
        app.panel = Panel::Settings;
        app.pending_drop = Some(PathBuf::from("lingering.png"));

        app.collect_dropped_file(&ctx);
        assert!(app.pending_drop.is_none());
    }
}

