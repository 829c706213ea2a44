//! Plot Viewer Widget
//! Central panel: dashboard title, dataset preview, status messages and the
//! most recently rendered plot.

use crate::data::DatasetPreview;
use crate::error::Failure;
use egui::{Color32, RichText, ScrollArea, TextureHandle};

const TITLE: &str = "Customer Data Visualization Dashboard";

/// Outcome of the last interaction, shown above the plot.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusMessage {
    Success(String),
    Warning(String),
    Error(Failure),
}

#[derive(Default)]
pub struct PlotViewer {
    preview: Option<DatasetPreview>,
    status: Option<StatusMessage>,
    texture: Option<TextureHandle>,
    plot_name: Option<String>,
}

impl PlotViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_preview(&mut self, preview: Option<DatasetPreview>) {
        self.preview = preview;
    }

    pub fn set_status(&mut self, status: StatusMessage) {
        self.status = Some(status);
    }

    /// Drop the displayed plot.
    pub fn clear_plot(&mut self) {
        self.texture = None;
        self.plot_name = None;
    }

    pub fn plot_name(&self) -> Option<&str> {
        self.plot_name.as_deref()
    }

    /// Decode PNG bytes into a texture. A plot that fails to decode is
    /// reported as an error and the previous plot stays visible.
    pub fn set_plot(&mut self, ctx: &egui::Context, name: &str, png: &[u8]) {
        match image::load_from_memory(png) {
            Ok(decoded) => {
                let rgba = decoded.to_rgba8();
                let size = [rgba.width() as usize, rgba.height() as usize];
                let image = egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
                self.texture = Some(ctx.load_texture(name, image, egui::TextureOptions::LINEAR));
                self.plot_name = Some(name.to_string());
            }
            Err(e) => {
                tracing::error!(plot = %name, error = %e, "Failed to decode plot for display");
                self.status = Some(StatusMessage::Error(Failure::from_error(e)));
            }
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        ScrollArea::vertical().show(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(5.0);
                ui.label(RichText::new(TITLE).size(24.0).strong());
            });
            ui.add_space(10.0);

            match &self.preview {
                Some(preview) => Self::show_preview(ui, preview),
                None => {
                    ui.label(
                        RichText::new("Upload a CSV file to get started")
                            .size(14.0)
                            .color(Color32::GRAY),
                    );
                }
            }

            ui.add_space(10.0);
            if let Some(status) = &self.status {
                Self::show_status(ui, status);
            }

            if let (Some(texture), Some(name)) = (&self.texture, &self.plot_name) {
                ui.add_space(10.0);
                ui.separator();
                ui.label(RichText::new(name).size(12.0).color(Color32::GRAY));
                ui.add(egui::Image::new(texture).shrink_to_fit());
            }
        });
    }

    fn show_preview(ui: &mut egui::Ui, preview: &DatasetPreview) {
        ui.label(RichText::new("Dataset Preview").size(14.0).strong());
        ui.add_space(5.0);
        ScrollArea::horizontal()
            .id_salt("preview_scroll")
            .show(ui, |ui| {
                egui::Grid::new("dataset_preview")
                    .striped(true)
                    .min_col_width(60.0)
                    .show(ui, |ui| {
                        for header in &preview.headers {
                            ui.label(RichText::new(header).strong());
                        }
                        ui.end_row();
                        for row in &preview.rows {
                            for cell in row {
                                ui.label(cell);
                            }
                            ui.end_row();
                        }
                    });
            });
    }

    fn show_status(ui: &mut egui::Ui, status: &StatusMessage) {
        match status {
            StatusMessage::Success(message) => {
                ui.label(RichText::new(message).color(Color32::from_rgb(40, 167, 69)));
            }
            StatusMessage::Warning(message) => {
                ui.label(RichText::new(message).color(Color32::from_rgb(255, 193, 7)));
            }
            StatusMessage::Error(failure) => {
                ui.label(RichText::new(&failure.message).color(Color32::from_rgb(220, 53, 69)));
                egui::CollapsingHeader::new("Details")
                    .default_open(true)
                    .show(ui, |ui| {
                        ui.label(RichText::new(&failure.trace).monospace().size(11.0));
                    });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn tiny_png() -> Vec<u8> {
        let mut bytes = Vec::new();
        image::RgbImage::new(2, 2)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn clear_plot_drops_the_texture() {
        let ctx = egui::Context::default();
        let mut viewer = PlotViewer::new();
        viewer.set_plot(&ctx, "histogram_a", &tiny_png());
        assert_eq!(viewer.plot_name(), Some("histogram_a"));

        viewer.set_status(StatusMessage::Warning("nothing to plot".to_string()));
        viewer.clear_plot();
        assert_eq!(viewer.plot_name(), None);
        assert!(viewer.texture.is_none());
        assert!(matches!(viewer.status, Some(StatusMessage::Warning(_))));
    }

    #[test]
    fn undecodable_plot_is_reported() {
        let ctx = egui::Context::default();
        let mut viewer = PlotViewer::new();
        viewer.set_plot(&ctx, "boxplot_a", b"not a png");
        assert_eq!(viewer.plot_name(), None);
        assert!(matches!(viewer.status, Some(StatusMessage::Error(_))));
    }
}
