//! Control Panel Widget
//! Left side panel: data source, plot style, chart kind, columns, download.

use crate::charts::{ChartKind, ChartRequest, ChartType, PlotStyle};
use egui::{Color32, ComboBox, RichText};
use std::path::PathBuf;

/// Current picker values
#[derive(Default, Clone)]
pub struct Selections {
    pub csv_path: Option<PathBuf>,
    pub style: PlotStyle,
    pub chart_type: ChartType,
    pub column: String,
    pub x_column: String,
    pub y_column: String,
    pub download: String,
}

/// Left side control panel with file selection and chart pickers.
#[derive(Default)]
pub struct ControlPanel {
    pub selections: Selections,
    pub numeric_columns: Vec<String>,
    pub chart_types: Vec<ChartType>,
    pub plot_names: Vec<String>,
}

impl ControlPanel {
    pub fn new(style: PlotStyle) -> Self {
        Self {
            selections: Selections {
                style,
                ..Selections::default()
            },
            ..Self::default()
        }
    }

    /// Reset column pickers after a dataset load. Previous choices are kept
    /// when the new dataset still has them.
    pub fn update_columns(&mut self, numeric_columns: Vec<String>, chart_types: &[ChartType]) {
        let first = numeric_columns.first().cloned().unwrap_or_default();
        let second = numeric_columns.get(1).cloned().unwrap_or_else(|| first.clone());
        let keep = |current: &str, fallback: &String| {
            if numeric_columns.iter().any(|c| c == current) {
                current.to_string()
            } else {
                fallback.clone()
            }
        };

        self.selections.column = keep(&self.selections.column, &first);
        self.selections.x_column = keep(&self.selections.x_column, &first);
        self.selections.y_column = keep(&self.selections.y_column, &second);
        self.chart_types = chart_types.to_vec();
        if !self.chart_types.contains(&self.selections.chart_type) {
            self.selections.chart_type = ChartType::default();
        }
        self.numeric_columns = numeric_columns;
    }

    pub fn update_plot_names(&mut self, names: &[String]) {
        self.plot_names = names.to_vec();
        if !self.plot_names.contains(&self.selections.download) {
            self.selections.download = self.plot_names.last().cloned().unwrap_or_default();
        }
    }

    /// Request matching the current pickers, if the columns it needs are set.
    pub fn chart_request(&self) -> Option<ChartRequest> {
        if self.chart_types.is_empty() {
            return None;
        }
        let s = &self.selections;
        let kind = match s.chart_type {
            ChartType::Histogram if !s.column.is_empty() => ChartKind::histogram(&s.column),
            ChartType::Boxplot if !s.column.is_empty() => ChartKind::boxplot(&s.column),
            ChartType::Scatterplot if !s.x_column.is_empty() && !s.y_column.is_empty() => {
                ChartKind::scatterplot(&s.x_column, &s.y_column)
            }
            ChartType::CorrelationHeatmap => ChartKind::CorrelationHeatmap,
            _ => return None,
        };
        Some(ChartRequest::new(kind, s.style))
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 Plot Dashboard")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== CSV File Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .selections
                        .csv_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());

                    let path_color = if self.selections.csv_path.is_some() {
                        ui.visuals().strong_text_color()
                    } else {
                        Color32::GRAY
                    };
                    ui.label(RichText::new(&path_text).size(12.0).color(path_color));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseCsv;
                        }
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Chart Section =====
        ui.label(RichText::new("🔧 Chart Settings").size(14.0).strong());
        ui.add_space(8.0);

        let label_width = 110.0;
        let combo_width = 150.0;
        let mut changed = false;

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Plot Style:"));
            ComboBox::from_id_salt("plot_style")
                .width(combo_width)
                .selected_text(self.selections.style.name())
                .show_ui(ui, |ui| {
                    for style in PlotStyle::ALL {
                        changed |= ui
                            .selectable_value(&mut self.selections.style, style, style.name())
                            .changed();
                    }
                });
        });

        if self.chart_types.is_empty() {
            ui.add_space(5.0);
            ui.label(RichText::new("Load a CSV with numeric columns to plot").color(Color32::GRAY));
        } else {
            ui.add_space(5.0);
            ui.horizontal(|ui| {
                ui.add_sized([label_width, 20.0], egui::Label::new("Chart Type:"));
                ComboBox::from_id_salt("chart_type")
                    .width(combo_width)
                    .selected_text(self.selections.chart_type.label())
                    .show_ui(ui, |ui| {
                        for &chart_type in &self.chart_types {
                            changed |= ui
                                .selectable_value(
                                    &mut self.selections.chart_type,
                                    chart_type,
                                    chart_type.label(),
                                )
                                .changed();
                        }
                    });
            });

            ui.add_space(5.0);
            match self.selections.chart_type {
                ChartType::Histogram | ChartType::Boxplot => {
                    changed |= column_picker(
                        ui,
                        "column",
                        "Column:",
                        &self.numeric_columns,
                        &mut self.selections.column,
                    );
                }
                ChartType::Scatterplot => {
                    changed |= column_picker(
                        ui,
                        "x_column",
                        "X Axis:",
                        &self.numeric_columns,
                        &mut self.selections.x_column,
                    );
                    ui.add_space(5.0);
                    changed |= column_picker(
                        ui,
                        "y_column",
                        "Y Axis:",
                        &self.numeric_columns,
                        &mut self.selections.y_column,
                    );
                }
                ChartType::CorrelationHeatmap => {
                    ui.label(
                        RichText::new("Uses every numeric column")
                            .size(11.0)
                            .color(Color32::GRAY),
                    );
                }
            }
        }

        if changed {
            action = ControlPanelAction::SelectionChanged;
        }

        // ===== Download Section =====
        if !self.plot_names.is_empty() {
            ui.add_space(15.0);
            ui.separator();
            ui.add_space(10.0);
            ui.label(RichText::new("💾 Download").size(14.0).strong());
            ui.add_space(5.0);

            ui.horizontal(|ui| {
                ui.add_sized([label_width, 20.0], egui::Label::new("Saved Plot:"));
                ComboBox::from_id_salt("download_plot")
                    .width(combo_width)
                    .selected_text(&self.selections.download)
                    .show_ui(ui, |ui| {
                        for name in &self.plot_names {
                            ui.selectable_value(&mut self.selections.download, name.clone(), name);
                        }
                    });
            });

            ui.add_space(8.0);
            ui.vertical_centered(|ui| {
                let button = egui::Button::new(RichText::new("Download Plot as PNG").size(14.0))
                    .min_size(egui::vec2(180.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::Download;
                }
            });
        }

        action
    }
}

/// Labelled combo box over numeric columns. Returns true on change.
fn column_picker(
    ui: &mut egui::Ui,
    id: &str,
    label: &str,
    columns: &[String],
    selected: &mut String,
) -> bool {
    let mut changed = false;
    ui.horizontal(|ui| {
        ui.add_sized([110.0, 20.0], egui::Label::new(label));
        ComboBox::from_id_salt(id)
            .width(150.0)
            .selected_text(selected.as_str())
            .show_ui(ui, |ui| {
                for col in columns {
                    if ui.selectable_label(*selected == *col, col).clicked() && *selected != *col {
                        *selected = col.clone();
                        changed = true;
                    }
                }
            });
    });
    changed
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    SelectionChanged,
    Download,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_request_without_numeric_columns() {
        let mut panel = ControlPanel::new(PlotStyle::Default);
        assert!(panel.chart_request().is_none());
        panel.update_columns(Vec::new(), &[]);
        assert!(panel.chart_request().is_none());
    }

    #[test]
    fn update_columns_preselects_first_columns() {
        let mut panel = ControlPanel::new(PlotStyle::Seaborn);
        panel.update_columns(columns(&["a", "b"]), &ChartType::ALL);
        let request = panel.chart_request().unwrap();
        assert_eq!(request.kind, ChartKind::histogram("a"));
        assert_eq!(request.style, PlotStyle::Seaborn);

        panel.selections.chart_type = ChartType::Scatterplot;
        assert_eq!(
            panel.chart_request().unwrap().kind,
            ChartKind::scatterplot("a", "b")
        );
    }

    #[test]
    fn reload_keeps_columns_that_still_exist() {
        let mut panel = ControlPanel::new(PlotStyle::Default);
        panel.update_columns(columns(&["a", "b"]), &ChartType::ALL);
        panel.selections.column = "b".to_string();
        panel.update_columns(columns(&["b", "c"]), &ChartType::ALL);
        assert_eq!(panel.selections.column, "b");
        panel.update_columns(columns(&["c"]), &ChartType::ALL);
        assert_eq!(panel.selections.column, "c");
        assert_eq!(panel.selections.y_column, "c");
    }

    #[test]
    fn download_defaults_to_latest_plot() {
        let mut panel = ControlPanel::new(PlotStyle::Default);
        panel.update_plot_names(&columns(&["histogram_a", "boxplot_a"]));
        assert_eq!(panel.selections.download, "boxplot_a");
        panel.selections.download = "histogram_a".to_string();
        panel.update_plot_names(&columns(&["histogram_a", "boxplot_a", "correlation_heatmap"]));
        assert_eq!(panel.selections.download, "histogram_a");
    }
}
