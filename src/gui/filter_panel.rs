//! Filter Panel Widget
//! Left side panel with the CSV chooser and the three categorical filters.

use crate::data::FilterSelection;
use egui::{Color32, RichText, ScrollArea};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Left side panel: data source, multi-select filters, progress.
pub struct FilterPanel {
    pub csv_path: Option<PathBuf>,
    pub gender_options: Vec<String>,
    pub channel_options: Vec<String>,
    pub style_options: Vec<String>,
    pub selection: FilterSelection,
    pub progress: f32,
    pub status: String,
}

impl Default for FilterPanel {
    fn default() -> Self {
        Self {
            csv_path: None,
            gender_options: Vec::new(),
            channel_options: Vec::new(),
            style_options: Vec::new(),
            selection: FilterSelection {
                gender: BTreeSet::new(),
                channel: BTreeSet::new(),
                style: BTreeSet::new(),
            },
            progress: 0.0,
            status: "Ready".to_string(),
        }
    }
}

impl FilterPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the observed values after a CSV load; everything starts selected.
    pub fn update_options(
        &mut self,
        gender: Vec<String>,
        channel: Vec<String>,
        style: Vec<String>,
    ) {
        self.selection = FilterSelection {
            gender: gender.iter().cloned().collect(),
            channel: channel.iter().cloned().collect(),
            style: style.iter().cloned().collect(),
        };
        self.gender_options = gender;
        self.channel_options = channel;
        self.style_options = style;
    }

    /// Draw the panel; reports whether the user changed anything.
    pub fn show(&mut self, ui: &mut egui::Ui) -> FilterPanelAction {
        let mut action = FilterPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("👟 FitLens")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Fit Satisfaction Insights")
                    .size(11.0)
                    .color(Color32::GRAY),
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
                        .csv_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());

                    ui.label(RichText::new(&path_text).size(12.0).color(
                        if self.csv_path.is_some() {
                            Color32::WHITE
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = FilterPanelAction::BrowseCsv;
                        }
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Filters Section =====
        ui.label(RichText::new("🔍 Filters").size(14.0).strong());
        ui.add_space(5.0);

        if self.gender_options.is_empty() {
            ui.label(
                RichText::new("Load a CSV to enable filters")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        } else {
            let gender_options = self.gender_options.clone();
            let channel_options = self.channel_options.clone();
            let style_options = self.style_options.clone();

            let mut changed = Self::filter_group(
                ui,
                "Gender",
                &gender_options,
                &mut self.selection.gender,
            );
            changed |= Self::filter_group(
                ui,
                "Shopping Channel",
                &channel_options,
                &mut self.selection.channel,
            );
            changed |= Self::filter_group(
                ui,
                "Shoe Style",
                &style_options,
                &mut self.selection.style,
            );

            if changed {
                action = FilterPanelAction::FilterChanged;
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Progress Section =====
        ui.label(RichText::new("📊 Status").size(14.0).strong());
        ui.add_space(5.0);

        ui.add(
            egui::ProgressBar::new(self.progress / 100.0)
                .show_percentage()
                .animate(self.progress > 0.0 && self.progress < 100.0),
        );

        ui.add_space(5.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("rows") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// One multi-select group with Select All / Clear All shortcuts.
    fn filter_group(
        ui: &mut egui::Ui,
        title: &str,
        options: &[String],
        selected: &mut BTreeSet<String>,
    ) -> bool {
        let mut changed = false;

        ui.add_space(5.0);
        ui.label(RichText::new(title).size(12.0).strong());

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(5.0)
            .show(ui, |ui| {
                ScrollArea::vertical()
                    .id_salt(format!("filter_{}", title))
                    .max_height(110.0)
                    .show(ui, |ui| {
                        for option in options {
                            let mut checked = selected.contains(option);
                            if ui.checkbox(&mut checked, option).changed() {
                                if checked {
                                    selected.insert(option.clone());
                                } else {
                                    selected.remove(option);
                                }
                                changed = true;
                            }
                        }
                    });
            });

        ui.horizontal(|ui| {
            if ui.small_button("Select All").clicked() {
                selected.extend(options.iter().cloned());
                changed = true;
            }
            if ui.small_button("Clear All").clicked() && !selected.is_empty() {
                selected.clear();
                changed = true;
            }
        });

        changed
    }

    /// Set progress and status
    pub fn set_progress(&mut self, progress: f32, status: &str) {
        self.progress = progress;
        self.status = status.to_string();
    }
}

/// Actions triggered by the filter panel
#[derive(Debug, Clone, PartialEq)]
pub enum FilterPanelAction {
    None,
    BrowseCsv,
    FilterChanged,
}
