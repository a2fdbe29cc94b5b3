//! Dashboard Widget
//! Central tabbed panel rendering the derived views of the filtered dataset.

use crate::charts::ChartPlotter;
use crate::stats::{ColumnSummary, CorrelationMatrix, PivotTable};
use egui::{Color32, RichText, ScrollArea};
use std::collections::HashMap;

/// Everything the dashboard needs, recomputed from the filtered frame on
/// every filter change. Chart-ready: no polars types cross this boundary.
#[derive(Default, Clone)]
pub struct DashboardData {
    pub row_count: usize,

    // Overview
    pub summaries: Vec<ColumnSummary>,
    pub score_by_channel: HashMap<String, Vec<f64>>,
    pub channel_labels: Vec<String>,
    pub score_by_gender: HashMap<String, Vec<f64>>,
    pub gender_labels: Vec<String>,

    // Demographics
    pub gender_counts: Vec<(String, usize)>,
    pub age_by_gender: HashMap<String, Vec<f64>>,
    pub income_scatter: Option<Vec<[f64; 2]>>,

    // Product preferences
    pub style_counts: Vec<(String, usize)>,
    pub score_by_style: HashMap<String, Vec<f64>>,
    pub style_labels: Vec<String>,
    pub channel_counts: Vec<(String, usize)>,

    // Satisfaction analytics
    pub correlation: CorrelationMatrix,
    pub pivot: PivotTable,
    pub score_by_age_group: HashMap<String, Vec<f64>>,
    pub age_group_labels: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Tab {
    #[default]
    Overview,
    Demographics,
    Preferences,
    Analytics,
}

/// Central tabbed chart area.
#[derive(Default)]
pub struct Dashboard {
    active_tab: Tab,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, ui: &mut egui::Ui, data: Option<&DashboardData>) {
        let Some(data) = data else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("Load a survey CSV to begin").size(20.0));
            });
            return;
        };

        ui.horizontal(|ui| {
            ui.selectable_value(&mut self.active_tab, Tab::Overview, "Overview");
            ui.selectable_value(&mut self.active_tab, Tab::Demographics, "Demographics");
            ui.selectable_value(&mut self.active_tab, Tab::Preferences, "Product Preferences");
            ui.selectable_value(&mut self.active_tab, Tab::Analytics, "Satisfaction Analytics");
        });
        ui.separator();

        if data.row_count == 0 {
            ui.centered_and_justified(|ui| {
                ui.label(
                    RichText::new("No Data — current filters match no rows")
                        .size(20.0)
                        .color(Color32::GRAY),
                );
            });
            return;
        }

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| match self.active_tab {
                Tab::Overview => Self::show_overview(ui, data),
                Tab::Demographics => Self::show_demographics(ui, data),
                Tab::Preferences => Self::show_preferences(ui, data),
                Tab::Analytics => Self::show_analytics(ui, data),
            });
    }

    fn section(ui: &mut egui::Ui, title: &str) {
        ui.add_space(12.0);
        ui.label(RichText::new(title).size(15.0).strong());
        ui.add_space(4.0);
    }

    fn show_overview(ui: &mut egui::Ui, data: &DashboardData) {
        Self::section(ui, "Summary Statistics");
        ChartPlotter::draw_summary_table(ui, "overview_summary", &data.summaries);

        Self::section(ui, "Distribution of Fit Satisfaction Score");
        ChartPlotter::draw_histogram(
            ui,
            "overview_score_hist",
            &data.score_by_channel,
            &data.channel_labels,
            20,
            "Fit Satisfaction Score",
        );

        Self::section(ui, "Fit Score by Gender");
        ChartPlotter::draw_boxplot(
            ui,
            "overview_score_by_gender",
            &data.score_by_gender,
            &data.gender_labels,
            "Fit Satisfaction Score",
        );
    }

    fn show_demographics(ui: &mut egui::Ui, data: &DashboardData) {
        Self::section(ui, "Gender Breakdown");
        ChartPlotter::draw_pie(ui, "demo_gender_pie", &data.gender_counts);

        Self::section(ui, "Age Distribution");
        ChartPlotter::draw_histogram(
            ui,
            "demo_age_hist",
            &data.age_by_gender,
            &data.gender_labels,
            15,
            "Age",
        );

        Self::section(ui, "Income vs Fit Satisfaction");
        match &data.income_scatter {
            Some(points) => ChartPlotter::draw_scatter(
                ui,
                "demo_income_scatter",
                points,
                "Income",
                "Fit Satisfaction Score",
            ),
            None => {
                ui.label(
                    RichText::new("The dataset does not include an Income field; chart skipped.")
                        .size(12.0)
                        .color(Color32::GRAY),
                );
            }
        }
    }

    fn show_preferences(ui: &mut egui::Ui, data: &DashboardData) {
        Self::section(ui, "Popular Shoe Styles");
        ChartPlotter::draw_count_bars(ui, "pref_style_counts", &data.style_counts, "Style");

        Self::section(ui, "Style vs Fit Satisfaction");
        ChartPlotter::draw_boxplot(
            ui,
            "pref_score_by_style",
            &data.score_by_style,
            &data.style_labels,
            "Fit Satisfaction Score",
        );

        Self::section(ui, "Shopping Channel Split");
        ChartPlotter::draw_pie(ui, "pref_channel_pie", &data.channel_counts);
    }

    fn show_analytics(ui: &mut egui::Ui, data: &DashboardData) {
        Self::section(ui, "Correlation Matrix");
        ChartPlotter::draw_heatmap(ui, "analytics_heatmap", &data.correlation);

        Self::section(ui, "Fit Score by Style and Channel (mean)");
        ChartPlotter::draw_pivot_table(ui, "analytics_pivot", &data.pivot);

        Self::section(ui, "Satisfaction by Age Group");
        ChartPlotter::draw_boxplot(
            ui,
            "analytics_score_by_age",
            &data.score_by_age_group,
            &data.age_group_labels,
            "Fit Satisfaction Score",
        );
    }
}
