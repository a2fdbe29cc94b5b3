//! FitLens Main Application
//! Main window with filter panel and tabbed dashboard.

use crate::data::schema::{COL_AGE, COL_FIT_SCORE, COL_GENDER};
use crate::data::{load_dataset, unique_values, DataLoader, FilterSelection, Schema};
use crate::gui::{Dashboard, DashboardData, FilterPanel, FilterPanelAction};
use crate::stats::{AgeGroup, StatsCalculator};
use egui::SidePanel;
use polars::prelude::*;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::thread;

/// CSV loading result from background thread
enum LoadResult {
    Progress(String),
    Complete { df: DataFrame, schema: Schema },
    Error(String),
}

/// Main application window.
pub struct FitLensApp {
    loader: DataLoader,
    filter_panel: FilterPanel,
    dashboard: Dashboard,
    data: Option<DashboardData>,

    // Async CSV loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl FitLensApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, initial_csv: Option<PathBuf>) -> Self {
        let mut app = Self {
            loader: DataLoader::new(),
            filter_panel: FilterPanel::new(),
            dashboard: Dashboard::new(),
            data: None,
            load_rx: None,
            is_loading: false,
        };
        if let Some(path) = initial_csv {
            app.start_load(path);
        }
        app
    }

    /// Handle CSV file selection via the system dialog.
    fn handle_browse_csv(&mut self) {
        if self.is_loading {
            return; // Already loading
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.start_load(path);
        }
    }

    /// Load the CSV in a background thread so the UI never blocks.
    fn start_load(&mut self, path: PathBuf) {
        self.data = None;
        self.filter_panel.csv_path = Some(path.clone());
        self.filter_panel.set_progress(0.0, "Loading CSV file...");
        self.is_loading = true;

        let (tx, rx) = channel();
        self.load_rx = Some(rx);

        thread::spawn(move || {
            let _ = tx.send(LoadResult::Progress("Reading CSV file...".to_string()));

            match load_dataset(&path) {
                Ok((df, schema)) => {
                    let _ = tx.send(LoadResult::Complete { df, schema });
                }
                Err(e) => {
                    log::error!("CSV load failed: {}", e);
                    let _ = tx.send(LoadResult::Error(e.to_string()));
                }
            }
        });
    }

    /// Check for CSV loading results
    fn check_load_results(&mut self) {
        let rx = self.load_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    LoadResult::Progress(status) => {
                        self.filter_panel.set_progress(0.0, &status);
                    }
                    LoadResult::Complete { df, schema } => {
                        let gender = unique_values(&df, COL_GENDER);
                        let channel_vals = unique_values(&df, schema.channel_col());
                        let style = unique_values(&df, schema.style_col());

                        self.loader.set_dataset(df, schema);
                        self.filter_panel.update_options(gender, channel_vals, style);
                        self.is_loading = false;
                        should_keep_receiver = false;
                        self.recompute_views();
                    }
                    LoadResult::Error(error) => {
                        self.filter_panel
                            .set_progress(0.0, &format!("Error: {}", error));
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                }
            }

            if should_keep_receiver {
                self.load_rx = Some(rx);
            }
        }
    }

    /// Recompute every derived view from the current filter selection.
    /// Nothing is cached across filter changes.
    fn recompute_views(&mut self) {
        let (Some(df), Some(schema)) = (self.loader.get_dataframe(), self.loader.schema()) else {
            return;
        };

        match Self::build_dashboard_data(df, schema, &self.filter_panel.selection) {
            Ok(data) => {
                let total = self.loader.get_row_count();
                let shown = data.row_count;
                self.data = Some(data);
                self.filter_panel
                    .set_progress(100.0, &format!("Showing {} of {} rows", shown, total));
            }
            Err(e) => {
                log::error!("Derived view computation failed: {}", e);
                self.filter_panel.set_progress(0.0, &format!("Error: {}", e));
            }
        }
    }

    /// Pure pipeline: filter, then derive every chart input.
    fn build_dashboard_data(
        df: &DataFrame,
        schema: Schema,
        selection: &FilterSelection,
    ) -> anyhow::Result<DashboardData> {
        let filtered = selection.apply(df, schema)?;
        let channel_col = schema.channel_col();
        let style_col = schema.style_col();

        let augmented = StatsCalculator::with_age_groups(&filtered, COL_AGE)?;
        let score_by_age_group = StatsCalculator::values_by_category(
            &augmented,
            crate::data::schema::COL_AGE_GROUP,
            COL_FIT_SCORE,
        )?;
        let age_group_labels: Vec<String> = AgeGroup::ALL
            .iter()
            .map(|g| g.label().to_string())
            .filter(|label| score_by_age_group.contains_key(label))
            .collect();

        let income_scatter = schema
            .income_col()
            .map(|income| StatsCalculator::paired_values(&filtered, income, COL_FIT_SCORE))
            .transpose()?;

        Ok(DashboardData {
            row_count: filtered.height(),

            summaries: StatsCalculator::summarize_numeric(&filtered),
            score_by_channel: StatsCalculator::values_by_category(
                &filtered,
                channel_col,
                COL_FIT_SCORE,
            )?,
            channel_labels: unique_values(&filtered, channel_col),
            score_by_gender: StatsCalculator::values_by_category(
                &filtered,
                COL_GENDER,
                COL_FIT_SCORE,
            )?,
            gender_labels: unique_values(&filtered, COL_GENDER),

            gender_counts: StatsCalculator::category_counts(&filtered, COL_GENDER)?,
            age_by_gender: StatsCalculator::values_by_category(&filtered, COL_GENDER, COL_AGE)?,
            income_scatter,

            style_counts: StatsCalculator::category_counts(&filtered, style_col)?,
            score_by_style: StatsCalculator::values_by_category(
                &filtered,
                style_col,
                COL_FIT_SCORE,
            )?,
            style_labels: unique_values(&filtered, style_col),
            channel_counts: StatsCalculator::category_counts(&filtered, channel_col)?,

            correlation: StatsCalculator::correlation_matrix(&filtered),
            pivot: StatsCalculator::pivot_mean(&filtered, style_col, channel_col, COL_FIT_SCORE)?,
            score_by_age_group,
            age_group_labels,
        })
    }
}

impl eframe::App for FitLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_load_results();

        // Request repaint while loading
        if self.is_loading {
            ctx.request_repaint();
        }

        // Left panel - Filters
        SidePanel::left("filter_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.filter_panel.show(ui);

                    match action {
                        FilterPanelAction::BrowseCsv => self.handle_browse_csv(),
                        FilterPanelAction::FilterChanged => self.recompute_views(),
                        FilterPanelAction::None => {}
                    }
                });
            });

        // Central panel - Dashboard
        egui::CentralPanel::default().show(ctx, |ui| {
            self.dashboard.show(ui, self.data.as_ref());
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::SchemaVariant;
    use std::collections::BTreeSet;

    fn four_row_frame() -> (DataFrame, Schema) {
        let df = DataFrame::new(vec![
            Column::new(COL_GENDER.into(), ["M", "F", "M", "F"]),
            Column::new("Channel".into(), ["Online", "Online", "Store", "Store"]),
            Column::new("Shoe_Style".into(), ["A", "B", "A", "B"]),
            Column::new(COL_AGE.into(), [24i64, 33, 44, 58]),
            Column::new(COL_FIT_SCORE.into(), [3.0f64, 4.0, 2.0, 5.0]),
        ])
        .unwrap();
        let schema = Schema {
            variant: SchemaVariant::RetailNames,
            has_income: false,
        };
        (df, schema)
    }

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn gender_filter_drives_every_view() {
        let (df, schema) = four_row_frame();
        let selection = FilterSelection {
            gender: set(&["F"]),
            channel: set(&["Online", "Store"]),
            style: set(&["A", "B"]),
        };

        let data = FitLensApp::build_dashboard_data(&df, schema, &selection).unwrap();
        assert_eq!(data.row_count, 2);
        assert_eq!(data.gender_labels, vec!["F".to_string()]);
        assert_eq!(data.gender_counts, vec![("F".to_string(), 2)]);
        // Both remaining rows wear style B.
        assert_eq!(data.style_counts, vec![("B".to_string(), 2)]);
        assert_eq!(data.pivot.get("B", "Online"), Some(4.0));
        assert_eq!(data.pivot.get("B", "Store"), Some(5.0));
        assert_eq!(data.pivot.get("A", "Online"), None);
        // Ages 33 and 58: two buckets present.
        assert_eq!(
            data.age_group_labels,
            vec!["25-35".to_string(), "45+".to_string()]
        );
        assert!(data.income_scatter.is_none());
    }

    #[test]
    fn empty_selection_reports_no_data_everywhere() {
        let (df, schema) = four_row_frame();
        let selection = FilterSelection {
            gender: BTreeSet::new(),
            channel: set(&["Online", "Store"]),
            style: set(&["A", "B"]),
        };

        let data = FitLensApp::build_dashboard_data(&df, schema, &selection).unwrap();
        assert_eq!(data.row_count, 0);
        assert!(data.gender_counts.is_empty());
        assert!(data.pivot.is_empty());
        assert!(data.summaries.iter().all(|s| s.count == 0));
        assert!(data.age_group_labels.is_empty());
    }

    #[test]
    fn full_selection_shows_all_rows() {
        let (df, schema) = four_row_frame();
        let selection = FilterSelection::all_observed(&df, schema);
        let data = FitLensApp::build_dashboard_data(&df, schema, &selection).unwrap();
        assert_eq!(data.row_count, df.height());
        assert_eq!(data.channel_labels.len(), 2);
        assert_eq!(data.correlation.columns.len(), 2);
    }
}
