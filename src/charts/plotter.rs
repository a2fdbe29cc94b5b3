//! Chart Plotter Module
//! Creates interactive visualizations using egui_plot.

use crate::stats::{ColumnSummary, CorrelationMatrix, PivotTable};
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Plot, PlotPoints, Points};
use std::collections::HashMap;

/// Color palette for categories
pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(52, 152, 219),  // Blue
    Color32::from_rgb(231, 76, 60),   // Red
    Color32::from_rgb(46, 204, 113),  // Green
    Color32::from_rgb(155, 89, 182),  // Purple
    Color32::from_rgb(243, 156, 18),  // Orange
    Color32::from_rgb(26, 188, 156),  // Teal
    Color32::from_rgb(233, 30, 99),   // Pink
    Color32::from_rgb(0, 188, 212),   // Cyan
    Color32::from_rgb(255, 87, 34),   // Deep Orange
    Color32::from_rgb(96, 125, 139),  // Blue Grey
];

/// Creates the dashboard visualizations using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Get color for a category by its position in the ordered label list.
    pub fn get_category_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Calculate beeswarm positions for points with duplicate values.
    pub fn beeswarm_positions(y_values: &[f64], center: f64, width: f64) -> Vec<f64> {
        let n = y_values.len();
        if n == 0 {
            return Vec::new();
        }

        let mut positions = vec![center; n];

        // Round values and find duplicates
        let precision = 1e6;
        let mut value_indices: HashMap<i64, Vec<usize>> = HashMap::new();

        for (i, &y) in y_values.iter().enumerate() {
            let key = (y * precision).round() as i64;
            value_indices.entry(key).or_default().push(i);
        }

        // Spread duplicates symmetrically
        for indices in value_indices.values() {
            if indices.len() > 1 {
                let count = indices.len();
                let step = width / (count.max(2) - 1) as f64;
                let start = center - width / 2.0;

                for (i, &idx) in indices.iter().enumerate() {
                    positions[idx] = start + i as f64 * step;
                }
            }
        }

        positions
    }

    /// Draw an overlaid histogram: one translucent bar series per category.
    pub fn draw_histogram(
        ui: &mut egui::Ui,
        id: &str,
        data: &HashMap<String, Vec<f64>>,
        categories: &[String],
        bins: usize,
        x_label: &str,
    ) {
        let all: Vec<f64> = categories
            .iter()
            .filter_map(|c| data.get(c))
            .flatten()
            .copied()
            .collect();
        if all.is_empty() || bins == 0 {
            Self::draw_empty(ui, id);
            return;
        }

        let min = all.iter().copied().fold(f64::INFINITY, f64::min);
        let max = all.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let span = if max > min { max - min } else { 1.0 };
        let bin_width = span / bins as f64;

        Plot::new(id.to_string())
            .height(260.0)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label(x_label.to_string())
            .y_axis_label("Count")
            .show(ui, |plot_ui| {
                for (cat_idx, category) in categories.iter().enumerate() {
                    let Some(values) = data.get(category) else {
                        continue;
                    };
                    if values.is_empty() {
                        continue;
                    }

                    let mut counts = vec![0usize; bins];
                    for &v in values {
                        let idx = (((v - min) / bin_width) as usize).min(bins - 1);
                        counts[idx] += 1;
                    }

                    let color = Self::get_category_color(cat_idx);
                    let bars: Vec<Bar> = counts
                        .iter()
                        .enumerate()
                        .filter(|(_, count)| **count > 0)
                        .map(|(i, &count)| {
                            Bar::new(min + (i as f64 + 0.5) * bin_width, count as f64)
                                .width(bin_width)
                                .fill(color.gamma_multiply(0.45))
                        })
                        .collect();

                    plot_ui.bar_chart(BarChart::new(bars).color(color).name(category));
                }
            });
    }

    /// Draw box plots with beeswarm overlay, one box per category.
    pub fn draw_boxplot(
        ui: &mut egui::Ui,
        id: &str,
        data: &HashMap<String, Vec<f64>>,
        categories: &[String],
        y_label: &str,
    ) {
        if categories.iter().all(|c| data.get(c).map_or(true, |v| v.is_empty())) {
            Self::draw_empty(ui, id);
            return;
        }

        let x_labels: Vec<String> = categories.to_vec();

        Plot::new(id.to_string())
            .height(260.0)
            .allow_scroll(false)
            .y_axis_label(y_label.to_string())
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round() as usize;
                if (mark.value - idx as f64).abs() < 1e-6 && idx < x_labels.len() {
                    x_labels[idx].clone()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                for (i, category) in categories.iter().enumerate() {
                    let Some(values) = data.get(category) else {
                        continue;
                    };
                    if values.is_empty() {
                        continue;
                    }

                    let color = Self::get_category_color(i);

                    let mut sorted = values.clone();
                    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

                    let n = sorted.len();
                    let q1 = sorted[n / 4];
                    let median = sorted[n / 2];
                    let q3 = sorted[3 * n / 4];
                    let iqr = q3 - q1;
                    let whisker_low = sorted
                        .iter()
                        .copied()
                        .find(|&v| v >= q1 - 1.5 * iqr)
                        .unwrap_or(q1);
                    let whisker_high = sorted
                        .iter()
                        .rev()
                        .copied()
                        .find(|&v| v <= q3 + 1.5 * iqr)
                        .unwrap_or(q3);

                    let box_elem = BoxElem::new(
                        i as f64,
                        BoxSpread::new(whisker_low, q1, median, q3, whisker_high),
                    )
                    .box_width(0.5)
                    .fill(color.gamma_multiply(0.3))
                    .stroke(egui::Stroke::new(1.5, color));

                    plot_ui.box_plot(BoxPlot::new(vec![box_elem]).name(category));

                    let x_positions = Self::beeswarm_positions(values, i as f64, 0.35);
                    let points: PlotPoints = x_positions
                        .iter()
                        .zip(values.iter())
                        .map(|(&x, &y)| [x, y])
                        .collect();

                    plot_ui.points(
                        Points::new(points)
                            .radius(2.5)
                            .color(color.gamma_multiply(0.7)),
                    );
                }
            });
    }

    /// Draw one bar per category value, bar height = occurrence count.
    pub fn draw_count_bars(ui: &mut egui::Ui, id: &str, counts: &[(String, usize)], x_label: &str) {
        if counts.iter().all(|(_, c)| *c == 0) {
            Self::draw_empty(ui, id);
            return;
        }

        let x_labels: Vec<String> = counts.iter().map(|(label, _)| label.clone()).collect();

        Plot::new(id.to_string())
            .height(260.0)
            .allow_scroll(false)
            .x_axis_label(x_label.to_string())
            .y_axis_label("Count")
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round() as usize;
                if (mark.value - idx as f64).abs() < 1e-6 && idx < x_labels.len() {
                    x_labels[idx].clone()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                for (i, (label, count)) in counts.iter().enumerate() {
                    let color = Self::get_category_color(i);
                    let bar = Bar::new(i as f64, *count as f64)
                        .width(0.6)
                        .fill(color.gamma_multiply(0.6));
                    plot_ui.bar_chart(BarChart::new(vec![bar]).color(color).name(label));
                }
            });
    }

    /// Draw an x/y scatter of paired numeric values.
    pub fn draw_scatter(
        ui: &mut egui::Ui,
        id: &str,
        points: &[[f64; 2]],
        x_label: &str,
        y_label: &str,
    ) {
        if points.is_empty() {
            Self::draw_empty(ui, id);
            return;
        }

        Plot::new(id.to_string())
            .height(260.0)
            .allow_scroll(false)
            .x_axis_label(x_label.to_string())
            .y_axis_label(y_label.to_string())
            .show(ui, |plot_ui| {
                plot_ui.points(
                    Points::new(PlotPoints::from_iter(points.iter().copied()))
                        .radius(3.0)
                        .color(PALETTE[0].gamma_multiply(0.8)),
                );
            });
    }

    /// Draw a pie chart from category counts, with a legend to the right.
    pub fn draw_pie(ui: &mut egui::Ui, id: &str, counts: &[(String, usize)]) {
        let total: usize = counts.iter().map(|(_, c)| c).sum();
        if total == 0 {
            Self::draw_empty(ui, id);
            return;
        }

        ui.horizontal(|ui| {
            let diameter = 200.0;
            let (rect, _) = ui.allocate_exact_size(
                egui::vec2(diameter + 10.0, diameter + 10.0),
                egui::Sense::hover(),
            );
            let center = rect.center();
            let radius = diameter / 2.0;
            let painter = ui.painter_at(rect);

            let mut start_angle = -std::f32::consts::FRAC_PI_2;
            for (i, (_, count)) in counts.iter().enumerate() {
                let fraction = *count as f32 / total as f32;
                let sweep = fraction * std::f32::consts::TAU;
                let color = Self::get_category_color(i);

                // Sector as a fan of triangles from the center
                let steps = ((sweep / 0.05).ceil() as usize).max(2);
                let mut points = vec![center];
                for s in 0..=steps {
                    let angle = start_angle + sweep * (s as f32 / steps as f32);
                    points.push(center + radius * egui::vec2(angle.cos(), angle.sin()));
                }
                painter.add(egui::Shape::convex_polygon(
                    points,
                    color.gamma_multiply(0.85),
                    egui::Stroke::new(1.0, ui.visuals().extreme_bg_color),
                ));

                start_angle += sweep;
            }

            ui.add_space(10.0);

            ui.vertical(|ui| {
                for (i, (label, count)) in counts.iter().enumerate() {
                    let color = Self::get_category_color(i);
                    ui.horizontal(|ui| {
                        let (swatch, _) = ui
                            .allocate_exact_size(egui::vec2(14.0, 14.0), egui::Sense::hover());
                        ui.painter().rect_filled(swatch, 3.0, color);
                        let pct = 100.0 * *count as f64 / total as f64;
                        ui.label(
                            RichText::new(format!("{}: {} ({:.1}%)", label, count, pct))
                                .size(12.0),
                        );
                    });
                }
            });
        });
    }

    /// Draw the correlation matrix as an annotated heatmap grid.
    pub fn draw_heatmap(ui: &mut egui::Ui, id: &str, matrix: &CorrelationMatrix) {
        if matrix.is_empty() {
            Self::draw_empty(ui, id);
            return;
        }

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new(ui.make_persistent_id(id))
                    .min_col_width(70.0)
                    .spacing([4.0, 4.0])
                    .show(ui, |ui| {
                        ui.label("");
                        for col in &matrix.columns {
                            ui.label(RichText::new(col).strong().size(11.0));
                        }
                        ui.end_row();

                        for (i, row) in matrix.columns.iter().enumerate() {
                            ui.label(RichText::new(row).strong().size(11.0));
                            for j in 0..matrix.columns.len() {
                                let r = matrix.get(i, j);
                                if r.is_nan() {
                                    ui.label(RichText::new("-").size(11.0));
                                } else {
                                    ui.label(
                                        RichText::new(format!("{:.2}", r))
                                            .size(11.0)
                                            .color(Color32::WHITE)
                                            .background_color(Self::correlation_color(r)),
                                    );
                                }
                            }
                            ui.end_row();
                        }
                    });
            });
    }

    /// Blue for -1, grey around 0, red for +1.
    fn correlation_color(r: f64) -> Color32 {
        let r = r.clamp(-1.0, 1.0) as f32;
        let cold = Color32::from_rgb(52, 100, 200);
        let warm = Color32::from_rgb(200, 60, 50);
        let mid = Color32::from_rgb(90, 90, 100);
        let lerp = |a: Color32, b: Color32, t: f32| {
            Color32::from_rgb(
                (a.r() as f32 + (b.r() as f32 - a.r() as f32) * t) as u8,
                (a.g() as f32 + (b.g() as f32 - a.g() as f32) * t) as u8,
                (a.b() as f32 + (b.b() as f32 - a.b() as f32) * t) as u8,
            )
        };
        if r < 0.0 {
            lerp(mid, cold, -r)
        } else {
            lerp(mid, warm, r)
        }
    }

    /// Draw the style/channel pivot of mean fit scores as a striped grid.
    pub fn draw_pivot_table(ui: &mut egui::Ui, id: &str, pivot: &PivotTable) {
        if pivot.is_empty() {
            Self::draw_empty(ui, id);
            return;
        }

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new(ui.make_persistent_id(id))
                    .striped(true)
                    .min_col_width(70.0)
                    .spacing([8.0, 4.0])
                    .show(ui, |ui| {
                        ui.label("");
                        for col in &pivot.col_labels {
                            ui.label(RichText::new(col).strong().size(11.0));
                        }
                        ui.end_row();

                        for (r, row) in pivot.row_labels.iter().enumerate() {
                            ui.label(RichText::new(row).strong().size(11.0));
                            for cell in &pivot.cells[r] {
                                match cell {
                                    Some(mean) => {
                                        ui.label(RichText::new(format!("{:.3}", mean)).size(11.0))
                                    }
                                    None => ui.label(RichText::new("-").size(11.0)),
                                };
                            }
                            ui.end_row();
                        }
                    });
            });
    }

    /// Draw descriptive statistics, one row per numeric column.
    pub fn draw_summary_table(ui: &mut egui::Ui, id: &str, summaries: &[ColumnSummary]) {
        if summaries.iter().all(|s| s.count == 0) {
            Self::draw_empty(ui, id);
            return;
        }

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new(ui.make_persistent_id(id))
                    .striped(true)
                    .min_col_width(55.0)
                    .spacing([8.0, 4.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new("Column").strong().size(11.0));
                        ui.label(RichText::new("N").strong().size(11.0));
                        ui.label(RichText::new("Mean").strong().size(11.0));
                        ui.label(RichText::new("Median").strong().size(11.0));
                        ui.label(RichText::new("Std").strong().size(11.0));
                        ui.label(RichText::new("Min").strong().size(11.0));
                        ui.label(RichText::new("Max").strong().size(11.0));
                        ui.label(RichText::new("P05").strong().size(11.0));
                        ui.label(RichText::new("P95").strong().size(11.0));
                        ui.end_row();

                        for s in summaries {
                            ui.label(RichText::new(&s.column).size(11.0));
                            ui.label(RichText::new(s.count.to_string()).size(11.0));
                            ui.label(RichText::new(format!("{:.3}", s.mean)).size(11.0));
                            ui.label(RichText::new(format!("{:.3}", s.median)).size(11.0));
                            ui.label(RichText::new(format!("{:.3}", s.std)).size(11.0));
                            ui.label(RichText::new(format!("{:.3}", s.min)).size(11.0));
                            ui.label(RichText::new(format!("{:.3}", s.max)).size(11.0));
                            ui.label(RichText::new(format!("{:.3}", s.p05)).size(11.0));
                            ui.label(RichText::new(format!("{:.3}", s.p95)).size(11.0));
                            ui.end_row();
                        }
                    });
            });
    }

    fn draw_empty(ui: &mut egui::Ui, id: &str) {
        ui.push_id(id, |ui| {
            ui.label(RichText::new("No Data").size(14.0).color(Color32::GRAY));
        });
    }
}
