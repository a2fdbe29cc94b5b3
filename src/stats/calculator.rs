//! Statistics Calculator Module
//! Derived views over the filtered dataset: summaries, correlation, pivot, age buckets.

use polars::prelude::*;
use rayon::prelude::*;
use std::collections::HashMap;

use crate::data::schema::COL_AGE_GROUP;

/// Descriptive statistics for one numeric column.
#[derive(Debug, Clone)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub p05: f64,
    pub p95: f64,
}

impl Default for ColumnSummary {
    fn default() -> Self {
        Self {
            column: String::new(),
            count: 0,
            mean: f64::NAN,
            median: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            max: f64::NAN,
            p05: f64::NAN,
            p95: f64::NAN,
        }
    }
}

/// Pearson correlation matrix over the numeric columns of a frame.
#[derive(Debug, Clone, Default)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// Row-major, `columns.len()` squared.
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(f64::NAN)
    }
}

/// Mean value per (row-group, column-group) pair. Pairs with no
/// observations hold `None`, never an implicit zero.
#[derive(Debug, Clone, Default)]
pub struct PivotTable {
    pub row_labels: Vec<String>,
    pub col_labels: Vec<String>,
    pub cells: Vec<Vec<Option<f64>>>,
}

impl PivotTable {
    pub fn is_empty(&self) -> bool {
        self.row_labels.is_empty() || self.col_labels.is_empty()
    }

    pub fn get(&self, row: &str, col: &str) -> Option<f64> {
        let r = self.row_labels.iter().position(|l| l == row)?;
        let c = self.col_labels.iter().position(|l| l == col)?;
        self.cells[r][c]
    }
}

/// Age bucket over (0,60], right-closed bins at 25/35/45.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AgeGroup {
    Under25,
    From25To35,
    From35To45,
    Over45,
}

impl AgeGroup {
    pub const ALL: [AgeGroup; 4] = [
        AgeGroup::Under25,
        AgeGroup::From25To35,
        AgeGroup::From35To45,
        AgeGroup::Over45,
    ];

    /// Bucket an age, or `None` when it falls outside (0,60].
    pub fn from_age(age: f64) -> Option<AgeGroup> {
        if !age.is_finite() || age <= 0.0 || age > 60.0 {
            return None;
        }
        Some(if age <= 25.0 {
            AgeGroup::Under25
        } else if age <= 35.0 {
            AgeGroup::From25To35
        } else if age <= 45.0 {
            AgeGroup::From35To45
        } else {
            AgeGroup::Over45
        })
    }

    pub fn label(&self) -> &'static str {
        match self {
            AgeGroup::Under25 => "<25",
            AgeGroup::From25To35 => "25-35",
            AgeGroup::From35To45 => "35-45",
            AgeGroup::Over45 => "45+",
        }
    }
}

/// Handles all derived-view computations. Every function is a pure
/// function of the (already filtered) frame it receives.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute descriptive statistics for an array of values.
    pub fn compute_descriptive_stats(values: &[f64]) -> ColumnSummary {
        let n = values.len();
        if n == 0 {
            return ColumnSummary::default();
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let mean = values.iter().sum::<f64>() / n as f64;
        let median = if n % 2 == 0 {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        } else {
            sorted[n / 2]
        };

        let variance = if n > 1 {
            values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
        } else {
            0.0
        };

        ColumnSummary {
            column: String::new(),
            count: n,
            mean,
            median,
            std: variance.sqrt(),
            min: sorted[0],
            max: sorted[n - 1],
            p05: Self::percentile(&sorted, 5.0),
            p95: Self::percentile(&sorted, 95.0),
        }
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Descriptive summary for every numeric column of the frame.
    pub fn summarize_numeric(df: &DataFrame) -> Vec<ColumnSummary> {
        crate::data::numeric_columns(df)
            .into_iter()
            .map(|name| {
                let values: Vec<f64> = Self::column_f64(df, &name)
                    .into_iter()
                    .flatten()
                    .filter(|v| v.is_finite())
                    .collect();
                let mut summary = Self::compute_descriptive_stats(&values);
                summary.column = name;
                summary
            })
            .collect()
    }

    /// Pairwise-complete Pearson correlation over all numeric columns.
    /// Symmetric, 1.0 on the diagonal for non-degenerate columns; degrades
    /// to NaN entries (never an error) on empty or constant input.
    pub fn correlation_matrix(df: &DataFrame) -> CorrelationMatrix {
        let columns = crate::data::numeric_columns(df);
        if columns.is_empty() {
            return CorrelationMatrix::default();
        }

        let data: Vec<Vec<Option<f64>>> = columns
            .iter()
            .map(|name| Self::column_f64(df, name))
            .collect();

        let values: Vec<Vec<f64>> = (0..columns.len())
            .into_par_iter()
            .map(|i| {
                (0..columns.len())
                    .map(|j| {
                        if i == j {
                            let has_value = data[i]
                                .iter()
                                .any(|v| v.map(f64::is_finite).unwrap_or(false));
                            if has_value {
                                1.0
                            } else {
                                f64::NAN
                            }
                        } else {
                            Self::pearson(&data[i], &data[j])
                        }
                    })
                    .collect()
            })
            .collect();

        CorrelationMatrix { columns, values }
    }

    /// Pearson coefficient over rows where both values are present.
    fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> f64 {
        let pairs: Vec<(f64, f64)> = xs
            .iter()
            .zip(ys.iter())
            .filter_map(|(x, y)| match (x, y) {
                (Some(a), Some(b)) if a.is_finite() && b.is_finite() => Some((*a, *b)),
                _ => None,
            })
            .collect();

        let n = pairs.len();
        if n < 2 {
            return f64::NAN;
        }

        let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n as f64;
        let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n as f64;

        let mut cov = 0.0;
        let mut var_x = 0.0;
        let mut var_y = 0.0;
        for (x, y) in &pairs {
            let dx = x - mean_x;
            let dy = y - mean_y;
            cov += dx * dy;
            var_x += dx * dx;
            var_y += dy * dy;
        }

        if var_x <= 0.0 || var_y <= 0.0 {
            return f64::NAN;
        }
        cov / (var_x.sqrt() * var_y.sqrt())
    }

    /// Mean of `value_col` per (row group, column group) pair. Pairs absent
    /// from the frame stay absent from the output.
    pub fn pivot_mean(
        df: &DataFrame,
        row_col: &str,
        col_col: &str,
        value_col: &str,
    ) -> PolarsResult<PivotTable> {
        let rows = df.column(row_col)?.as_materialized_series().clone();
        let cols = df.column(col_col)?.as_materialized_series().clone();
        let values = Self::column_f64(df, value_col);

        let mut sums: HashMap<(String, String), (f64, usize)> = HashMap::new();
        let mut row_labels: Vec<String> = Vec::new();
        let mut col_labels: Vec<String> = Vec::new();

        for i in 0..df.height() {
            let (Ok(r), Ok(c)) = (rows.get(i), cols.get(i)) else {
                continue;
            };
            if r.is_null() || c.is_null() {
                continue;
            }
            let Some(v) = values.get(i).copied().flatten().filter(|v| v.is_finite()) else {
                continue;
            };

            let r = r.to_string().trim_matches('"').to_string();
            let c = c.to_string().trim_matches('"').to_string();
            if !row_labels.contains(&r) {
                row_labels.push(r.clone());
            }
            if !col_labels.contains(&c) {
                col_labels.push(c.clone());
            }

            let entry = sums.entry((r, c)).or_insert((0.0, 0));
            entry.0 += v;
            entry.1 += 1;
        }

        row_labels.sort();
        col_labels.sort();

        let cells: Vec<Vec<Option<f64>>> = row_labels
            .iter()
            .map(|r| {
                col_labels
                    .iter()
                    .map(|c| {
                        sums.get(&(r.clone(), c.clone()))
                            .map(|(sum, count)| sum / *count as f64)
                    })
                    .collect()
            })
            .collect();

        Ok(PivotTable {
            row_labels,
            col_labels,
            cells,
        })
    }

    /// Bucket every row's age; `None` marks ages outside (0,60] or nulls.
    pub fn age_groups(df: &DataFrame, age_col: &str) -> PolarsResult<Vec<Option<AgeGroup>>> {
        let ages = Self::try_column_f64(df, age_col)?;
        Ok(ages
            .into_iter()
            .map(|age| age.and_then(AgeGroup::from_age))
            .collect())
    }

    /// Append the derived age-group column to a (filtered) frame.
    /// Unbucketed rows get a null, so charts show them as absent.
    pub fn with_age_groups(df: &DataFrame, age_col: &str) -> PolarsResult<DataFrame> {
        let labels: Vec<Option<&str>> = Self::age_groups(df, age_col)?
            .into_iter()
            .map(|group| group.map(|g| g.label()))
            .collect();

        let mut out = df.clone();
        out.with_column(Column::new(COL_AGE_GROUP.into(), labels))?;
        Ok(out)
    }

    /// Numeric values of `value_col` grouped by the string values of
    /// `group_col`, null and non-finite cells skipped.
    pub fn values_by_category(
        df: &DataFrame,
        group_col: &str,
        value_col: &str,
    ) -> PolarsResult<HashMap<String, Vec<f64>>> {
        let groups = df.column(group_col)?.as_materialized_series().clone();
        let values = Self::try_column_f64(df, value_col)?;

        let mut by_group: HashMap<String, Vec<f64>> = HashMap::new();
        for i in 0..df.height() {
            let Ok(g) = groups.get(i) else { continue };
            if g.is_null() {
                continue;
            }
            let Some(v) = values.get(i).copied().flatten().filter(|v| v.is_finite()) else {
                continue;
            };
            by_group
                .entry(g.to_string().trim_matches('"').to_string())
                .or_default()
                .push(v);
        }
        Ok(by_group)
    }

    /// Rows where both columns hold finite numbers, as (x, y) pairs.
    pub fn paired_values(
        df: &DataFrame,
        x_col: &str,
        y_col: &str,
    ) -> PolarsResult<Vec<[f64; 2]>> {
        let xs = Self::try_column_f64(df, x_col)?;
        let ys = Self::try_column_f64(df, y_col)?;
        Ok(xs
            .into_iter()
            .zip(ys)
            .filter_map(|(x, y)| match (x, y) {
                (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Some([x, y]),
                _ => None,
            })
            .collect())
    }

    /// Occurrence count per distinct value of a categorical column.
    pub fn category_counts(df: &DataFrame, column: &str) -> PolarsResult<Vec<(String, usize)>> {
        let series = df.column(column)?.as_materialized_series().clone();

        let mut counts: HashMap<String, usize> = HashMap::new();
        for i in 0..df.height() {
            let Ok(val) = series.get(i) else { continue };
            if val.is_null() {
                continue;
            }
            *counts
                .entry(val.to_string().trim_matches('"').to_string())
                .or_default() += 1;
        }

        let mut out: Vec<(String, usize)> = counts.into_iter().collect();
        out.sort();
        Ok(out)
    }

    /// Column as f64 options, empty when the column is missing or non-castable.
    fn column_f64(df: &DataFrame, column: &str) -> Vec<Option<f64>> {
        Self::try_column_f64(df, column).unwrap_or_default()
    }

    fn try_column_f64(df: &DataFrame, column: &str) -> PolarsResult<Vec<Option<f64>>> {
        let col_f64 = df.column(column)?.cast(&DataType::Float64)?;
        let ca = col_f64.f64()?;
        Ok(ca.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::{COL_AGE, COL_FIT_SCORE};

    fn frame() -> DataFrame {
        DataFrame::new(vec![
            Column::new("Shoe_Style".into(), ["A", "A", "B", "B", "A"]),
            Column::new("Channel".into(), ["Online", "Store", "Online", "Online", "Online"]),
            Column::new(COL_AGE.into(), [20i64, 28, 40, 52, 61]),
            Column::new(COL_FIT_SCORE.into(), [2.0f64, 4.0, 3.0, 5.0, 1.0]),
        ])
        .unwrap()
    }

    #[test]
    fn bucket_boundaries_are_right_closed() {
        assert_eq!(AgeGroup::from_age(25.0), Some(AgeGroup::Under25));
        assert_eq!(AgeGroup::from_age(26.0), Some(AgeGroup::From25To35));
        assert_eq!(AgeGroup::from_age(35.0), Some(AgeGroup::From25To35));
        assert_eq!(AgeGroup::from_age(45.0), Some(AgeGroup::From35To45));
        assert_eq!(AgeGroup::from_age(60.0), Some(AgeGroup::Over45));
        assert_eq!(AgeGroup::from_age(0.0), None);
        assert_eq!(AgeGroup::from_age(61.0), None);
    }

    #[test]
    fn age_group_column_preserves_unbucketed_rows_as_null() {
        let df = frame();
        let augmented = StatsCalculator::with_age_groups(&df, COL_AGE).unwrap();
        let groups = augmented.column(COL_AGE_GROUP).unwrap();
        assert_eq!(groups.get(0).unwrap().to_string().trim_matches('"'), "<25");
        assert_eq!(groups.get(1).unwrap().to_string().trim_matches('"'), "25-35");
        assert_eq!(groups.get(2).unwrap().to_string().trim_matches('"'), "35-45");
        assert_eq!(groups.get(3).unwrap().to_string().trim_matches('"'), "45+");
        assert!(groups.get(4).unwrap().is_null());
    }

    #[test]
    fn correlation_is_symmetric_with_unit_diagonal() {
        let matrix = StatsCalculator::correlation_matrix(&frame());
        assert_eq!(matrix.columns.len(), 2);
        for i in 0..2 {
            assert!((matrix.get(i, i) - 1.0).abs() < 1e-12);
            for j in 0..2 {
                assert!((matrix.get(i, j) - matrix.get(j, i)).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn perfectly_linear_columns_correlate_to_one() {
        let df = DataFrame::new(vec![
            Column::new("X".into(), [1.0f64, 2.0, 3.0, 4.0]),
            Column::new("Y".into(), [2.0f64, 4.0, 6.0, 8.0]),
            Column::new("Z".into(), [4.0f64, 3.0, 2.0, 1.0]),
        ])
        .unwrap();
        let matrix = StatsCalculator::correlation_matrix(&df);
        assert!((matrix.get(0, 1) - 1.0).abs() < 1e-9);
        assert!((matrix.get(0, 2) + 1.0).abs() < 1e-9);
    }

    #[test]
    fn empty_frame_degrades_to_nan_not_panic() {
        let df = frame().head(Some(0));
        let matrix = StatsCalculator::correlation_matrix(&df);
        assert_eq!(matrix.columns.len(), 2);
        assert!(matrix.get(0, 1).is_nan());
        assert!(matrix.get(0, 0).is_nan());

        let summaries = StatsCalculator::summarize_numeric(&df);
        assert!(summaries.iter().all(|s| s.count == 0));

        let pivot =
            StatsCalculator::pivot_mean(&df, "Shoe_Style", "Channel", COL_FIT_SCORE).unwrap();
        assert!(pivot.is_empty());
    }

    #[test]
    fn pivot_means_match_hand_computation() {
        let pivot =
            StatsCalculator::pivot_mean(&frame(), "Shoe_Style", "Channel", COL_FIT_SCORE).unwrap();

        // Style A / Online: scores 2.0 and 1.0.
        assert_eq!(pivot.get("A", "Online"), Some(1.5));
        // Style A / Store: single score.
        assert_eq!(pivot.get("A", "Store"), Some(4.0));
        // Style B / Online: scores 3.0 and 5.0.
        assert_eq!(pivot.get("B", "Online"), Some(4.0));
        // Style B / Store never occurs: absent, not zero.
        assert_eq!(pivot.get("B", "Store"), None);
    }

    #[test]
    fn summaries_cover_each_numeric_column() {
        let summaries = StatsCalculator::summarize_numeric(&frame());
        let fit = summaries
            .iter()
            .find(|s| s.column == COL_FIT_SCORE)
            .unwrap();
        assert_eq!(fit.count, 5);
        assert!((fit.mean - 3.0).abs() < 1e-12);
        assert!((fit.median - 3.0).abs() < 1e-12);
        assert_eq!(fit.min, 1.0);
        assert_eq!(fit.max, 5.0);
    }

    #[test]
    fn values_by_category_groups_scores() {
        let by_style =
            StatsCalculator::values_by_category(&frame(), "Shoe_Style", COL_FIT_SCORE).unwrap();
        assert_eq!(by_style["A"], vec![2.0, 4.0, 1.0]);
        assert_eq!(by_style["B"], vec![3.0, 5.0]);
    }

    #[test]
    fn category_counts_are_sorted() {
        let counts = StatsCalculator::category_counts(&frame(), "Channel").unwrap();
        assert_eq!(
            counts,
            vec![("Online".to_string(), 4), ("Store".to_string(), 1)]
        );
    }
}
