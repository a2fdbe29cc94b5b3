//! Filter Selection Module
//! Conjunctive set-membership filtering over the three categorical columns.

use polars::prelude::*;
use std::collections::BTreeSet;

use super::loader::unique_values;
use super::schema::{Schema, COL_GENDER};

/// User-selected subsets of allowed values for each categorical column.
///
/// A row passes iff its Gender, Channel, and Style values are each members
/// of the corresponding set. An empty set admits nothing; a set equal to
/// the full observed value set is a no-op for that column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSelection {
    pub gender: BTreeSet<String>,
    pub channel: BTreeSet<String>,
    pub style: BTreeSet<String>,
}

impl FilterSelection {
    /// Default selection: every observed distinct value of each column.
    pub fn all_observed(df: &DataFrame, schema: Schema) -> Self {
        Self {
            gender: unique_values(df, COL_GENDER).into_iter().collect(),
            channel: unique_values(df, schema.channel_col()).into_iter().collect(),
            style: unique_values(df, schema.style_col()).into_iter().collect(),
        }
    }

    /// Row-filter the dataset, preserving original row order.
    pub fn apply(&self, df: &DataFrame, schema: Schema) -> PolarsResult<DataFrame> {
        if df.height() == 0 || self.gender.is_empty() || self.channel.is_empty() || self.style.is_empty()
        {
            return Ok(df.head(Some(0)));
        }

        let gender = df.column(COL_GENDER)?.as_materialized_series();
        let channel = df.column(schema.channel_col())?.as_materialized_series();
        let style = df.column(schema.style_col())?.as_materialized_series();

        let mut keep: Vec<bool> = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            let passes = Self::value_in(gender, i, &self.gender)
                && Self::value_in(channel, i, &self.channel)
                && Self::value_in(style, i, &self.style);
            keep.push(passes);
        }

        let mask = BooleanChunked::from_slice("keep".into(), &keep);
        df.filter(&mask)
    }

    /// Membership test for one cell; nulls never match a selection.
    fn value_in(series: &Series, idx: usize, selected: &BTreeSet<String>) -> bool {
        match series.get(idx) {
            Ok(val) if !val.is_null() => {
                selected.contains(val.to_string().trim_matches('"'))
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::{SchemaVariant, COL_AGE, COL_FIT_SCORE};

    fn sample_frame() -> (DataFrame, Schema) {
        let df = DataFrame::new(vec![
            Column::new(COL_GENDER.into(), ["M", "F", "F", "M"]),
            Column::new("Channel".into(), ["Online", "Online", "Store", "Store"]),
            Column::new("Shoe_Style".into(), ["A", "B", "A", "B"]),
            Column::new(COL_AGE.into(), [22i64, 30, 41, 55]),
            Column::new(COL_FIT_SCORE.into(), [3.0f64, 4.5, 2.0, 5.0]),
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
    fn default_selection_is_identity() {
        let (df, schema) = sample_frame();
        let selection = FilterSelection::all_observed(&df, schema);
        let filtered = selection.apply(&df, schema).unwrap();
        assert!(filtered.equals(&df));
    }

    #[test]
    fn keeps_only_matching_rows_in_order() {
        let (df, schema) = sample_frame();
        let selection = FilterSelection {
            gender: set(&["F"]),
            channel: set(&["Online", "Store"]),
            style: set(&["A", "B"]),
        };
        let filtered = selection.apply(&df, schema).unwrap();
        assert_eq!(filtered.height(), 2);

        let genders = unique_values(&filtered, COL_GENDER);
        assert_eq!(genders, vec!["F".to_string()]);

        // Row order preserved: ages 30 then 41.
        let ages: Vec<i64> = filtered
            .column(COL_AGE)
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(ages, vec![30, 41]);
    }

    #[test]
    fn conjunction_across_columns() {
        let (df, schema) = sample_frame();
        let selection = FilterSelection {
            gender: set(&["M"]),
            channel: set(&["Store"]),
            style: set(&["B"]),
        };
        let filtered = selection.apply(&df, schema).unwrap();
        assert_eq!(filtered.height(), 1);
        let ages: Vec<i64> = filtered
            .column(COL_AGE)
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(ages, vec![55]);
    }

    #[test]
    fn empty_selection_yields_empty_frame() {
        let (df, schema) = sample_frame();
        let selection = FilterSelection {
            gender: BTreeSet::new(),
            channel: set(&["Online", "Store"]),
            style: set(&["A", "B"]),
        };
        let filtered = selection.apply(&df, schema).unwrap();
        assert_eq!(filtered.height(), 0);
        // Schema survives even when no rows do.
        assert_eq!(filtered.width(), df.width());
    }

    #[test]
    fn filtering_is_idempotent() {
        let (df, schema) = sample_frame();
        let selection = FilterSelection {
            gender: set(&["F", "M"]),
            channel: set(&["Online"]),
            style: set(&["A", "B"]),
        };
        let once = selection.apply(&df, schema).unwrap();
        let twice = selection.apply(&once, schema).unwrap();
        assert!(once.equals(&twice));
    }
}
