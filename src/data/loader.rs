//! CSV Data Loader Module
//! Loads the survey CSV with Polars, normalizes headers, and validates the schema.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::schema::{normalize_header, Schema, SchemaError};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Read a CSV from disk, normalize every header, and detect the schema.
/// The file is read exactly once; the returned frame is immutable afterwards.
pub fn load_dataset(path: &Path) -> Result<(DataFrame, Schema), LoaderError> {
    if !path.exists() {
        return Err(LoaderError::FileNotFound(path.to_path_buf()));
    }

    let df = LazyCsvReader::new(path.to_string_lossy().as_ref())
        .with_infer_schema_length(Some(10000))
        .with_ignore_errors(true)
        .finish()?
        .collect()?;

    let (df, schema) = normalize_and_validate(df)?;
    log::info!(
        "Loaded {} rows from {} ({:?} schema, income: {})",
        df.height(),
        path.display(),
        schema.variant,
        schema.has_income
    );
    Ok((df, schema))
}

/// Apply header normalization to an already-parsed frame and validate it.
pub fn normalize_and_validate(mut df: DataFrame) -> Result<(DataFrame, Schema), LoaderError> {
    let renames: Vec<(String, String)> = df
        .get_column_names()
        .iter()
        .map(|c| (c.to_string(), normalize_header(c)))
        .filter(|(old, new)| old != new)
        .collect();

    for (old, new) in renames {
        df.rename(&old, new.into())?;
    }

    let columns: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    let schema = Schema::detect(&columns)?;
    Ok((df, schema))
}

/// Holds the loaded survey dataset and its detected schema.
pub struct DataLoader {
    df: Option<DataFrame>,
    schema: Option<Schema>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            df: None,
            schema: None,
        }
    }

    /// Install a frame loaded elsewhere (used by the background loader).
    pub fn set_dataset(&mut self, df: DataFrame, schema: Schema) {
        self.df = Some(df);
        self.schema = Some(schema);
    }

    pub fn get_dataframe(&self) -> Option<&DataFrame> {
        self.df.as_ref()
    }

    pub fn schema(&self) -> Option<Schema> {
        self.schema
    }

    pub fn get_row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }
}

/// Sorted unique string values of a column, nulls excluded.
pub fn unique_values(df: &DataFrame, column: &str) -> Vec<String> {
    df.column(column)
        .ok()
        .and_then(|col| col.unique().ok())
        .map(|unique| {
            let series = unique.as_materialized_series();
            let mut values: Vec<String> = (0..series.len())
                .filter_map(|i| {
                    let val = series.get(i).ok()?;
                    if val.is_null() {
                        None
                    } else {
                        Some(val.to_string().trim_matches('"').to_string())
                    }
                })
                .collect();
            values.sort();
            values
        })
        .unwrap_or_default()
}

/// Names of all columns with a numeric dtype.
pub fn numeric_columns(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| {
            matches!(
                col.dtype(),
                DataType::Float32
                    | DataType::Float64
                    | DataType::Int8
                    | DataType::Int16
                    | DataType::Int32
                    | DataType::Int64
                    | DataType::UInt8
                    | DataType::UInt16
                    | DataType::UInt32
                    | DataType::UInt64
            )
        })
        .map(|col| col.name().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::{SchemaVariant, COL_AGE, COL_FIT_SCORE, COL_GENDER};

    fn raw_frame() -> DataFrame {
        DataFrame::new(vec![
            Column::new("gender".into(), ["M", "F"]),
            Column::new(" age".into(), [30i64, 41]),
            Column::new("fit satisfaction score".into(), [4.0f64, 2.5]),
            Column::new("shopping channel".into(), ["Online", "Store"]),
            Column::new("preferred style".into(), ["Sneaker", "Boot"]),
        ])
        .unwrap()
    }

    #[test]
    fn normalizes_headers_and_detects_schema() {
        let (df, schema) = normalize_and_validate(raw_frame()).unwrap();
        let cols: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert!(cols.contains(&COL_GENDER.to_string()));
        assert!(cols.contains(&COL_AGE.to_string()));
        assert!(cols.contains(&COL_FIT_SCORE.to_string()));
        assert_eq!(schema.variant, SchemaVariant::SurveyNames);
    }

    #[test]
    fn rejects_frame_without_fit_score() {
        let df = DataFrame::new(vec![
            Column::new("gender".into(), ["M", "F"]),
            Column::new("age".into(), [30i64, 41]),
        ])
        .unwrap();
        assert!(matches!(
            normalize_and_validate(df),
            Err(LoaderError::Schema(_))
        ));
    }

    #[test]
    fn missing_file_is_reported_as_such() {
        let err = load_dataset(Path::new("/nonexistent/survey.csv")).unwrap_err();
        assert!(matches!(err, LoaderError::FileNotFound(_)));
    }

    #[test]
    fn numeric_columns_skip_categoricals() {
        let (df, _) = normalize_and_validate(raw_frame()).unwrap();
        let numeric = numeric_columns(&df);
        assert_eq!(numeric, vec![COL_AGE.to_string(), COL_FIT_SCORE.to_string()]);
    }
}
