//! Schema Contract Module
//! Normalized column names, variant detection, and load-time validation.

use thiserror::Error;

/// Columns required by every dataset variant.
pub const COL_GENDER: &str = "Gender";
pub const COL_AGE: &str = "Age";
pub const COL_FIT_SCORE: &str = "Fit_Satisfaction_Score";

/// Variant-specific categorical columns.
pub const COL_SHOPPING_CHANNEL: &str = "Shopping_Channel";
pub const COL_PREFERRED_STYLE: &str = "Preferred_Style";
pub const COL_CHANNEL: &str = "Channel";
pub const COL_SHOE_STYLE: &str = "Shoe_Style";

/// Optional column, present in one variant only.
pub const COL_INCOME: &str = "Income";

/// Derived column added by age bucketing.
pub const COL_AGE_GROUP: &str = "Age_Group";

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Required column missing after normalization: {0}")]
    MissingColumn(&'static str),
    #[error(
        "No channel/style columns found: expected {COL_SHOPPING_CHANNEL}/{COL_PREFERRED_STYLE} \
         or {COL_CHANNEL}/{COL_SHOE_STYLE}"
    )]
    UnknownVariant,
}

/// Which pair of channel/style column names the source CSV uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaVariant {
    /// Shopping_Channel / Preferred_Style
    SurveyNames,
    /// Channel / Shoe_Style (optionally with Income)
    RetailNames,
}

/// Resolved schema for a loaded dataset: detected once, referenced everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    pub variant: SchemaVariant,
    pub has_income: bool,
}

impl Schema {
    /// Detect the schema variant from normalized column names and validate
    /// that every required column is present. Income is optional.
    pub fn detect(columns: &[String]) -> Result<Schema, SchemaError> {
        let has = |name: &str| columns.iter().any(|c| c == name);

        for required in [COL_GENDER, COL_AGE, COL_FIT_SCORE] {
            if !has(required) {
                return Err(SchemaError::MissingColumn(required));
            }
        }

        let variant = if has(COL_SHOPPING_CHANNEL) && has(COL_PREFERRED_STYLE) {
            SchemaVariant::SurveyNames
        } else if has(COL_CHANNEL) && has(COL_SHOE_STYLE) {
            SchemaVariant::RetailNames
        } else {
            return Err(SchemaError::UnknownVariant);
        };

        Ok(Schema {
            variant,
            has_income: has(COL_INCOME),
        })
    }

    /// Name of the shopping-channel column for this variant.
    pub fn channel_col(&self) -> &'static str {
        match self.variant {
            SchemaVariant::SurveyNames => COL_SHOPPING_CHANNEL,
            SchemaVariant::RetailNames => COL_CHANNEL,
        }
    }

    /// Name of the shoe-style column for this variant.
    pub fn style_col(&self) -> &'static str {
        match self.variant {
            SchemaVariant::SurveyNames => COL_PREFERRED_STYLE,
            SchemaVariant::RetailNames => COL_SHOE_STYLE,
        }
    }

    /// Income column name, if the dataset carries one.
    pub fn income_col(&self) -> Option<&'static str> {
        self.has_income.then_some(COL_INCOME)
    }
}

/// Normalize a raw CSV header: trim, internal spaces to underscores, then
/// title-case each word (`"shoe style "` becomes `Shoe_Style`).
pub fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().replace(' ', "_");

    let mut out = String::with_capacity(trimmed.len());
    let mut at_word_start = true;
    for ch in trimmed.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_spacing_and_case() {
        assert_eq!(normalize_header("shoe style "), "Shoe_Style");
        assert_eq!(normalize_header("  Fit Satisfaction Score"), "Fit_Satisfaction_Score");
        assert_eq!(normalize_header("AGE"), "Age");
        assert_eq!(normalize_header("Gender"), "Gender");
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = normalize_header("shopping channel");
        assert_eq!(normalize_header(&once), once);
    }

    #[test]
    fn detects_survey_variant() {
        let cols: Vec<String> = [
            COL_GENDER,
            COL_AGE,
            COL_FIT_SCORE,
            COL_SHOPPING_CHANNEL,
            COL_PREFERRED_STYLE,
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let schema = Schema::detect(&cols).unwrap();
        assert_eq!(schema.variant, SchemaVariant::SurveyNames);
        assert_eq!(schema.channel_col(), COL_SHOPPING_CHANNEL);
        assert_eq!(schema.style_col(), COL_PREFERRED_STYLE);
        assert!(schema.income_col().is_none());
    }

    #[test]
    fn detects_retail_variant_with_income() {
        let cols: Vec<String> = [
            COL_GENDER,
            COL_AGE,
            COL_FIT_SCORE,
            COL_CHANNEL,
            COL_SHOE_STYLE,
            COL_INCOME,
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let schema = Schema::detect(&cols).unwrap();
        assert_eq!(schema.variant, SchemaVariant::RetailNames);
        assert_eq!(schema.income_col(), Some(COL_INCOME));
    }

    #[test]
    fn missing_required_column_fails() {
        let cols: Vec<String> = [COL_GENDER, COL_AGE, COL_CHANNEL, COL_SHOE_STYLE]
            .iter()
            .map(|s| s.to_string())
            .collect();

        match Schema::detect(&cols) {
            Err(SchemaError::MissingColumn(col)) => assert_eq!(col, COL_FIT_SCORE),
            other => panic!("expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn unknown_channel_style_pair_fails() {
        let cols: Vec<String> = [COL_GENDER, COL_AGE, COL_FIT_SCORE]
            .iter()
            .map(|s| s.to_string())
            .collect();

        assert!(matches!(Schema::detect(&cols), Err(SchemaError::UnknownVariant)));
    }
}
