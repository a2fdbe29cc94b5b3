//! Stats module - derived views over the filtered dataset

mod calculator;

pub use calculator::{
    AgeGroup, ColumnSummary, CorrelationMatrix, PivotTable, StatsCalculator,
};
