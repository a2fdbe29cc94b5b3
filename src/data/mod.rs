//! Data module - schema contract, CSV loading, and filtering

mod filter;
mod loader;
pub mod schema;

pub use filter::FilterSelection;
pub use loader::{load_dataset, numeric_columns, unique_values, DataLoader, LoaderError};
pub use schema::{Schema, SchemaVariant};
