//! GUI module - User interface components

mod app;
mod dashboard;
mod filter_panel;

pub use app::FitLensApp;
pub use dashboard::{Dashboard, DashboardData};
pub use filter_panel::{FilterPanel, FilterPanelAction};
