//! Charts module - Chart rendering

mod plotter;
mod renderer;

pub use plotter::{format_count, ChartPlotter, PALETTE, PREDICTION_COLOR, PRIMARY_COLOR};
pub use renderer::{ExportError, StaticChartRenderer};
