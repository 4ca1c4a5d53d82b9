//! Stats module - aggregation and trend prediction

mod aggregate;
mod trend;

pub use aggregate::{
    Composition, CrimeAnalytics, RegionComparison, COMPOSITION_CATEGORIES, DEFAULT_TOP_N,
    MAJOR_CRIME_CATEGORIES, NO_MAJOR_CRIMES_LABEL, OTHER_LABEL,
};
pub use trend::{LinearTrend, Prediction, TrendError, TrendPredictor, DEFAULT_HORIZON};
