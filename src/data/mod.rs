//! Data module - CSV loading and the normalized crime table

mod dataset;
mod loader;

pub use dataset::{
    normalize_key, Dataset, KeyColumns, Record, DISTRICT_COLUMN, REGION_COLUMN, TOTAL_COLUMN,
    TOTAL_DISTRICT, YEAR_COLUMN,
};
pub use loader::{
    coerce_count, DataLoader, LoadOptions, LoaderError, KNOWN_REGIONS, MAX_COUNT,
};
