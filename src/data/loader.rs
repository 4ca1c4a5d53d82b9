//! CSV Data Loader Module
//! Reads the crime table with Polars and turns it into a normalized [`Dataset`].
//!
//! Coercion policy: every column other than the region, district and year keys
//! is a crime count. Values that are missing or not numeric become zero and
//! fractional values are truncated, so totals can silently include zero-filled
//! cells. Negative values are clamped to zero.

use crate::data::dataset::{
    normalize_key, Dataset, KeyColumns, Record, DISTRICT_COLUMN, REGION_COLUMN, TOTAL_COLUMN,
    TOTAL_DISTRICT, YEAR_COLUMN,
};
use log::{debug, error, info, warn};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// States and union territories present in the NCRB district tables.
pub const KNOWN_REGIONS: [&str; 37] = [
    "A & N ISLANDS",
    "ANDHRA PRADESH",
    "ARUNACHAL PRADESH",
    "ASSAM",
    "BIHAR",
    "CHANDIGARH",
    "CHHATTISGARH",
    "D & N HAVELI",
    "DAMAN & DIU",
    "DELHI",
    "DELHI UT",
    "GOA",
    "GUJARAT",
    "HARYANA",
    "HIMACHAL PRADESH",
    "JAMMU & KASHMIR",
    "JHARKHAND",
    "KARNATAKA",
    "KERALA",
    "LAKSHADWEEP",
    "MADHYA PRADESH",
    "MAHARASHTRA",
    "MANIPUR",
    "MEGHALAYA",
    "MIZORAM",
    "NAGALAND",
    "ODISHA",
    "PUDUCHERRY",
    "PUNJAB",
    "RAJASTHAN",
    "SIKKIM",
    "TAMIL NADU",
    "TELANGANA",
    "TRIPURA",
    "UTTAR PRADESH",
    "UTTARAKHAND",
    "WEST BENGAL",
];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Data unavailable: {} not found or unreadable", path.display())]
    DataUnavailable { path: PathBuf },
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
}

/// Options applied while turning raw rows into a dataset.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Keep only known regions and drop `TOTAL` district summary rows.
    pub restrict_regions: bool,
    /// Allow-list used when `restrict_regions` is set.
    pub allowed_regions: Vec<String>,
    /// Aggregate column used for ratios and trends.
    pub total_column: String,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            restrict_regions: false,
            allowed_regions: KNOWN_REGIONS.iter().map(|r| r.to_string()).collect(),
            total_column: TOTAL_COLUMN.to_string(),
        }
    }
}

/// Loads crime CSV files into normalized datasets.
#[derive(Debug, Clone, Default)]
pub struct DataLoader {
    options: LoadOptions,
}

impl DataLoader {
    pub fn new(options: LoadOptions) -> Self {
        Self { options }
    }

    /// Load a CSV file. A missing or unreadable file is logged and yields an
    /// empty dataset; use [`DataLoader::try_load`] to see the error.
    pub fn load(&self, path: impl AsRef<Path>) -> Dataset {
        match self.try_load(path) {
            Ok(dataset) => dataset,
            Err(e) => {
                error!("{e}");
                Dataset::empty()
            }
        }
    }

    /// Load a CSV file, reporting why it could not be read.
    pub fn try_load(&self, path: impl AsRef<Path>) -> Result<Dataset, LoaderError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(LoaderError::DataUnavailable {
                path: path.to_path_buf(),
            });
        }

        let df = Self::read_csv(path)?;
        info!(
            "Read {} rows, {} columns from {}",
            df.height(),
            df.width(),
            path.display()
        );
        self.from_dataframe(&df)
    }

    /// Read the raw table with Polars.
    pub fn read_csv(path: &Path) -> Result<DataFrame, LoaderError> {
        let path_str = path.to_string_lossy().to_string();

        let df = LazyCsvReader::new(&path_str)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .finish()
            .map_err(|e| {
                debug!("Polars could not scan {path_str}: {e}");
                LoaderError::DataUnavailable {
                    path: path.to_path_buf(),
                }
            })?
            .collect()?;

        Ok(df)
    }

    /// Convert a raw DataFrame into a dataset, applying normalization,
    /// coercion and (optionally) the region allow-list.
    pub fn from_dataframe(&self, df: &DataFrame) -> Result<Dataset, LoaderError> {
        let height = df.height();

        let mut region: Option<Vec<Option<String>>> = None;
        let mut district: Option<Vec<Option<String>>> = None;
        let mut year: Option<Vec<Option<i64>>> = None;
        let mut categories: Vec<String> = Vec::new();
        let mut count_columns: Vec<Vec<u64>> = Vec::new();

        for column in df.get_columns() {
            let name = normalize_key(column.name());
            let series = column.as_materialized_series();

            match name.as_str() {
                REGION_COLUMN => region = Some(Self::string_values(series)?),
                DISTRICT_COLUMN => district = Some(Self::string_values(series)?),
                YEAR_COLUMN => year = Some(Self::year_values(series)?),
                _ => {
                    count_columns.push(Self::count_values(series)?);
                    categories.push(name);
                }
            }
        }

        let keys = KeyColumns {
            region: region.is_some(),
            district: district.is_some(),
            year: year.is_some(),
        };

        let allowed: Vec<String> = self
            .options
            .allowed_regions
            .iter()
            .map(|r| normalize_key(r))
            .collect();

        let mut records = Vec::with_capacity(height);
        let mut dropped = 0usize;

        for i in 0..height {
            let counts: Vec<u64> = count_columns.iter().map(|col| col[i]).collect();
            let record = Record::new(
                region.as_ref().and_then(|v| v[i].as_deref()),
                district.as_ref().and_then(|v| v[i].as_deref()),
                year.as_ref().and_then(|v| v[i]),
                counts,
            );

            if self.options.restrict_regions && !Self::passes_allow_list(&record, &allowed) {
                dropped += 1;
                continue;
            }
            records.push(record);
        }

        if dropped > 0 {
            warn!("Dropped {dropped} rows outside the region allow-list or marked as TOTAL");
        }
        if !keys.region {
            warn!("Dataset has no {REGION_COLUMN} column");
        }
        debug!("Crime categories: {categories:?}");

        Ok(Dataset::new(keys, categories, records).with_total_column(&self.options.total_column))
    }

    fn passes_allow_list(record: &Record, allowed: &[String]) -> bool {
        let known = record
            .region()
            .map(|r| allowed.iter().any(|a| a == r))
            .unwrap_or(false);
        known && record.district() != Some(TOTAL_DISTRICT)
    }

    fn string_values(series: &Series) -> Result<Vec<Option<String>>, LoaderError> {
        let strings = series.cast(&DataType::String)?;
        let ca = strings.str()?;
        Ok(ca.into_iter().map(|v| v.map(|s| s.to_string())).collect())
    }

    fn year_values(series: &Series) -> Result<Vec<Option<i64>>, LoaderError> {
        let floats = series.cast(&DataType::Float64)?;
        let ca = floats.f64()?;
        Ok(ca
            .into_iter()
            .map(|v| v.filter(|v| v.is_finite()).map(|v| v.trunc() as i64))
            .collect())
    }

    fn count_values(series: &Series) -> Result<Vec<u64>, LoaderError> {
        let floats = series.cast(&DataType::Float64)?;
        let ca = floats.f64()?;
        Ok(ca.into_iter().map(coerce_count).collect())
    }
}

/// Largest count kept as-is: beyond 2^53 an `f64` no longer holds whole numbers.
pub const MAX_COUNT: u64 = 1 << 53;

/// Missing, non-numeric and negative values become zero; the rest are truncated
/// and capped at [`MAX_COUNT`].
pub fn coerce_count(value: Option<f64>) -> u64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => (v.trunc() as u64).min(MAX_COUNT),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame() -> DataFrame {
        polars::df!(
            " state/ut " => &[" Kerala", "kerala ", "Goa", "Atlantis", "Goa"],
            "District" => &["Kochi", "total", "North Goa", "Nowhere", "South Goa"],
            "Year" => &[2013i64, 2013, 2013, 2013, 2014],
            "Murder" => &["4", "9", "oops", "1", "2.7"],
            "TOTAL IPC CRIMES" => &[Some(10.0), Some(20.0), None, Some(5.0), Some(-3.0)],
        )
        .unwrap()
    }

    #[test]
    fn headers_and_keys_are_normalized() {
        let dataset = DataLoader::default().from_dataframe(&sample_frame()).unwrap();

        assert_eq!(dataset.keys(), KeyColumns::all());
        assert_eq!(dataset.categories(), &["MURDER", "TOTAL IPC CRIMES"]);
        assert_eq!(dataset.len(), 5);

        let first = &dataset.records()[0];
        assert_eq!(first.region(), Some("KERALA"));
        assert_eq!(first.district(), Some("KOCHI"));
        assert_eq!(first.year(), Some(2013));
    }

    #[test]
    fn counts_are_coerced_to_non_negative_integers() {
        let dataset = DataLoader::default().from_dataframe(&sample_frame()).unwrap();
        let murder: Vec<u64> = dataset.records().iter().map(|r| r.count(0)).collect();
        let total: Vec<u64> = dataset.records().iter().map(|r| r.count(1)).collect();

        assert_eq!(murder, vec![4, 9, 0, 1, 2]);
        assert_eq!(total, vec![10, 20, 0, 5, 0]);
    }

    #[test]
    fn allow_list_drops_unknown_regions_and_total_rows() {
        let loader = DataLoader::new(LoadOptions {
            restrict_regions: true,
            ..LoadOptions::default()
        });
        let dataset = loader.from_dataframe(&sample_frame()).unwrap();

        let districts: Vec<&str> = dataset
            .records()
            .iter()
            .filter_map(|r| r.district())
            .collect();
        assert_eq!(districts, vec!["KOCHI", "NORTH GOA", "SOUTH GOA"]);
    }

    #[test]
    fn missing_file_is_data_unavailable() {
        let loader = DataLoader::default();
        let err = loader.try_load("definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, LoaderError::DataUnavailable { .. }));
        assert!(loader.load("definitely/not/here.csv").is_empty());
    }

    #[test]
    fn coerce_count_policy() {
        assert_eq!(coerce_count(None), 0);
        assert_eq!(coerce_count(Some(f64::NAN)), 0);
        assert_eq!(coerce_count(Some(-2.0)), 0);
        assert_eq!(coerce_count(Some(7.9)), 7);
        assert_eq!(coerce_count(Some(1e19)), MAX_COUNT);
        assert_eq!(coerce_count(Some(f64::MAX)), MAX_COUNT);
    }
}
