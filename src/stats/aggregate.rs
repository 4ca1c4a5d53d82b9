//! Crime Aggregation Module
//! Distinct values, filters, safety ratios and crime composition over a [`Dataset`].

use crate::data::{normalize_key, Dataset, Record};
use rayon::prelude::*;
use std::collections::BTreeSet;

/// Categories considered for the composition breakdown, in tie-break order.
pub const COMPOSITION_CATEGORIES: [&str; 9] = [
    "MURDER",
    "RAPE",
    "KIDNAPPING & ABDUCTION",
    "THEFT",
    "BURGLARY",
    "DOWRY DEATHS",
    "ASSAULT ON WOMEN WITH INTENT TO OUTRAGE HER MODESTY",
    "CRUELTY BY HUSBAND OR HIS RELATIVES",
    "ARSON",
];

/// Categories shown in the district "major crime comparison" chart.
pub const MAJOR_CRIME_CATEGORIES: [&str; 7] = [
    "MURDER",
    "RAPE",
    "KIDNAPPING & ABDUCTION",
    "THEFT",
    "BURGLARY",
    "DOWRY DEATHS",
    "TOTAL IPC CRIMES",
];

/// Label of the bucket that folds categories beyond the top N.
pub const OTHER_LABEL: &str = "OTHER IPC CRIMES";
/// Label of the sentinel entry returned when nothing can be broken down.
pub const NO_MAJOR_CRIMES_LABEL: &str = "NO MAJOR CRIMES";

pub const DEFAULT_TOP_N: usize = 5;

/// Sum of counts that saturates at `u64::MAX` instead of overflowing.
pub(crate) fn saturating_sum(values: impl Iterator<Item = u64>) -> u64 {
    values.fold(0, u64::saturating_add)
}

/// Ranked breakdown of a region's crime counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Composition {
    /// No matching rows, or every category summed to zero.
    NoMajorCrimes,
    /// Top categories, descending, plus the folded remainder when positive.
    Ranked {
        top: Vec<(String, u64)>,
        other: Option<u64>,
    },
}

impl Composition {
    /// Entries in display order. The sentinel is reported as a single
    /// `NO MAJOR CRIMES` entry with count 1.
    pub fn entries(&self) -> Vec<(String, u64)> {
        match self {
            Composition::NoMajorCrimes => vec![(NO_MAJOR_CRIMES_LABEL.to_string(), 1)],
            Composition::Ranked { top, other } => {
                let mut entries = top.clone();
                if let Some(other) = other {
                    entries.push((OTHER_LABEL.to_string(), *other));
                }
                entries
            }
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Composition::NoMajorCrimes)
    }

    /// Sum of all real counts (zero for the sentinel).
    pub fn total(&self) -> u64 {
        match self {
            Composition::NoMajorCrimes => 0,
            Composition::Ranked { top, other } => {
                let top_sum = saturating_sum(top.iter().map(|(_, v)| *v));
                top_sum.saturating_add(other.unwrap_or(0))
            }
        }
    }
}

/// Side-by-side figures for two regions.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionComparison {
    pub first: String,
    pub second: String,
    pub first_total: u64,
    pub second_total: u64,
    pub first_ratio: f64,
    pub second_ratio: f64,
    /// `(second - first) / first * 100`; `None` when the first total is zero.
    pub total_diff_percent: Option<f64>,
    /// `second_ratio - first_ratio`.
    pub ratio_diff: f64,
}

impl RegionComparison {
    /// The region with the higher safety ratio (the first one on ties).
    pub fn safer(&self) -> &str {
        if self.first_ratio >= self.second_ratio {
            &self.first
        } else {
            &self.second
        }
    }
}

/// Stateless aggregation functions over the crime table.
pub struct CrimeAnalytics;

impl CrimeAnalytics {
    /// Unique regions, ascending. Empty when the region column is absent.
    pub fn distinct_regions(dataset: &Dataset) -> Vec<String> {
        if !dataset.keys().region {
            return Vec::new();
        }

        dataset
            .records()
            .iter()
            .filter_map(|r| r.region())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Unique years, ascending. Empty when the year column is absent.
    pub fn distinct_years(dataset: &Dataset) -> Vec<i64> {
        if !dataset.keys().year {
            return Vec::new();
        }

        dataset
            .records()
            .iter()
            .filter_map(Record::year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Districts of a region (optionally in one year), ascending. Blank and
    /// purely numeric labels are skipped.
    pub fn distinct_districts(dataset: &Dataset, region: &str, year: Option<i64>) -> Vec<String> {
        if !dataset.keys().district {
            return Vec::new();
        }

        dataset
            .region_records(region)
            .filter(|r| year.is_none() || r.year() == year)
            .filter_map(|r| r.district())
            .filter(|d| !d.is_empty() && !d.chars().all(|c| c.is_ascii_digit()))
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Rows matching the region, and the district/year when given. A blank
    /// district does not filter.
    pub fn filter_rows(
        dataset: &Dataset,
        region: &str,
        district: Option<&str>,
        year: Option<i64>,
    ) -> Dataset {
        let region = normalize_key(region);
        let district = district.map(normalize_key).filter(|d| !d.is_empty());

        let records = dataset
            .records()
            .iter()
            .filter(|r| year.is_none() || r.year() == year)
            .filter(|r| r.region() == Some(region.as_str()))
            .filter(|r| match &district {
                Some(d) => r.district() == Some(d.as_str()),
                None => true,
            })
            .cloned()
            .collect();

        dataset.with_records(records)
    }

    /// Sum of the TOTAL column over the whole dataset (zero when absent).
    pub fn grand_total(dataset: &Dataset) -> u64 {
        let Some(idx) = dataset.total_index() else {
            return 0;
        };
        saturating_sum(dataset.records().iter().map(|r| r.count(idx)))
    }

    /// Sum of the TOTAL column over one region (zero when absent).
    pub fn region_total(dataset: &Dataset, region: &str) -> u64 {
        let Some(idx) = dataset.total_index() else {
            return 0;
        };
        saturating_sum(dataset.region_records(region).map(|r| r.count(idx)))
    }

    /// `(1 - regionTotal / grandTotal) * 100`, or 100 when the grand total is zero.
    pub fn safety_ratio(dataset: &Dataset, region: &str) -> f64 {
        let grand_total = Self::grand_total(dataset);
        if grand_total == 0 {
            return 100.0;
        }

        let region_total = Self::region_total(dataset, region);
        let ratio = (1.0 - region_total as f64 / grand_total as f64) * 100.0;
        ratio.clamp(0.0, 100.0)
    }

    /// Sums of the requested categories that exist, in request order.
    pub fn category_sums(dataset: &Dataset, categories: &[&str]) -> Vec<(String, u64)> {
        categories
            .iter()
            .filter_map(|name| {
                let idx = dataset.category_index(name)?;
                let sum = saturating_sum(dataset.records().iter().map(|r| r.count(idx)));
                Some((normalize_key(name), sum))
            })
            .collect()
    }

    /// Top `top_n` crime categories of a region with the rest folded into
    /// `OTHER IPC CRIMES`.
    pub fn top_crime_composition(dataset: &Dataset, region: &str, top_n: usize) -> Composition {
        let columns: Vec<(&str, usize)> = COMPOSITION_CATEGORIES
            .iter()
            .filter_map(|name| dataset.category_index(name).map(|idx| (*name, idx)))
            .collect();

        let mut sums = vec![0u64; columns.len()];
        let mut matched = false;
        for record in dataset.region_records(region) {
            matched = true;
            for (sum, (_, idx)) in sums.iter_mut().zip(&columns) {
                *sum = sum.saturating_add(record.count(*idx));
            }
        }

        if !matched {
            return Composition::NoMajorCrimes;
        }

        let mut ranked: Vec<(String, u64)> = columns
            .iter()
            .zip(sums)
            .filter(|(_, sum)| *sum > 0)
            .map(|((name, _), sum)| (name.to_string(), sum))
            .collect();

        if ranked.is_empty() {
            return Composition::NoMajorCrimes;
        }

        // Stable: ties keep declaration order.
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        let rest = if ranked.len() > top_n {
            ranked.split_off(top_n)
        } else {
            Vec::new()
        };
        let other_sum = saturating_sum(rest.iter().map(|(_, v)| *v));

        Composition::Ranked {
            top: ranked,
            other: (other_sum > 0).then_some(other_sum),
        }
    }

    /// Totals and safety ratios of two regions side by side.
    pub fn compare_regions(dataset: &Dataset, first: &str, second: &str) -> RegionComparison {
        let first_total = Self::region_total(dataset, first);
        let second_total = Self::region_total(dataset, second);
        let first_ratio = Self::safety_ratio(dataset, first);
        let second_ratio = Self::safety_ratio(dataset, second);

        let total_diff_percent = (first_total > 0).then(|| {
            (second_total as f64 - first_total as f64) / first_total as f64 * 100.0
        });

        RegionComparison {
            first: normalize_key(first),
            second: normalize_key(second),
            first_total,
            second_total,
            first_ratio,
            second_ratio,
            total_diff_percent,
            ratio_diff: second_ratio - first_ratio,
        }
    }

    /// Every region's safety ratio, safest first (ties by name).
    pub fn safety_ranking(dataset: &Dataset) -> Vec<(String, f64)> {
        let regions = Self::distinct_regions(dataset);

        let mut ranking: Vec<(String, f64)> = regions
            .par_iter()
            .map(|region| (region.clone(), Self::safety_ratio(dataset, region)))
            .collect();

        ranking.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        ranking
    }
}
