//! Trend & Prediction Module
//! Per-year totals and a least-squares projection of future crime counts.

use crate::data::Dataset;
use statrs::statistics::Statistics;
use std::collections::BTreeMap;
use thiserror::Error;

pub const DEFAULT_HORIZON: usize = 5;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrendError {
    #[error("Insufficient historical data for prediction: {years} year(s) available, at least 2 required")]
    InsufficientHistory { years: usize },
}

/// One projected year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prediction {
    pub year: i64,
    pub predicted: u64,
}

/// Fitted line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTrend {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    x_mean: f64,
    y_mean: f64,
}

impl LinearTrend {
    /// Value of the line at `x`, evaluated around the sample means.
    pub fn value_at(&self, x: f64) -> f64 {
        self.y_mean + self.slope * (x - self.x_mean)
    }
}

/// Trend fitting and extrapolation.
pub struct TrendPredictor;

impl TrendPredictor {
    /// TOTAL summed per year for one region, ascending by year. Empty when
    /// the dataset has no year or TOTAL column.
    pub fn yearly_totals(dataset: &Dataset, region: &str) -> Vec<(i64, u64)> {
        let Some(idx) = dataset.total_index() else {
            return Vec::new();
        };
        if !dataset.keys().year {
            return Vec::new();
        }

        let mut totals: BTreeMap<i64, u64> = BTreeMap::new();
        for record in dataset.region_records(region) {
            if let Some(year) = record.year() {
                let total = totals.entry(year).or_default();
                *total = total.saturating_add(record.count(idx));
            }
        }
        totals.into_iter().collect()
    }

    /// Ordinary least squares over `(year, total)` points.
    pub fn fit_linear(series: &[(i64, u64)]) -> Result<LinearTrend, TrendError> {
        let mut distinct: Vec<i64> = series.iter().map(|(x, _)| *x).collect();
        distinct.sort_unstable();
        distinct.dedup();
        if distinct.len() < 2 {
            return Err(TrendError::InsufficientHistory {
                years: distinct.len(),
            });
        }

        let xs: Vec<f64> = series.iter().map(|(x, _)| *x as f64).collect();
        let ys: Vec<f64> = series.iter().map(|(_, y)| *y as f64).collect();
        let x_mean = xs.iter().mean();
        let y_mean = ys.iter().mean();

        let (sxy, sxx) = xs
            .iter()
            .zip(&ys)
            .fold((0.0, 0.0), |(sxy, sxx), (x, y)| {
                let dx = x - x_mean;
                (sxy + dx * (y - y_mean), sxx + dx * dx)
            });

        let slope = sxy / sxx;
        let intercept = y_mean - slope * x_mean;

        let ss_tot: f64 = ys.iter().map(|y| (y - y_mean).powi(2)).sum();
        let ss_res: f64 = xs
            .iter()
            .zip(&ys)
            .map(|(x, y)| (y - (y_mean + slope * (x - x_mean))).powi(2))
            .sum();
        let r_squared = if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 1.0 };

        Ok(LinearTrend {
            slope,
            intercept,
            r_squared,
            x_mean,
            y_mean,
        })
    }

    /// Project `horizon` years past the last observed year. Negative values
    /// are clamped to zero, the rest truncated to whole counts.
    pub fn predict_future(
        dataset: &Dataset,
        region: &str,
        horizon: usize,
    ) -> Result<Vec<Prediction>, TrendError> {
        let series = Self::yearly_totals(dataset, region);
        let trend = Self::fit_linear(&series)?;
        let last = series
            .last()
            .map(|(year, _)| *year)
            .ok_or(TrendError::InsufficientHistory { years: 0 })?;

        Ok(Self::extrapolate(&trend, last, horizon))
    }

    /// Predictions for `last + 1 ..= last + horizon`.
    pub fn extrapolate(trend: &LinearTrend, last: i64, horizon: usize) -> Vec<Prediction> {
        (1..=horizon as i64)
            .map(|step| {
                let year = last + step;
                let value = trend.value_at(year as f64);
                Prediction {
                    year,
                    predicted: value.max(0.0).trunc() as u64,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{KeyColumns, Record};

    fn region_series(rows: &[(&str, i64, u64)]) -> Dataset {
        let records = rows
            .iter()
            .map(|(region, year, total)| {
                Record::new(Some(*region), None, Some(*year), vec![*total])
            })
            .collect();
        Dataset::new(KeyColumns::all(), vec!["TOTAL IPC CRIMES".into()], records)
    }

    #[test]
    fn linear_history_extrapolates_exactly() {
        let d = region_series(&[("X", 2010, 100), ("X", 2011, 200), ("X", 2012, 300)]);
        let predictions = TrendPredictor::predict_future(&d, "X", 2).unwrap();
        assert_eq!(
            predictions,
            vec![
                Prediction {
                    year: 2013,
                    predicted: 400,
                },
                Prediction {
                    year: 2014,
                    predicted: 500,
                },
            ]
        );
    }

    #[test]
    fn yearly_totals_group_and_sort() {
        let d = region_series(&[
            ("X", 2012, 5),
            ("X", 2010, 1),
            ("X", 2012, 7),
            ("Y", 2010, 100),
        ]);
        assert_eq!(
            TrendPredictor::yearly_totals(&d, "X"),
            vec![(2010, 1), (2012, 12)]
        );
    }

    #[test]
    fn negative_projections_are_clamped() {
        let d = region_series(&[("X", 2010, 300), ("X", 2011, 100)]);
        let predictions = TrendPredictor::predict_future(&d, "X", 3).unwrap();
        let values: Vec<u64> = predictions.iter().map(|p| p.predicted).collect();
        assert_eq!(values, vec![0, 0, 0]);
        assert_eq!(predictions[2].year, 2014);
    }

    #[test]
    fn one_year_is_insufficient() {
        let d = region_series(&[("X", 2013, 10), ("X", 2013, 20)]);
        assert_eq!(
            TrendPredictor::predict_future(&d, "X", 5),
            Err(TrendError::InsufficientHistory { years: 1 })
        );
        assert_eq!(
            TrendPredictor::predict_future(&d, "NOWHERE", 5),
            Err(TrendError::InsufficientHistory { years: 0 })
        );
    }

    #[test]
    fn fit_reports_slope_intercept_and_r_squared() {
        let trend = TrendPredictor::fit_linear(&[(0, 1), (1, 3), (2, 5)]).unwrap();
        assert!((trend.slope - 2.0).abs() < 1e-12);
        assert!((trend.intercept - 1.0).abs() < 1e-12);
        assert!((trend.r_squared - 1.0).abs() < 1e-12);
    }

    #[test]
    fn yearly_totals_saturate() {
        let d = region_series(&[("X", 2012, u64::MAX), ("X", 2012, u64::MAX)]);
        assert_eq!(TrendPredictor::yearly_totals(&d, "X"), vec![(2012, u64::MAX)]);
    }
}
