//! Static Chart Renderer
//! Writes the trend/prediction chart to a PNG file with plotters.
//!
//! Layout:
//! 1. Caption: "Crime Trend: {region}"
//! 2. Actual totals: blue line with circle markers
//! 3. Predicted totals: red line with cross markers, joined to the last actual point
//! 4. Legend in the upper left corner

use crate::stats::Prediction;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("No trend data to render")]
    NoData,
    #[error("Chart rendering failed: {0}")]
    Render(String),
}

fn render_err<E: std::fmt::Display>(e: E) -> ExportError {
    ExportError::Render(e.to_string())
}

const ACTUAL: RGBColor = RGBColor(52, 152, 219);
const PREDICTED: RGBColor = RGBColor(231, 76, 60);

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render the history and projection of one region to `path` (PNG).
    pub fn render_trend_png(
        path: &Path,
        region: &str,
        history: &[(i64, u64)],
        predictions: &[Prediction],
        size: (u32, u32),
    ) -> Result<(), ExportError> {
        let (x_range, y_max) = Self::axis_bounds(history, predictions).ok_or(ExportError::NoData)?;

        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(format!("Crime Trend: {region}"), ("sans-serif", 28))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(80)
            .build_cartesian_2d(x_range, 0u64..y_max)
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .x_desc("Year")
            .y_desc("Total IPC Crimes")
            .x_label_formatter(&|year| year.to_string())
            .draw()
            .map_err(render_err)?;

        chart
            .draw_series(LineSeries::new(
                history.iter().map(|(year, total)| (*year, *total)),
                ACTUAL.stroke_width(2),
            ))
            .map_err(render_err)?
            .label("Actual")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], ACTUAL.stroke_width(2)));

        chart
            .draw_series(
                history
                    .iter()
                    .map(|(year, total)| Circle::new((*year, *total), 4, ACTUAL.filled())),
            )
            .map_err(render_err)?;

        if !predictions.is_empty() {
            let joined: Vec<(i64, u64)> = history
                .last()
                .copied()
                .into_iter()
                .chain(predictions.iter().map(|p| (p.year, p.predicted)))
                .collect();

            chart
                .draw_series(LineSeries::new(joined, PREDICTED.stroke_width(2)))
                .map_err(render_err)?
                .label("Predicted")
                .legend(|(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], PREDICTED.stroke_width(2))
                });

            chart
                .draw_series(
                    predictions
                        .iter()
                        .map(|p| Cross::new((p.year, p.predicted), 5, PREDICTED.stroke_width(2))),
                )
                .map_err(render_err)?;
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(render_err)?;

        root.present().map_err(render_err)?;
        log::info!("Exported trend chart for {region} to {}", path.display());
        Ok(())
    }

    /// Year range padded by one on each side, and a y maximum with 10% headroom.
    fn axis_bounds(
        history: &[(i64, u64)],
        predictions: &[Prediction],
    ) -> Option<(std::ops::Range<i64>, u64)> {
        let years = history
            .iter()
            .map(|(y, _)| *y)
            .chain(predictions.iter().map(|p| p.year));
        let values = history
            .iter()
            .map(|(_, v)| *v)
            .chain(predictions.iter().map(|p| p.predicted));

        let x_min = years.clone().min()?;
        let x_max = years.max()?;
        let y_max = values.max()?;

        Some(((x_min - 1)..(x_max + 1), (y_max + y_max / 10).max(1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_bounds_cover_history_and_predictions() {
        let history = [(2010, 100), (2012, 300)];
        let predictions = [Prediction {
            year: 2013,
            predicted: 400,
        }];
        let (x, y) = StaticChartRenderer::axis_bounds(&history, &predictions).unwrap();
        assert_eq!(x, 2009..2014);
        assert_eq!(y, 440);
    }

    #[test]
    fn empty_history_is_no_data() {
        assert!(StaticChartRenderer::axis_bounds(&[], &[]).is_none());
        let err = StaticChartRenderer::render_trend_png(
            Path::new("unused.png"),
            "X",
            &[],
            &[],
            (800, 600),
        )
        .unwrap_err();
        assert!(matches!(err, ExportError::NoData));
    }
}
