//! Chart Plotter Module
//! Interactive bar, trend and share charts drawn with egui_plot / egui painter.

use crate::stats::Prediction;
use egui::{Color32, RichText, Sense, Shape, Stroke};
use egui_plot::{Bar, BarChart, Legend, Line, LineStyle, Plot, PlotPoints, Points};
use std::f32::consts::TAU;

/// Color of the primary series (actual values, selected region)
pub const PRIMARY_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue
/// Color of projected values
pub const PREDICTION_COLOR: Color32 = Color32::from_rgb(231, 76, 60); // Red

pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(52, 152, 219), // Blue
    Color32::from_rgb(243, 156, 18), // Orange
    Color32::from_rgb(46, 204, 113), // Green
    Color32::from_rgb(231, 76, 60),  // Red
    Color32::from_rgb(155, 89, 182), // Purple
    Color32::from_rgb(121, 85, 72),  // Brown
    Color32::from_rgb(233, 30, 99),  // Pink
    Color32::from_rgb(96, 125, 139), // Blue Grey
    Color32::from_rgb(26, 188, 156), // Teal
    Color32::from_rgb(0, 188, 212),  // Cyan
];

const PIE_STEP: f32 = TAU / 64.0;

/// Draws the dashboard charts.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn slice_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Vertical bar chart, one bar per entry, labelled on the x-axis.
    pub fn draw_bar_chart(ui: &mut egui::Ui, id: &str, entries: &[(String, u64)], y_label: &str) {
        let x_labels: Vec<String> = entries
            .iter()
            .map(|(name, _)| Self::short_label(name))
            .collect();

        let bars: Vec<Bar> = entries
            .iter()
            .enumerate()
            .map(|(i, (name, value))| {
                Bar::new(i as f64, *value as f64)
                    .name(name)
                    .width(0.6)
                    .fill(Self::slice_color(i))
            })
            .collect();

        Plot::new(format!("bar_{id}"))
            .height(300.0)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .y_axis_label(y_label)
            .include_y(0.0)
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if idx >= 0.0 && (idx - mark.value).abs() < 1e-6 {
                    x_labels.get(idx as usize).cloned().unwrap_or_default()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(PRIMARY_COLOR));
            });

        // Exact figures, since bars only show values on hover
        egui::Grid::new(ui.make_persistent_id(format!("bar_values_{id}")))
            .striped(true)
            .spacing([12.0, 4.0])
            .show(ui, |ui| {
                for (name, value) in entries {
                    ui.label(RichText::new(name).size(11.0));
                    ui.label(RichText::new(format_count(*value)).size(11.0).strong());
                    ui.end_row();
                }
            });
    }

    /// Historical totals as a solid line, optional projections dashed.
    pub fn draw_trend_chart(
        ui: &mut egui::Ui,
        id: &str,
        history: &[(i64, u64)],
        predictions: &[Prediction],
    ) {
        Plot::new(format!("trend_{id}"))
            .height(320.0)
            .legend(Legend::default())
            .x_axis_label("Year")
            .y_axis_label("Total IPC Crimes")
            .include_y(0.0)
            .allow_scroll(false)
            .x_axis_formatter(|mark, _range| {
                if (mark.value - mark.value.round()).abs() < 1e-6 {
                    format!("{:.0}", mark.value)
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                let actual: Vec<[f64; 2]> = history
                    .iter()
                    .map(|(year, total)| [*year as f64, *total as f64])
                    .collect();

                plot_ui.line(
                    Line::new(PlotPoints::from_iter(actual.iter().copied()))
                        .color(PRIMARY_COLOR)
                        .width(2.0)
                        .name("Actual"),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from_iter(actual.iter().copied()))
                        .radius(4.0)
                        .color(PRIMARY_COLOR),
                );

                if predictions.is_empty() {
                    return;
                }

                // Join the projection to the last observed point
                let predicted: Vec<[f64; 2]> = actual
                    .last()
                    .copied()
                    .into_iter()
                    .chain(
                        predictions
                            .iter()
                            .map(|p| [p.year as f64, p.predicted as f64]),
                    )
                    .collect();

                plot_ui.line(
                    Line::new(PlotPoints::from_iter(predicted.iter().copied()))
                        .color(PREDICTION_COLOR)
                        .style(LineStyle::dashed_loose())
                        .width(2.0)
                        .name("Predicted"),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from_iter(predicted.iter().skip(1).copied()))
                        .shape(egui_plot::MarkerShape::Cross)
                        .radius(5.0)
                        .color(PREDICTION_COLOR),
                );
            });
    }

    /// Pie of category shares with a percentage legend.
    pub fn draw_share_pie(ui: &mut egui::Ui, entries: &[(String, u64)], diameter: f32) {
        let total: u64 = entries.iter().map(|(_, v)| v).sum();
        if total == 0 {
            ui.label(RichText::new("No data to display").color(Color32::GRAY));
            return;
        }

        ui.horizontal(|ui| {
            let (rect, _) = ui.allocate_exact_size(egui::vec2(diameter, diameter), Sense::hover());
            let center = rect.center();
            let radius = diameter / 2.0 - 2.0;
            let painter = ui.painter();

            // Start at 12 o'clock, counter-clockwise like matplotlib's startangle=90
            let mut start = TAU / 4.0;
            for (i, (_, value)) in entries.iter().enumerate() {
                let sweep = *value as f32 / total as f32 * TAU;
                let color = Self::slice_color(i);

                // Convex pieces only: split each slice into small fans
                let mut a = start;
                let end = start + sweep;
                while a < end {
                    let b = (a + PIE_STEP).min(end);
                    let points = vec![
                        center,
                        center + radius * egui::vec2(a.cos(), -a.sin()),
                        center + radius * egui::vec2(((a + b) / 2.0).cos(), -((a + b) / 2.0).sin()),
                        center + radius * egui::vec2(b.cos(), -b.sin()),
                    ];
                    painter.add(Shape::convex_polygon(points, color, Stroke::NONE));
                    a = b;
                }
                start = end;
            }
            painter.circle_stroke(center, radius, Stroke::new(1.0, Color32::WHITE));

            ui.add_space(12.0);
            ui.vertical(|ui| {
                for (i, (name, value)) in entries.iter().enumerate() {
                    ui.horizontal(|ui| {
                        let (swatch, _) =
                            ui.allocate_exact_size(egui::vec2(12.0, 12.0), Sense::hover());
                        ui.painter().rect_filled(swatch, 2.0, Self::slice_color(i));
                        let share = *value as f64 / total as f64 * 100.0;
                        ui.label(RichText::new(format!("{name}: {share:.1}%")).size(12.0));
                    });
                }
            });
        });
    }

    /// Shorten long category names for axis labels.
    fn short_label(name: &str) -> String {
        const MAX: usize = 14;
        if name.chars().count() <= MAX {
            name.to_string()
        } else {
            let short: String = name.chars().take(MAX - 1).collect();
            format!("{short}…")
        }
    }
}

/// Thousands-separated integer, e.g. `1,234,567`.
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_count_groups_thousands() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }

    #[test]
    fn short_label_truncates() {
        assert_eq!(ChartPlotter::short_label("THEFT"), "THEFT");
        assert_eq!(
            ChartPlotter::short_label("KIDNAPPING & ABDUCTION"),
            "KIDNAPPING & …"
        );
    }
}
