//! Page Viewer
//! Central panel content for each dashboard page.

use crate::charts::{format_count, ChartPlotter};
use crate::data::Dataset;
use crate::gui::Page;
use crate::stats::{CrimeAnalytics, TrendPredictor, MAJOR_CRIME_CATEGORIES};
use egui::{Color32, ComboBox, RichText, ScrollArea};

const ERROR_COLOR: Color32 = Color32::from_rgb(220, 53, 69);
const PIE_SIZE: f32 = 220.0;

/// Actions triggered from a page
#[derive(Debug, Clone, PartialEq)]
pub enum PageAction {
    None,
    Navigate(Page),
    ExportTrend(String),
}

/// Selections and cached lookups for all pages.
#[derive(Default)]
pub struct PageViewer {
    top_n: usize,
    horizon: usize,
    regions: Vec<String>,
    years: Vec<i64>,
    search_year: Option<i64>,
    search_region: Option<String>,
    search_district: Option<String>,
    safety_region: Option<String>,
    compare_first: Option<String>,
    compare_second: Option<String>,
    trend_region: Option<String>,
    predict_region: Option<String>,
    ranking: Option<Vec<(String, f64)>>,
}

impl PageViewer {
    pub fn new(top_n: usize, horizon: usize) -> Self {
        Self {
            top_n,
            horizon,
            ..Self::default()
        }
    }

    /// Forget selections and refresh lookups after a new dataset is loaded.
    pub fn reset(&mut self, dataset: &Dataset) {
        *self = Self {
            regions: CrimeAnalytics::distinct_regions(dataset),
            years: CrimeAnalytics::distinct_years(dataset),
            ..Self::new(self.top_n, self.horizon)
        };
    }

    /// Draw the active page
    pub fn show(&mut self, ui: &mut egui::Ui, page: Page, dataset: &Dataset) -> PageAction {
        let mut action = PageAction::None;

        ui.horizontal(|ui| {
            ui.label(RichText::new(page.title()).size(24.0).strong());
            if page != Page::Home {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("⬅ Back to Home").clicked() {
                        action = PageAction::Navigate(Page::Home);
                    }
                });
            }
        });
        ui.separator();

        if dataset.is_empty() {
            ui.label(
                RichText::new("Data is empty. Ensure crime.csv is present and formatted correctly.")
                    .color(ERROR_COLOR),
            );
            return action;
        }
        if !dataset.keys().region {
            ui.label(
                RichText::new("Dataset missing 'STATE/UT' column. Please verify CSV header.")
                    .color(ERROR_COLOR),
            );
            return action;
        }

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                let page_action = match page {
                    Page::Home => self.show_home(ui, dataset),
                    Page::CrimeSearch => self.show_search(ui, dataset),
                    Page::SafetyRatio => self.show_safety(ui, dataset),
                    Page::Compare => self.show_compare(ui, dataset),
                    Page::Trends => self.show_trends(ui, dataset),
                    Page::Predict => self.show_predict(ui, dataset),
                };
                if page_action != PageAction::None {
                    action = page_action;
                }
            });

        action
    }

    fn show_home(&mut self, ui: &mut egui::Ui, dataset: &Dataset) -> PageAction {
        let mut action = PageAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(10.0);
            ui.label(
                RichText::new("Explore crime statistics, safety insights, and predictive trends across Indian states")
                    .size(14.0),
            );
            ui.add_space(15.0);
            ui.label(
                RichText::new("Choose an Option to Explore")
                    .size(18.0)
                    .color(Color32::from_rgb(52, 73, 94)),
            );
            ui.add_space(10.0);

            for row in [&Page::ALL[1..4], &Page::ALL[4..]] {
                ui.horizontal(|ui| {
                    let width = row.len() as f32 * 210.0;
                    ui.add_space((ui.available_width() - width).max(0.0) / 2.0);
                    for page in row {
                        let button = egui::Button::new(RichText::new(page.title()).size(15.0))
                            .min_size(egui::vec2(200.0, 40.0));
                        if ui.add(button).clicked() {
                            action = PageAction::Navigate(*page);
                        }
                    }
                });
                ui.add_space(8.0);
            }

            ui.add_space(10.0);
            ui.separator();
            let year_span = match (self.years.first(), self.years.last()) {
                (Some(first), Some(last)) if first != last => format!("{first}–{last}"),
                (Some(year), _) => year.to_string(),
                _ => "unknown".to_string(),
            };
            ui.label(
                RichText::new(format!(
                    "{} rows · {} states/UTs · years {}",
                    dataset.len(),
                    self.regions.len(),
                    year_span
                ))
                .size(12.0)
                .color(Color32::GRAY),
            );
            ui.label(
                RichText::new("Tip: pick a page from the buttons above or the side panel.")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });

        action
    }

    fn show_search(&mut self, ui: &mut egui::Ui, dataset: &Dataset) -> PageAction {
        let mut changed = false;

        ui.horizontal(|ui| {
            ui.label("Select Year:");
            let before = self.search_year;
            ComboBox::from_id_salt("search_year")
                .selected_text(
                    self.search_year
                        .map(|y| y.to_string())
                        .unwrap_or_else(|| "All years".to_string()),
                )
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut self.search_year, None, "All years");
                    for year in &self.years {
                        ui.selectable_value(&mut self.search_year, Some(*year), year.to_string());
                    }
                });
            changed |= before != self.search_year;
        });

        changed |= region_combo(
            ui,
            "search_region",
            "Select State/UT:",
            &self.regions,
            &mut self.search_region,
        );
        if changed {
            self.search_district = None;
        }

        let Some(region) = self.search_region.clone() else {
            info_label(ui, "Select a state to load districts.");
            return PageAction::None;
        };

        let districts = CrimeAnalytics::distinct_districts(dataset, &region, self.search_year);
        if districts.is_empty() {
            ui.label(
                RichText::new(format!(
                    "⚠ No valid districts found for {}.",
                    title_case(&region)
                ))
                .color(Color32::from_rgb(243, 156, 18)),
            );
            return PageAction::None;
        }
        region_combo(
            ui,
            "search_district",
            "Select District:",
            &districts,
            &mut self.search_district,
        );

        ui.separator();

        let Some(district) = self.search_district.clone() else {
            info_label(
                ui,
                "Please select a state and district (and optionally a year) to view data.",
            );
            return PageAction::None;
        };

        let district_data =
            CrimeAnalytics::filter_rows(dataset, &region, Some(&district), self.search_year);

        ui.label(
            RichText::new(format!(
                "📋 Summary for {}, {}",
                title_case(&district),
                title_case(&region)
            ))
            .size(18.0)
            .strong(),
        );
        draw_records_table(ui, &district_data);

        ui.add_space(10.0);
        ui.separator();

        let sums = CrimeAnalytics::category_sums(&district_data, &MAJOR_CRIME_CATEGORIES);
        if sums.is_empty() {
            info_label(ui, "No crime columns available to plot for this selection.");
        } else {
            ui.label(RichText::new("📊 Major Crime Comparison").size(18.0).strong());
            ChartPlotter::draw_bar_chart(ui, "district_major", &sums, "Number of Cases");
        }

        PageAction::None
    }

    fn show_safety(&mut self, ui: &mut egui::Ui, dataset: &Dataset) -> PageAction {
        region_combo(
            ui,
            "safety_region",
            "Select State/UT:",
            &self.regions,
            &mut self.safety_region,
        );
        ui.separator();

        if let Some(region) = self.safety_region.clone() {
            let display = title_case(&region);
            let ratio = CrimeAnalytics::safety_ratio(dataset, &region);

            ui.label(format!("Safety Ratio for {display}"));
            ui.label(RichText::new(format!("{ratio:.2}%")).size(32.0).strong());
            ui.label(
                RichText::new("Safety Ratio (higher = safer)")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
            ui.add_space(10.0);

            let total = CrimeAnalytics::grand_total(dataset);
            if total == 0 {
                info_label(ui, "No crime totals available to display.");
            } else {
                let region_total = CrimeAnalytics::region_total(dataset, &region);
                ui.label(RichText::new(format!("Crime Share: {display}")).size(16.0).strong());
                ChartPlotter::draw_share_pie(
                    ui,
                    &[
                        (format!("{display}'s Crime"), region_total),
                        ("Other States' Crime".to_string(), total.saturating_sub(region_total)),
                    ],
                    PIE_SIZE,
                );
            }
        } else {
            info_label(ui, "Please select a state to calculate its safety ratio.");
        }

        ui.add_space(15.0);
        egui::CollapsingHeader::new("🏆 Safety ranking of all states/UTs").show(ui, |ui| {
            let ranking = self
                .ranking
                .get_or_insert_with(|| CrimeAnalytics::safety_ranking(dataset));

            egui::Grid::new("safety_ranking")
                .striped(true)
                .spacing([16.0, 4.0])
                .show(ui, |ui| {
                    ui.label(RichText::new("#").strong());
                    ui.label(RichText::new("State/UT").strong());
                    ui.label(RichText::new("Safety Ratio").strong());
                    ui.end_row();
                    for (i, (region, ratio)) in ranking.iter().enumerate() {
                        ui.label((i + 1).to_string());
                        ui.label(title_case(region));
                        ui.label(format!("{ratio:.2}%"));
                        ui.end_row();
                    }
                });
        });

        PageAction::None
    }

    fn show_compare(&mut self, ui: &mut egui::Ui, dataset: &Dataset) -> PageAction {
        ui.horizontal(|ui| {
            region_combo(
                ui,
                "compare_first",
                "First State:",
                &self.regions,
                &mut self.compare_first,
            );
            ui.add_space(20.0);
            region_combo(
                ui,
                "compare_second",
                "Second State:",
                &self.regions,
                &mut self.compare_second,
            );
        });
        ui.separator();

        let (Some(first), Some(second)) = (self.compare_first.clone(), self.compare_second.clone())
        else {
            info_label(ui, "Select two different states to compare.");
            return PageAction::None;
        };
        if first == second {
            info_label(ui, "Select two different states to compare.");
            return PageAction::None;
        }

        let cmp = CrimeAnalytics::compare_regions(dataset, &first, &second);
        let (first_display, second_display) = (title_case(&first), title_case(&second));

        egui::Grid::new("compare_table")
            .striped(true)
            .spacing([24.0, 6.0])
            .show(ui, |ui| {
                ui.label(RichText::new("Metric").strong());
                ui.label(RichText::new(&first_display).strong());
                ui.label(RichText::new(&second_display).strong());
                ui.label(RichText::new("Comparison").strong());
                ui.end_row();

                ui.label("Total IPC Crimes");
                ui.label(format_count(cmp.first_total));
                ui.label(format_count(cmp.second_total));
                ui.label(
                    cmp.total_diff_percent
                        .map(|d| format!("{d:+.1}%"))
                        .unwrap_or_else(|| "N/A".to_string()),
                );
                ui.end_row();

                ui.label("Safety Ratio");
                ui.label(format!("{:.2}%", cmp.first_ratio));
                ui.label(format!("{:.2}%", cmp.second_ratio));
                ui.label(format!("{:+.2}%", cmp.ratio_diff));
                ui.end_row();

                ui.label("Overall Safer State");
                ui.label("");
                ui.label("");
                ui.label(RichText::new(title_case(cmp.safer())).strong());
                ui.end_row();
            });

        ui.add_space(15.0);
        ui.columns(2, |columns| {
            for (col, region) in columns.iter_mut().zip([&first, &second]) {
                let display = title_case(region);
                col.label(RichText::new(format!("Composition in {display}")).size(16.0).strong());
                let composition =
                    CrimeAnalytics::top_crime_composition(dataset, region, self.top_n);
                if composition.is_no_data() {
                    info_label(col, &format!("No crime composition data for {display}"));
                } else {
                    ChartPlotter::draw_share_pie(col, &composition.entries(), PIE_SIZE);
                }
            }
        });

        PageAction::None
    }

    fn show_trends(&mut self, ui: &mut egui::Ui, dataset: &Dataset) -> PageAction {
        region_combo(ui, "trend_region", "Select State/UT:", &self.regions, &mut self.trend_region);
        ui.separator();

        let Some(region) = self.trend_region.clone() else {
            info_label(ui, "Please select a state to view trends.");
            return PageAction::None;
        };

        let history = TrendPredictor::yearly_totals(dataset, &region);
        if history.is_empty() {
            info_label(ui, "No trend data available for this state.");
        } else {
            ChartPlotter::draw_trend_chart(ui, &region, &history, &[]);
        }

        PageAction::None
    }

    fn show_predict(&mut self, ui: &mut egui::Ui, dataset: &Dataset) -> PageAction {
        region_combo(
            ui,
            "predict_region",
            "Select State/UT:",
            &self.regions,
            &mut self.predict_region,
        );
        ui.separator();

        let Some(region) = self.predict_region.clone() else {
            info_label(ui, "Please select a state to generate predictions.");
            return PageAction::None;
        };

        let history = TrendPredictor::yearly_totals(dataset, &region);
        let trend = match TrendPredictor::fit_linear(&history) {
            Ok(trend) => trend,
            Err(e) => {
                ui.label(RichText::new(e.to_string()).color(ERROR_COLOR));
                return PageAction::None;
            }
        };
        let last = history.last().map(|(year, _)| *year).unwrap_or_default();
        let predictions = TrendPredictor::extrapolate(&trend, last, self.horizon);

        let mut action = PageAction::None;
        ui.horizontal(|ui| {
            egui::Grid::new("prediction_table")
                .striped(true)
                .spacing([24.0, 4.0])
                .show(ui, |ui| {
                    ui.label(RichText::new("YEAR").strong());
                    ui.label(RichText::new("PREDICTED CRIMES").strong());
                    ui.end_row();
                    for p in &predictions {
                        ui.label(p.year.to_string());
                        ui.label(format_count(p.predicted));
                        ui.end_row();
                    }
                });

            ui.add_space(30.0);
            ui.vertical(|ui| {
                ui.label(format!("Trend: {:+.1} cases / year", trend.slope));
                ui.label(format!("R² = {:.3}", trend.r_squared));
                ui.add_space(8.0);
                if ui.button("🖼 Export PNG").clicked() {
                    action = PageAction::ExportTrend(region.clone());
                }
            });
        });

        ui.add_space(10.0);
        ChartPlotter::draw_trend_chart(ui, &format!("predict_{region}"), &history, &predictions);

        action
    }
}

/// Region/district picker. Returns true when the selection changed.
fn region_combo(
    ui: &mut egui::Ui,
    id: &str,
    label: &str,
    options: &[String],
    selected: &mut Option<String>,
) -> bool {
    let before = selected.clone();

    ui.horizontal(|ui| {
        ui.label(label);
        ComboBox::from_id_salt(id)
            .width(220.0)
            .selected_text(
                selected
                    .as_deref()
                    .map(title_case)
                    .unwrap_or_else(|| "Select...".to_string()),
            )
            .show_ui(ui, |ui| {
                for option in options {
                    ui.selectable_value(selected, Some(option.clone()), title_case(option));
                }
            });
    });

    before != *selected
}

fn info_label(ui: &mut egui::Ui, text: &str) {
    ui.label(RichText::new(format!("👉 {text}")).color(Color32::GRAY));
}

/// Rows of a (small) filtered dataset: year plus every crime column.
fn draw_records_table(ui: &mut egui::Ui, dataset: &Dataset) {
    ScrollArea::horizontal()
        .id_salt("records_table_scroll")
        .max_height(250.0)
        .show(ui, |ui| {
            egui::Grid::new("records_table")
                .striped(true)
                .spacing([12.0, 4.0])
                .show(ui, |ui| {
                    ui.label(RichText::new("YEAR").strong().size(11.0));
                    for category in dataset.categories() {
                        ui.label(RichText::new(category).strong().size(11.0));
                    }
                    ui.end_row();

                    for record in dataset.records() {
                        ui.label(
                            record
                                .year()
                                .map(|y| y.to_string())
                                .unwrap_or_else(|| "-".to_string()),
                        );
                        for count in record.counts() {
                            ui.label(RichText::new(count.to_string()).size(11.0));
                        }
                        ui.end_row();
                    }
                });
        });
}

/// Capitalize the first letter of each word, like Python's `str.title`.
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut prev_is_letter = false;
    for c in value.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{KeyColumns, Record};

    #[test]
    fn title_case_matches_display_names() {
        assert_eq!(title_case("ANDHRA PRADESH"), "Andhra Pradesh");
        assert_eq!(title_case("A & N ISLANDS"), "A & N Islands");
        assert_eq!(title_case("D&N HAVELI"), "D&N Haveli");
    }

    #[test]
    fn reset_refreshes_lookups_and_clears_selection() {
        let dataset = Dataset::new(
            KeyColumns::all(),
            vec!["TOTAL IPC CRIMES".into()],
            vec![
                Record::new(Some("Goa"), Some("North Goa"), Some(2013), vec![5]),
                Record::new(Some("Assam"), Some("Cachar"), Some(2012), vec![7]),
            ],
        );
        let mut viewer = PageViewer::new(5, 5);
        viewer.safety_region = Some("GOA".to_string());
        viewer.reset(&dataset);

        assert_eq!(viewer.regions, vec!["ASSAM", "GOA"]);
        assert_eq!(viewer.years, vec![2012, 2013]);
        assert_eq!(viewer.safety_region, None);
        assert_eq!(viewer.horizon, 5);
    }
}
