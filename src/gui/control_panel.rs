//! Control Panel Widget
//! Left side panel with navigation, data source and status.

use crate::gui::{Page, Session};
use egui::{Color32, RichText};
use std::path::PathBuf;

/// Left side panel shown after login.
pub struct ControlPanel {
    pub csv_path: Option<PathBuf>,
    pub row_count: usize,
    pub status: String,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            csv_path: None,
            row_count: 0,
            status: "Ready".to_string(),
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the file backing the current dataset
    pub fn set_source(&mut self, path: PathBuf, row_count: usize) {
        self.csv_path = Some(path);
        self.row_count = row_count;
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }

    /// Draw the control panel
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        session: &Session,
        is_loading: bool,
    ) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🕵 Crime Dashboard")
                    .size(22.0)
                    .color(Color32::from_rgb(31, 119, 180)),
            );
            if let Some(username) = &session.username {
                ui.label(
                    RichText::new(format!("Welcome, {username}!"))
                        .size(12.0)
                        .strong(),
                );
            }
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Navigation =====
        ui.label(RichText::new("🧭 Explore").size(14.0).strong());
        ui.add_space(5.0);

        for page in Page::ALL {
            let selected = session.page == page;
            let button = egui::Button::new(RichText::new(page.title()).size(14.0))
                .selected(selected)
                .min_size(egui::vec2(ui.available_width(), 28.0));
            if ui.add(button).clicked() && !selected {
                action = ControlPanelAction::Navigate(page);
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                let path_text = self
                    .csv_path
                    .as_ref()
                    .and_then(|p| p.file_name())
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| "No data loaded".to_string());

                ui.label(RichText::new(&path_text).size(12.0).color(
                    if self.csv_path.is_some() {
                        ui.visuals().text_color()
                    } else {
                        Color32::GRAY
                    },
                ));
                if self.csv_path.is_some() {
                    ui.label(
                        RichText::new(format!("{} rows", self.row_count))
                            .size(11.0)
                            .color(Color32::GRAY),
                    );
                }

                ui.add_enabled_ui(!is_loading, |ui| {
                    if ui.button("📂 Open CSV").clicked() {
                        action = ControlPanelAction::BrowseCsv;
                    }
                });
            });

        ui.add_space(5.0);
        if is_loading {
            ui.add(egui::Spinner::new());
        }

        let status_color = if self.status.starts_with("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.starts_with("Loaded") || self.status.starts_with("Exported") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        ui.vertical_centered(|ui| {
            if ui
                .add(
                    egui::Button::new(RichText::new("🔓 Logout").size(14.0))
                        .min_size(egui::vec2(150.0, 30.0)),
                )
                .clicked()
            {
                action = ControlPanelAction::Logout;
            }
        });

        action
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    Navigate(Page),
    BrowseCsv,
    Logout,
}
