//! Crime Dashboard Main Application
//! Login gate, side navigation panel and the active analysis page.

use crate::auth::CredentialStore;
use crate::charts::StaticChartRenderer;
use crate::config::DashboardConfig;
use crate::data::{DataLoader, Dataset};
use crate::gui::{ControlPanel, ControlPanelAction, LoginForm, PageAction, PageViewer};
use crate::stats::TrendPredictor;
use egui::SidePanel;
use log::{info, warn};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::thread;

/// Pages reachable after login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Home,
    CrimeSearch,
    SafetyRatio,
    Compare,
    Trends,
    Predict,
}

impl Page {
    pub const ALL: [Page; 6] = [
        Page::Home,
        Page::CrimeSearch,
        Page::SafetyRatio,
        Page::Compare,
        Page::Trends,
        Page::Predict,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Page::Home => "🏠 Home",
            Page::CrimeSearch => "🔍 State Crime Search",
            Page::SafetyRatio => "🛡 Safety Ratio",
            Page::Compare => "⚖ Compare Two States",
            Page::Trends => "📈 Crime Trends",
            Page::Predict => "🔮 Future Prediction",
        }
    }
}

/// Who is logged in and where they are.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub username: Option<String>,
    pub page: Page,
}

impl Session {
    pub fn is_logged_in(&self) -> bool {
        self.username.is_some()
    }

    pub fn log_in(&mut self, username: String) {
        self.username = Some(username);
        self.page = Page::Home;
    }

    pub fn log_out(&mut self) {
        self.username = None;
        self.page = Page::Home;
    }
}

/// CSV loading result from background thread
enum LoadResult {
    Progress(String),
    Complete { dataset: Dataset, path: PathBuf },
    Error(String),
}

/// Main application window.
pub struct CrimeDashboardApp {
    config: DashboardConfig,
    credentials: CredentialStore,
    dataset: Arc<Dataset>,
    session: Session,
    login: LoginForm,
    control_panel: ControlPanel,
    pages: PageViewer,

    // Async CSV loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl CrimeDashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        let mut app = Self {
            credentials: CredentialStore::with_demo_accounts(),
            dataset: Arc::new(Dataset::empty()),
            session: Session::default(),
            login: LoginForm::new(),
            control_panel: ControlPanel::new(),
            pages: PageViewer::new(config.top_n, config.horizon),
            load_rx: None,
            is_loading: false,
            config,
        };

        let path = app.config.data_path.clone();
        app.start_loading(path);
        app
    }

    /// Load a CSV in a background thread.
    fn start_loading(&mut self, path: PathBuf) {
        if self.is_loading {
            return;
        }

        self.control_panel.set_status(&format!("Loading {}...", path.display()));
        self.is_loading = true;

        let (tx, rx) = channel();
        self.load_rx = Some(rx);
        let loader = DataLoader::new(self.config.load_options());

        thread::spawn(move || {
            let _ = tx.send(LoadResult::Progress("Reading CSV file...".to_string()));

            match loader.try_load(&path) {
                Ok(dataset) => {
                    let _ = tx.send(LoadResult::Complete { dataset, path });
                }
                Err(e) => {
                    let _ = tx.send(LoadResult::Error(e.to_string()));
                }
            }
        });
    }

    /// Check for CSV loading results
    fn check_load_results(&mut self) {
        let rx = self.load_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    LoadResult::Progress(status) => {
                        self.control_panel.set_status(&status);
                    }
                    LoadResult::Complete { dataset, path } => {
                        let status = format!(
                            "Loaded {} rows, {} crime columns",
                            dataset.len(),
                            dataset.categories().len()
                        );
                        info!("{status} from {}", path.display());
                        self.control_panel.set_source(path, dataset.len());
                        self.control_panel.set_status(&status);
                        self.dataset = Arc::new(dataset);
                        self.pages.reset(&self.dataset);
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                    LoadResult::Error(error) => {
                        // Keep whatever was loaded before; the empty dataset
                        // is the fallback on first load.
                        warn!("{error}");
                        self.control_panel.set_status(&format!("Error: {error}"));
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                }
            }

            if should_keep_receiver {
                self.load_rx = Some(rx);
            }
        }
    }

    /// Handle CSV file selection
    fn handle_browse_csv(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.start_loading(path);
        }
    }

    /// Export the trend and projection of a region to PNG and open it.
    fn handle_export_trend(&mut self, region: &str) {
        let history = TrendPredictor::yearly_totals(&self.dataset, region);
        let predictions =
            TrendPredictor::predict_future(&self.dataset, region, self.config.horizon)
                .unwrap_or_default();

        let file_name = format!("{}_trend.png", region.to_lowercase().replace(' ', "_"));
        let Some(output_path) = rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name(&file_name)
            .save_file()
        else {
            return; // User cancelled
        };

        match StaticChartRenderer::render_trend_png(
            &output_path,
            region,
            &history,
            &predictions,
            (1200, 800),
        ) {
            Ok(()) => {
                self.control_panel
                    .set_status(&format!("Exported {}", output_path.display()));
                if let Err(e) = open::that(&output_path) {
                    warn!("Could not open {}: {e}", output_path.display());
                }
            }
            Err(e) => {
                self.control_panel.set_status(&format!("Error: {e}"));
            }
        }
    }
}

impl eframe::App for CrimeDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        if self.is_loading {
            ctx.request_repaint();
        }

        if !self.session.is_logged_in() {
            egui::CentralPanel::default().show(ctx, |ui| {
                if let Some(username) = self.login.show(ui, &self.credentials) {
                    self.session.log_in(username);
                }
            });
            return;
        }

        // Left panel - navigation and data source
        SidePanel::left("control_panel")
            .min_width(260.0)
            .max_width(300.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui, &self.session, self.is_loading);

                    match action {
                        ControlPanelAction::Navigate(page) => self.session.page = page,
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::Logout => {
                            info!("User logged out");
                            self.session.log_out();
                            self.login = LoginForm::new();
                        }
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - active page
        egui::CentralPanel::default().show(ctx, |ui| {
            let dataset = Arc::clone(&self.dataset);
            match self.pages.show(ui, self.session.page, &dataset) {
                PageAction::Navigate(page) => self.session.page = page,
                PageAction::ExportTrend(region) => self.handle_export_trend(&region),
                PageAction::None => {}
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_routes_to_home_on_login_and_logout() {
        let mut session = Session::default();
        assert!(!session.is_logged_in());

        session.log_in("judge".to_string());
        assert!(session.is_logged_in());
        assert_eq!(session.page, Page::Home);

        session.page = Page::Predict;
        session.log_out();
        assert_eq!(session, Session::default());
    }
}
