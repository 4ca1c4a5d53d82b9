//! GUI module - User interface components

mod app;
mod control_panel;
mod login;
mod pages;

pub use app::{CrimeDashboardApp, Page, Session};
pub use control_panel::{ControlPanel, ControlPanelAction};
pub use login::LoginForm;
pub use pages::{title_case, PageAction, PageViewer};
