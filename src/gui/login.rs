//! Login / Register screen

use crate::auth::CredentialStore;
use egui::{Color32, RichText};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum LoginTab {
    #[default]
    Login,
    Register,
}

/// Feedback shown under the form.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Feedback {
    Success(String),
    Failure(String),
}

#[derive(Default)]
pub struct LoginForm {
    tab: LoginTab,
    username: String,
    password: String,
    reg_username: String,
    reg_password: String,
    reg_confirm: String,
    feedback: Option<Feedback>,
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the screen. Returns the username after a successful login.
    pub fn show(&mut self, ui: &mut egui::Ui, store: &CredentialStore) -> Option<String> {
        let mut logged_in = None;

        ui.vertical_centered(|ui| {
            ui.add_space(40.0);
            ui.label(
                RichText::new("🕵 Crime Data Visualization Dashboard")
                    .size(28.0)
                    .color(Color32::from_rgb(31, 119, 180)),
            );
            ui.label("Please log in or register to access the analytical features.");
            ui.add_space(10.0);
            ui.separator();
            ui.add_space(10.0);

            ui.horizontal(|ui| {
                ui.add_space((ui.available_width() - 220.0).max(0.0) / 2.0);
                let login = ui.selectable_value(&mut self.tab, LoginTab::Login, "🔒 Login");
                let register =
                    ui.selectable_value(&mut self.tab, LoginTab::Register, "📝 Register");
                if login.clicked() || register.clicked() {
                    self.feedback = None;
                }
            });
            ui.add_space(10.0);

            egui::Frame::none()
                .fill(ui.visuals().widgets.noninteractive.bg_fill)
                .rounding(8.0)
                .inner_margin(16.0)
                .show(ui, |ui| {
                    ui.set_max_width(360.0);
                    match self.tab {
                        LoginTab::Login => logged_in = self.show_login(ui, store),
                        LoginTab::Register => self.show_register(ui, store),
                    }
                });

            ui.add_space(10.0);
            match &self.feedback {
                Some(Feedback::Success(msg)) => {
                    ui.label(RichText::new(msg).color(Color32::from_rgb(40, 167, 69)));
                }
                Some(Feedback::Failure(msg)) => {
                    ui.label(RichText::new(msg).color(Color32::from_rgb(220, 53, 69)));
                }
                None => {}
            }
        });

        logged_in
    }

    fn show_login(&mut self, ui: &mut egui::Ui, store: &CredentialStore) -> Option<String> {
        ui.label(RichText::new("Existing User Login").size(16.0).strong());
        ui.add_space(8.0);

        egui::Grid::new("login_form").num_columns(2).spacing([10.0, 8.0]).show(ui, |ui| {
            ui.label("Username");
            ui.text_edit_singleline(&mut self.username);
            ui.end_row();
            ui.label("Password");
            ui.add(egui::TextEdit::singleline(&mut self.password).password(true));
            ui.end_row();
        });

        ui.add_space(8.0);
        let submitted = ui.button("Log In").clicked()
            || ui.input(|i| i.key_pressed(egui::Key::Enter));
        if !submitted {
            return None;
        }

        match self.submit_login(store) {
            Ok(username) => Some(username),
            Err(msg) => {
                self.feedback = Some(Feedback::Failure(msg));
                None
            }
        }
    }

    fn show_register(&mut self, ui: &mut egui::Ui, store: &CredentialStore) {
        ui.label(RichText::new("New User Registration").size(16.0).strong());
        ui.add_space(8.0);

        egui::Grid::new("register_form").num_columns(2).spacing([10.0, 8.0]).show(ui, |ui| {
            ui.label("New Username");
            ui.text_edit_singleline(&mut self.reg_username);
            ui.end_row();
            ui.label("New Password");
            ui.add(egui::TextEdit::singleline(&mut self.reg_password).password(true));
            ui.end_row();
            ui.label("Confirm Password");
            ui.add(egui::TextEdit::singleline(&mut self.reg_confirm).password(true));
            ui.end_row();
        });

        ui.add_space(8.0);
        if ui.button("Register").clicked() {
            self.feedback = Some(self.submit_register(store));
        }
    }

    fn submit_login(&mut self, store: &CredentialStore) -> Result<String, String> {
        match store.login(&self.username, &self.password) {
            Ok(()) => {
                self.password.clear();
                Ok(self.username.clone())
            }
            Err(e) => Err(format!("Login failed: {e}")),
        }
    }

    fn submit_register(&mut self, store: &CredentialStore) -> Feedback {
        if self.reg_password != self.reg_confirm {
            return Feedback::Failure("Registration failed: Passwords do not match.".to_string());
        }

        match store.register(&self.reg_username, &self.reg_password) {
            Ok(()) => {
                let msg = format!(
                    "User '{}' registered successfully! You can now log in.",
                    self.reg_username
                );
                self.reg_password.clear();
                self.reg_confirm.clear();
                Feedback::Success(msg)
            }
            Err(e) => Feedback::Failure(format!("Registration failed. {e}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_reports_unknown_user_and_wrong_password() {
        let store = CredentialStore::with_demo_accounts();
        let mut form = LoginForm::new();

        form.username = "ghost".to_string();
        form.password = "x".to_string();
        assert_eq!(
            form.submit_login(&store),
            Err("Login failed: This username is not registered.".to_string())
        );

        form.username = "judge".to_string();
        assert_eq!(
            form.submit_login(&store),
            Err("Login failed: Incorrect password.".to_string())
        );

        form.password = "hackathon2024".to_string();
        assert_eq!(form.submit_login(&store), Ok("judge".to_string()));
        assert!(form.password.is_empty());
    }

    #[test]
    fn register_checks_confirmation_then_store() {
        let store = CredentialStore::with_demo_accounts();
        let mut form = LoginForm::new();

        form.reg_username = "alice".to_string();
        form.reg_password = "a".to_string();
        form.reg_confirm = "b".to_string();
        assert!(matches!(form.submit_register(&store), Feedback::Failure(_)));
        assert!(!store.is_registered("alice"));

        form.reg_confirm = "a".to_string();
        assert!(matches!(form.submit_register(&store), Feedback::Success(_)));
        assert!(store.authenticate("alice", "a"));
    }
}
