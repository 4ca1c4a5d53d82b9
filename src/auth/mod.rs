//! Auth module - in-memory credential store for the login screen
//!
//! Demo-only: accounts live for the lifetime of the process. Passwords are
//! kept as SHA-256 digests, unsalted. Replace with a durable, properly hashed
//! backend before exposing the dashboard to real users.

use log::{debug, info};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;

/// Accounts available at startup.
pub const DEMO_ACCOUNTS: [(&str, &str); 2] = [("judge", "hackathon2024"), ("user1", "pass123")];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("Username and password cannot be empty.")]
    EmptyField,
    #[error("Username '{0}' already exists. Please choose another.")]
    DuplicateUsername(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoginError {
    #[error("This username is not registered.")]
    UnknownUser,
    #[error("Incorrect password.")]
    WrongPassword,
}

/// Username to password-digest mapping guarded by a single-writer lock.
#[derive(Debug, Default)]
pub struct CredentialStore {
    users: RwLock<HashMap<String, String>>,
}

impl CredentialStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store seeded with [`DEMO_ACCOUNTS`].
    pub fn with_demo_accounts() -> Self {
        let users = DEMO_ACCOUNTS
            .iter()
            .map(|(user, password)| (user.to_string(), digest(password)))
            .collect();
        Self {
            users: RwLock::new(users),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, String>> {
        self.users.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, String>> {
        self.users.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Exact match of username and password.
    pub fn authenticate(&self, username: &str, password: &str) -> bool {
        self.read()
            .get(username)
            .is_some_and(|stored| *stored == digest(password))
    }

    /// Like [`CredentialStore::authenticate`], but says why it failed.
    pub fn login(&self, username: &str, password: &str) -> Result<(), LoginError> {
        let users = self.read();
        match users.get(username) {
            None => Err(LoginError::UnknownUser),
            Some(stored) if *stored != digest(password) => Err(LoginError::WrongPassword),
            Some(_) => {
                info!("User '{username}' logged in");
                Ok(())
            }
        }
    }

    pub fn is_registered(&self, username: &str) -> bool {
        self.read().contains_key(username)
    }

    /// Add an account. The check and the insert happen under one write lock.
    pub fn register(&self, username: &str, password: &str) -> Result<(), RegistrationError> {
        if username.trim().is_empty() || password.trim().is_empty() {
            return Err(RegistrationError::EmptyField);
        }

        let mut users = self.write();
        if users.contains_key(username) {
            debug!("Rejected duplicate registration for '{username}'");
            return Err(RegistrationError::DuplicateUsername(username.to_string()));
        }

        users.insert(username.to_string(), digest(password));
        info!("Registered user '{username}'");
        Ok(())
    }

    pub fn user_count(&self) -> usize {
        self.read().len()
    }
}

fn digest(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn demo_accounts_authenticate() {
        let store = CredentialStore::with_demo_accounts();
        assert!(store.authenticate("judge", "hackathon2024"));
        assert!(store.authenticate("user1", "pass123"));
        assert!(!store.authenticate("judge", "wrong"));
        assert!(!store.authenticate("nobody", "hackathon2024"));
    }

    #[test]
    fn register_validates_input() {
        let store = CredentialStore::with_demo_accounts();
        assert_eq!(store.register("", "pw"), Err(RegistrationError::EmptyField));
        assert_eq!(store.register("alice", "  "), Err(RegistrationError::EmptyField));
        assert_eq!(
            store.register("judge", "x"),
            Err(RegistrationError::DuplicateUsername("judge".to_string()))
        );

        assert_eq!(store.register("alice", "secret"), Ok(()));
        assert!(store.is_registered("alice"));
        assert!(store.authenticate("alice", "secret"));
    }

    #[test]
    fn login_distinguishes_failures() {
        let store = CredentialStore::with_demo_accounts();
        assert_eq!(store.login("ghost", "x"), Err(LoginError::UnknownUser));
        assert_eq!(store.login("judge", "x"), Err(LoginError::WrongPassword));
        assert_eq!(store.login("judge", "hackathon2024"), Ok(()));
    }

    #[test]
    fn concurrent_registrations_keep_usernames_unique() {
        let store = Arc::new(CredentialStore::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || store.register("same", &format!("pw{i}")).is_ok())
            })
            .collect();

        let successes = handles
            .into_iter()
            .filter_map(|h| h.join().ok())
            .filter(|ok| *ok)
            .count();
        assert_eq!(successes, 1);
        assert_eq!(store.user_count(), 1);
    }
}
