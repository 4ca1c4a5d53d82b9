//! Crime Dashboard - Regional Crime Statistics Explorer
//!
//! Loads a district-level crime table, computes safety ratios, crime
//! composition and linear trend projections, and serves them through a
//! login-gated egui dashboard.

pub mod auth;
pub mod charts;
pub mod config;
pub mod data;
pub mod gui;
pub mod logging;
pub mod stats;
