//! Core library for Workly.
//!
//! - `validation`: form rules (email, password, required fields, date order)
//! - `month_grid`: 7-column month layout for calendar views
//! - `calendar`, `event`, `user`: the domain model
//! - `backend`: persistence seam with file and in-memory implementations
//! - `workly`: scheduling operations with access control

pub mod auth;
pub mod backend;
pub mod calendar;
pub mod date_range;
pub mod error;
pub mod event;
pub mod month_grid;
pub mod preferences;
pub mod user;
pub mod validation;
pub mod workly;
pub mod workly_config;

pub use error::{WorklyError, WorklyResult};
pub use workly::{AgendaDay, Workly};
