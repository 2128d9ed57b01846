//! HTTP API handlers for the survey service

pub mod admin;
pub mod auth;
pub mod export;
pub mod health;
pub mod submit;
pub mod ui;

pub use admin::{delete_all, get_analytics, list_responses};
pub use export::{admin_download_csv, download_csv};
pub use health::health_check;
pub use submit::submit_survey;
pub use ui::{serve_admin, serve_admin_js, serve_app_js, serve_index};
