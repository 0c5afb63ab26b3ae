//! Wiring for the classifieds HTTP server
//!
//! [`app::build_app`] turns an [`classifieds_config::AppConfig`] into the
//! complete router; `main` only loads the config and serves it.

pub mod app;
pub mod error;

pub use app::{build_app, log_auth_events, spawn_auth_event_log, App};
pub use error::StartupError;
