//! HTTP API

pub mod services;

pub use services::{ApiSettings, AppState, configure_app};
