//! Tokenholic
//!
//! Token map, solution recommendation and sales role-play tooling: a service
//! façade with fixture-backed and HTTP-backed implementations, page
//! controllers over typed application state, and an axum router exposing the
//! same contract.

pub mod api;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod pages;
pub mod role_play;
pub mod services;
pub mod state;
pub mod token_map;

pub use config::Config;
pub use error::{Error, Result, ServiceError};
pub use pages::App;
pub use services::Services;
