//! Token map view-state, aggregation and formatting
//!
//! The service shape (`models::TokenMapData`) is converted into a `Board`,
//! an `Arc`-shared tree of layers, categories and use cases carrying the
//! expand/collapse flags. Every edit produces a new board that shares the
//! untouched branches, so `Arc::ptr_eq` is a valid change check.

pub mod aggregate;
pub mod board;
pub mod format;

pub use aggregate::{provider_breakdown, provider_distribution, share_percent, sum_tokens};
pub use board::{Board, Category, Layer};
pub use format::{format_percent, format_tokens, parse_token_input};
