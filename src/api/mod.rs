//! HTTP surface of the service contract
//!
//! Any `Services` set can sit behind the router, so the fixture-backed
//! façade doubles as a stand-in backend.

pub mod error;
pub mod handlers;
pub mod health;
pub mod routes;

pub use error::{error_codes, ApiError};
pub use handlers::ApiState;
pub use routes::build_router;
