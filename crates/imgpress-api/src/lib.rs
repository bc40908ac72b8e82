//! imgpress API Library
//!
//! This crate provides the HTTP handlers, application state, telemetry and server setup.

mod handlers;
mod utils;

pub mod constants;
pub mod error;
pub mod setup;
pub mod state;
pub mod telemetry;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
