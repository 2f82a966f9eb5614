//! Shared types for the gym server
//!
//! Wire models, error codes and response structures used by the server crate
//! and by anything that talks to its HTTP API.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};
