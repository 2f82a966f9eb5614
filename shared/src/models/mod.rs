//! Data models
//!
//! Shared between gym-server and the frontend (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! Class and booking IDs are `i64` (SQLite INTEGER); member IDs are opaque strings.

pub mod booking;
pub mod gym_class;

// Re-exports
pub use booking::*;
pub use gym_class::*;
