//! 工具模块 - 通用工具函数和类型
//!
//! - [`AppError`] / [`ErrorCode`] - re-exported from `shared::error`
//! - [`logger`] - tracing setup
//! - [`validation`] / [`time`] - input checks used by the HTTP handlers

pub mod logger;
pub mod time;
pub mod validation;

pub use shared::error::{AppError, AppResult, ErrorCode};
