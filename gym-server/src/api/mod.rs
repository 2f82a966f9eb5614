//! API 路由模块
//!
//! - [`health`] - 健康检查
//! - [`classes`] - 课程管理接口
//! - [`bookings`] - 课程预约 / 取消 / 候补名单

pub mod bookings;
pub mod classes;
pub mod health;
