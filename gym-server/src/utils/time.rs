//! 时间工具函数 - 课程日期/时间校验

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::{AppError, AppResult};

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
        AppError::validation(format!("Invalid date format: {date}")).with_detail("field", "date")
    })
}

/// 解析开始时间 (HH:MM)
pub fn parse_time(time: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(time, "%H:%M").map_err(|_| {
        AppError::validation(format!("Invalid time format: {time}")).with_detail("field", "time")
    })
}

/// 课程开始时间 (本地时间); 任一部分无法解析时返回 `None`
pub fn class_start(date: &str, time: &str) -> Option<NaiveDateTime> {
    Some(parse_date(date).ok()?.and_time(parse_time(time).ok()?))
}

/// 当前本地时间, 与 [`class_start`] 比较
pub fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}
