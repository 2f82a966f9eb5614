//! Gym Class Model (课程)

use serde::{Deserialize, Serialize};

use super::Booking;

fn default_duration() -> i64 {
    60
}

fn default_capacity() -> i64 {
    20
}

/// Scheduled class entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct GymClass {
    pub id: i64,
    pub title: String,
    pub trainer_name: Option<String>,
    /// Date (YYYY-MM-DD)
    pub date: String,
    /// Start time (HH:MM)
    pub time: String,
    pub duration_minutes: i64,
    /// Maximum number of confirmed bookings (0 = waitlist only)
    pub capacity: i64,
    pub description: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create class payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GymClassCreate {
    pub title: String,
    pub trainer_name: Option<String>,
    pub date: String,
    pub time: String,
    #[serde(default = "default_duration")]
    pub duration_minutes: i64,
    #[serde(default = "default_capacity")]
    pub capacity: i64,
    pub description: Option<String>,
}

/// Update class payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GymClassUpdate {
    pub title: Option<String>,
    pub trainer_name: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub duration_minutes: Option<i64>,
    pub capacity: Option<i64>,
    pub description: Option<String>,
}

/// Class with its booking counters (list view)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassSummary {
    #[serde(flatten)]
    pub class: GymClass,
    pub confirmed_count: usize,
    pub waitlist_count: usize,
    pub is_full: bool,
}

impl ClassSummary {
    pub fn new(class: GymClass, confirmed_count: usize, waitlist_count: usize) -> Self {
        let is_full = confirmed_count as i64 >= class.capacity;
        Self {
            class,
            confirmed_count,
            waitlist_count,
            is_full,
        }
    }
}

/// Class detail with confirmed members and the waitlist in promotion order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassDetail {
    #[serde(flatten)]
    pub summary: ClassSummary,
    pub confirmed: Vec<Booking>,
    pub waitlist: Vec<Booking>,
}
