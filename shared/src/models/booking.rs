//! Class Booking Model (课程预约)

use serde::{Deserialize, Serialize};

/// Booking status
///
/// There is no `cancelled` state: a cancelled booking is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum BookingStatus {
    Confirmed,
    Waitlisted,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Waitlisted => "waitlisted",
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One accepted enrollment of a member into a class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Booking {
    pub id: i64,
    pub class_id: i64,
    pub member_id: String,
    pub status: BookingStatus,
    /// Creation time (Unix millis), never mutated
    pub booked_at: i64,
}

impl Booking {
    pub fn is_confirmed(&self) -> bool {
        self.status == BookingStatus::Confirmed
    }

    pub fn is_waitlisted(&self) -> bool {
        self.status == BookingStatus::Waitlisted
    }
}

/// Book class payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingCreate {
    pub member_id: String,
}

/// Result of a cancellation: the removed booking and the waitlisted booking
/// that took over the freed seat, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelOutcome {
    pub removed: Booking,
    pub promoted: Option<Booking>,
}

/// Per-class booking counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingCounts {
    pub confirmed: usize,
    pub waitlisted: usize,
}
