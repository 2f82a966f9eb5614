use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Ledger errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Member id must not be empty")]
    EmptyMemberId,

    #[error("Member {member_id} already booked class {class_id}")]
    DuplicateBooking { class_id: i64, member_id: String },

    #[error("No booking for member {member_id} in class {class_id}")]
    NotFound { class_id: i64, member_id: String },

    #[error("Class {class_id} has {confirmed} confirmed bookings for capacity {capacity}")]
    CapacityInvariantViolation {
        class_id: i64,
        confirmed: usize,
        capacity: i64,
    },

    #[error("Member {member_id} holds more than one booking in class {class_id}")]
    DuplicateInRoster { class_id: i64, member_id: String },

    #[error("Class {class_id} has already started")]
    ClassStarted { class_id: i64 },
}

pub type LedgerResult<T> = Result<T, LedgerError>;

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::EmptyMemberId => {
                AppError::validation("member_id must not be empty").with_detail("field", "member_id")
            }
            LedgerError::DuplicateBooking {
                class_id,
                member_id,
            } => AppError::new(ErrorCode::BookingAlreadyExists)
                .with_detail("class_id", class_id)
                .with_detail("member_id", member_id),
            LedgerError::NotFound {
                class_id,
                member_id,
            } => AppError::new(ErrorCode::BookingNotFound)
                .with_detail("class_id", class_id)
                .with_detail("member_id", member_id),
            LedgerError::CapacityInvariantViolation {
                class_id,
                confirmed,
                capacity,
            } => {
                tracing::error!(
                    class_id,
                    confirmed,
                    capacity,
                    "Capacity invariant violated"
                );
                AppError::new(ErrorCode::InternalError)
            }
            LedgerError::DuplicateInRoster {
                class_id,
                member_id,
            } => {
                tracing::error!(class_id, member_id, "Stored roster holds a member twice");
                AppError::new(ErrorCode::InternalError)
            }
            LedgerError::ClassStarted { class_id } => {
                AppError::new(ErrorCode::ClassAlreadyStarted).with_detail("class_id", class_id)
            }
        }
    }
}
