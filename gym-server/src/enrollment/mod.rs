//! Enrollment - class bookings and waitlist promotion
//!
//! - [`EnrollmentLedger`]: in-memory, synchronous booking rules
//! - [`EnrollmentService`]: async API combining the ledger with a
//!   [`ClassRegistry`], a [`BookingStore`] and a [`NotificationSink`]

pub mod error;
pub mod ledger;
pub mod notify;
pub mod registry;
pub mod service;
pub mod store;

pub use error::{LedgerError, LedgerResult};
pub use ledger::EnrollmentLedger;
pub use notify::{BroadcastNotifier, EnrollmentEvent, MemberNotification, NotificationSink};
pub use registry::{ClassInfo, ClassRegistry, MemoryClassRegistry, SqliteClassRegistry};
pub use service::EnrollmentService;
pub use store::{BookingStore, MemoryBookingStore, SqliteBookingStore};

#[cfg(test)]
mod tests;
