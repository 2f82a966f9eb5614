//! Booking persistence for the enrollment ledger

use async_trait::async_trait;
use parking_lot::Mutex;
use shared::models::Booking;
use sqlx::SqlitePool;

use crate::db::repository::{RepoResult, booking};

/// Durable storage of bookings.
///
/// `load_bookings` must return a class's bookings in the order they were first
/// saved; the ledger relies on it for waitlist order after a restart.
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn load_bookings(&self, class_id: i64) -> RepoResult<Vec<Booking>>;

    /// Insert a booking, or overwrite the stored status of an existing one
    async fn save_booking(&self, booking: &Booking) -> RepoResult<()>;

    async fn remove_booking(&self, booking_id: i64) -> RepoResult<()>;

    /// Persist the effects of one cancellation
    async fn apply_cancel(&self, removed: &Booking, promoted: Option<&Booking>) -> RepoResult<()> {
        self.remove_booking(removed.id).await?;
        if let Some(promoted) = promoted {
            self.save_booking(promoted).await?;
        }
        Ok(())
    }
}

/// Store backed by the `class_booking` table
#[derive(Clone)]
pub struct SqliteBookingStore {
    pool: SqlitePool,
}

impl SqliteBookingStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingStore for SqliteBookingStore {
    async fn load_bookings(&self, class_id: i64) -> RepoResult<Vec<Booking>> {
        booking::find_by_class(&self.pool, class_id).await
    }

    async fn save_booking(&self, record: &Booking) -> RepoResult<()> {
        booking::upsert(&self.pool, record).await
    }

    async fn remove_booking(&self, booking_id: i64) -> RepoResult<()> {
        booking::delete(&self.pool, booking_id).await?;
        Ok(())
    }

    // Removal and promotion commit in one transaction
    async fn apply_cancel(&self, removed: &Booking, promoted: Option<&Booking>) -> RepoResult<()> {
        booking::apply_cancel(&self.pool, removed, promoted).await
    }
}

/// In-memory store (tests and embedded use)
#[derive(Debug, Default)]
pub struct MemoryBookingStore {
    bookings: Mutex<Vec<Booking>>,
}

impl MemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored bookings across all classes
    pub fn len(&self) -> usize {
        self.bookings.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookings.lock().is_empty()
    }
}

#[async_trait]
impl BookingStore for MemoryBookingStore {
    async fn load_bookings(&self, class_id: i64) -> RepoResult<Vec<Booking>> {
        Ok(self
            .bookings
            .lock()
            .iter()
            .filter(|b| b.class_id == class_id)
            .cloned()
            .collect())
    }

    async fn save_booking(&self, record: &Booking) -> RepoResult<()> {
        let mut bookings = self.bookings.lock();
        match bookings.iter_mut().find(|b| b.id == record.id) {
            Some(existing) => existing.status = record.status,
            None => bookings.push(record.clone()),
        }
        Ok(())
    }

    async fn remove_booking(&self, booking_id: i64) -> RepoResult<()> {
        self.bookings.lock().retain(|b| b.id != booking_id);
        Ok(())
    }
}
