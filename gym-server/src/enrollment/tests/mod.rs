use super::*;
use parking_lot::Mutex;
use shared::error::{AppError, ErrorCode};
use shared::models::{Booking, BookingCounts, BookingStatus};
use std::sync::Arc;

use crate::db::repository::{RepoError, RepoResult};

fn class(id: i64, capacity: i64) -> ClassInfo {
    ClassInfo {
        id,
        capacity,
        starts_at: None,
    }
}

fn members(bookings: &[Booking]) -> Vec<&str> {
    bookings.iter().map(|b| b.member_id.as_str()).collect()
}

fn statuses(bookings: &[Booking]) -> Vec<BookingStatus> {
    bookings.iter().map(|b| b.status).collect()
}

/// Sink that records every notification
#[derive(Default)]
struct RecordingSink {
    sent: Mutex<Vec<(String, EnrollmentEvent)>>,
}

impl RecordingSink {
    fn sent(&self) -> Vec<(String, EnrollmentEvent)> {
        self.sent.lock().clone()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, member_id: &str, event: EnrollmentEvent) {
        self.sent.lock().push((member_id.to_string(), event));
    }
}

/// Store whose writes can be switched to fail, or to never complete
#[derive(Default)]
struct FlakyStore {
    inner: MemoryBookingStore,
    fail_writes: Mutex<bool>,
    stall_writes: Mutex<bool>,
}

impl FlakyStore {
    fn set_failing(&self, failing: bool) {
        *self.fail_writes.lock() = failing;
    }

    fn set_stalled(&self, stalled: bool) {
        *self.stall_writes.lock() = stalled;
    }

    async fn check(&self) -> RepoResult<()> {
        let stalled = *self.stall_writes.lock();
        if stalled {
            std::future::pending::<()>().await;
        }
        if *self.fail_writes.lock() {
            return Err(RepoError::Database("disk I/O error".into()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl BookingStore for FlakyStore {
    async fn load_bookings(&self, class_id: i64) -> RepoResult<Vec<Booking>> {
        self.inner.load_bookings(class_id).await
    }

    async fn save_booking(&self, booking: &Booking) -> RepoResult<()> {
        self.check().await?;
        self.inner.save_booking(booking).await
    }

    async fn remove_booking(&self, booking_id: i64) -> RepoResult<()> {
        self.check().await?;
        self.inner.remove_booking(booking_id).await
    }
}

struct Harness {
    registry: Arc<MemoryClassRegistry>,
    store: Arc<FlakyStore>,
    sink: Arc<RecordingSink>,
    service: EnrollmentService,
}

fn harness() -> Harness {
    let registry = Arc::new(MemoryClassRegistry::new());
    let store = Arc::new(FlakyStore::default());
    let sink = Arc::new(RecordingSink::default());
    let service = EnrollmentService::new(registry.clone(), store.clone(), sink.clone());
    Harness {
        registry,
        store,
        sink,
        service,
    }
}
