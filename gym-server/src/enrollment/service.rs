//! Enrollment Service - async façade over the ledger
//!
//! Each operation runs under one lock: resolve the class, hydrate its roster
//! from the store on first touch, stage the change on a copy of the roster,
//! persist it, install the copy, then notify. A write that fails or never
//! finishes (the caller's future was dropped) evicts the roster, so the next
//! access reloads it from the store.

use std::future::Future;
use std::sync::Arc;

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Booking, BookingCounts, CancelOutcome};
use tokio::sync::Mutex;

use super::ledger::{ClassRoster, EnrollmentLedger};
use super::notify::{EnrollmentEvent, NotificationSink};
use super::registry::{ClassInfo, ClassRegistry};
use super::store::BookingStore;
use crate::db::repository::RepoError;
use crate::utils::time::local_now;
use crate::utils::validation::normalize_member_id;

/// Holds the ledger while a staged roster is being written to the store.
///
/// Dropped without [`commit`](Self::commit) (write failed, or the future was
/// cancelled mid-write) it evicts the class roster.
struct PendingWrite<'a> {
    ledger: &'a mut EnrollmentLedger,
    class_id: i64,
    committed: bool,
}

impl<'a> PendingWrite<'a> {
    fn new(ledger: &'a mut EnrollmentLedger, class_id: i64) -> Self {
        Self {
            ledger,
            class_id,
            committed: false,
        }
    }

    fn commit(mut self, roster: ClassRoster) {
        self.ledger.install(self.class_id, roster);
        self.committed = true;
    }
}

impl Drop for PendingWrite<'_> {
    fn drop(&mut self) {
        if !self.committed {
            tracing::warn!(class_id = self.class_id, "Store write incomplete, roster evicted");
            self.ledger.evict(self.class_id);
        }
    }
}

pub struct EnrollmentService {
    registry: Arc<dyn ClassRegistry>,
    store: Arc<dyn BookingStore>,
    notifier: Arc<dyn NotificationSink>,
    ledger: Mutex<EnrollmentLedger>,
}

impl std::fmt::Debug for EnrollmentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnrollmentService")
            .field("registry", &"<ClassRegistry>")
            .field("store", &"<BookingStore>")
            .field("notifier", &"<NotificationSink>")
            .finish()
    }
}

impl EnrollmentService {
    pub fn new(
        registry: Arc<dyn ClassRegistry>,
        store: Arc<dyn BookingStore>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            registry,
            store,
            notifier,
            ledger: Mutex::new(EnrollmentLedger::new()),
        }
    }

    /// Resolve `class_id` and make sure its roster is in memory
    async fn prepare(&self, ledger: &mut EnrollmentLedger, class_id: i64) -> AppResult<ClassInfo> {
        let class = self
            .registry
            .get_class(class_id)
            .await?
            .ok_or_else(|| AppError::class_not_found(class_id))?;

        if !ledger.is_loaded(class_id) {
            let bookings = self.store.load_bookings(class_id).await?;
            ledger.hydrate(&class, bookings)?;
        }
        Ok(class)
    }

    /// Book a member into a class: confirmed if a seat is free, otherwise
    /// appended to the waitlist. Closed once the class has started.
    pub async fn book(&self, class_id: i64, member_id: &str) -> AppResult<Booking> {
        let member_id = normalize_member_id(member_id)?;
        let mut ledger = self.ledger.lock().await;
        let class = self.prepare(&mut ledger, class_id).await?;

        class.ensure_not_started(local_now())?;

        let mut roster = ledger.snapshot(class_id);
        let booking = roster.book(&class, member_id)?;

        let pending = PendingWrite::new(&mut *ledger, class_id);
        if let Err(e) = self.store.save_booking(&booking).await {
            tracing::error!(class_id, member_id, error = %e, "Failed to persist booking");
            return Err(match e {
                // UNIQUE(class_id, member_id): booked by someone outside this ledger
                RepoError::Duplicate(_) => AppError::new(ErrorCode::BookingAlreadyExists)
                    .with_detail("class_id", class_id)
                    .with_detail("member_id", member_id),
                other => other.into(),
            });
        }
        pending.commit(roster);

        tracing::info!(
            class_id,
            member_id,
            booking_id = booking.id,
            status = %booking.status,
            "Class booked"
        );
        Ok(booking)
    }

    /// Cancel a member's booking. A freed confirmed seat goes to the earliest
    /// waitlisted member, who is then notified. Closed once the class has
    /// started.
    pub async fn cancel(&self, class_id: i64, member_id: &str) -> AppResult<CancelOutcome> {
        let member_id = normalize_member_id(member_id)?;
        let mut ledger = self.ledger.lock().await;
        let class = self.prepare(&mut ledger, class_id).await?;

        class.ensure_not_started(local_now())?;

        let mut roster = ledger.snapshot(class_id);
        let outcome = roster.cancel(&class, member_id)?;

        let pending = PendingWrite::new(&mut *ledger, class_id);
        if let Err(e) = self
            .store
            .apply_cancel(&outcome.removed, outcome.promoted.as_ref())
            .await
        {
            tracing::error!(class_id, member_id, error = %e, "Failed to persist cancellation");
            return Err(e.into());
        }
        pending.commit(roster);
        drop(ledger);

        if let Some(promoted) = &outcome.promoted {
            self.notifier.notify(
                &promoted.member_id,
                EnrollmentEvent::PromotedFromWaitlist {
                    class_id,
                    booking: promoted.clone(),
                },
            );
        }

        tracing::info!(
            class_id,
            member_id,
            promoted = outcome.promoted.as_ref().map(|p| p.member_id.as_str()),
            "Booking cancelled"
        );
        Ok(outcome)
    }

    /// Bookings of a class: confirmed first, then the waitlist in promotion order
    pub async fn list_by_class(&self, class_id: i64) -> AppResult<Vec<Booking>> {
        let mut ledger = self.ledger.lock().await;
        self.prepare(&mut ledger, class_id).await?;
        Ok(ledger.list_by_class(class_id))
    }

    pub async fn counts(&self, class_id: i64) -> AppResult<BookingCounts> {
        let mut ledger = self.ledger.lock().await;
        self.prepare(&mut ledger, class_id).await?;
        Ok(ledger.counts(class_id))
    }

    /// Run `update` (a class capacity change) while no booking can slip in,
    /// rejecting capacities below the current confirmed count.
    ///
    /// Raising the capacity does not promote anybody; seats freed that way are
    /// filled by new bookings.
    pub async fn resize_class<T, F>(&self, class_id: i64, new_capacity: i64, update: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        let mut ledger = self.ledger.lock().await;
        self.prepare(&mut ledger, class_id).await?;

        let confirmed = ledger.counts(class_id).confirmed;
        if confirmed as i64 > new_capacity {
            return Err(AppError::with_message(
                ErrorCode::ClassCapacityBelowConfirmed,
                format!("Class {class_id} has {confirmed} confirmed bookings, capacity {new_capacity} is too low"),
            )
            .with_detail("class_id", class_id)
            .with_detail("confirmed", confirmed));
        }
        update.await
    }

    /// Drop the cached roster of a class (after the class was deleted or its
    /// bookings changed outside this service)
    pub async fn forget_class(&self, class_id: i64) {
        self.ledger.lock().await.evict(class_id);
    }
}
