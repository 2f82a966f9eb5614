//! Enrollment Ledger - capacity-bounded class bookings with a FIFO waitlist
//!
//! The ledger is synchronous and performs no I/O. Callers own it behind a lock
//! (see [`EnrollmentService`](super::EnrollmentService)) because `book` and
//! `cancel` are read-check-write sequences over one class roster.
//!
//! # Booking state machine
//!
//! ```text
//! (none) ──book()──► confirmed | waitlisted
//! waitlisted ──promotion (inside cancel)──► confirmed
//! confirmed | waitlisted ──cancel()──► (removed)
//! ```
//!
//! A confirmed booking is never demoted.

use std::collections::{HashMap, HashSet};

use shared::models::{Booking, BookingCounts, BookingStatus, CancelOutcome};

use super::error::{LedgerError, LedgerResult};
use super::registry::ClassInfo;

/// Bookings of one class, kept in insertion order
#[derive(Debug, Clone, Default)]
pub struct ClassRoster {
    bookings: Vec<Booking>,
}

impl ClassRoster {
    fn position(&self, member_id: &str) -> Option<usize> {
        self.bookings.iter().position(|b| b.member_id == member_id)
    }

    fn confirmed_count(&self) -> usize {
        self.bookings.iter().filter(|b| b.is_confirmed()).count()
    }

    fn waitlisted_count(&self) -> usize {
        self.bookings.iter().filter(|b| b.is_waitlisted()).count()
    }

    /// Index of the waitlisted booking with the highest promotion priority:
    /// earliest `booked_at`, ties broken by insertion order.
    fn next_in_line(&self) -> Option<usize> {
        self.bookings
            .iter()
            .enumerate()
            .filter(|(_, b)| b.is_waitlisted())
            .min_by_key(|(idx, b)| (b.booked_at, *idx))
            .map(|(idx, _)| idx)
    }

    /// Confirmed bookings first, then the waitlist in promotion order.
    fn ordered(&self) -> Vec<Booking> {
        let mut confirmed: Vec<Booking> = self
            .bookings
            .iter()
            .filter(|b| b.is_confirmed())
            .cloned()
            .collect();
        let mut waitlisted: Vec<Booking> = self
            .bookings
            .iter()
            .filter(|b| b.is_waitlisted())
            .cloned()
            .collect();
        // Stable sorts keep insertion order for equal timestamps
        confirmed.sort_by_key(|b| b.booked_at);
        waitlisted.sort_by_key(|b| b.booked_at);
        confirmed.extend(waitlisted);
        confirmed
    }

    /// Book `member_id`: confirmed while confirmed seats < capacity, otherwise
    /// appended to the waitlist. The roster is unchanged on error.
    pub fn book(&mut self, class: &ClassInfo, member_id: &str) -> LedgerResult<Booking> {
        if member_id.is_empty() {
            return Err(LedgerError::EmptyMemberId);
        }
        if self.position(member_id).is_some() {
            return Err(LedgerError::DuplicateBooking {
                class_id: class.id,
                member_id: member_id.to_string(),
            });
        }

        let status = if (self.confirmed_count() as i64) < class.capacity {
            BookingStatus::Confirmed
        } else {
            BookingStatus::Waitlisted
        };

        let booking = Booking {
            id: shared::util::snowflake_id(),
            class_id: class.id,
            member_id: member_id.to_string(),
            status,
            booked_at: shared::util::now_millis(),
        };
        self.bookings.push(booking.clone());

        if let Err(e) = self.check_capacity(class) {
            self.bookings.pop();
            return Err(e);
        }

        tracing::debug!(
            class_id = class.id,
            member_id,
            status = %booking.status,
            "Booking created"
        );
        Ok(booking)
    }

    /// Remove the booking of `member_id`, promoting the earliest waitlisted
    /// booking when a confirmed seat was freed.
    pub fn cancel(&mut self, class: &ClassInfo, member_id: &str) -> LedgerResult<CancelOutcome> {
        let idx = self
            .position(member_id)
            .ok_or_else(|| LedgerError::NotFound {
                class_id: class.id,
                member_id: member_id.to_string(),
            })?;
        let removed = self.bookings.remove(idx);

        let mut promoted = None;
        if removed.is_confirmed()
            && (self.confirmed_count() as i64) < class.capacity
            && let Some(next) = self.next_in_line()
        {
            self.bookings[next].status = BookingStatus::Confirmed;
            promoted = Some(self.bookings[next].clone());
        }

        match &promoted {
            Some(p) => tracing::info!(
                class_id = class.id,
                cancelled = %removed.member_id,
                promoted = %p.member_id,
                "Booking cancelled, waitlisted member promoted"
            ),
            None => tracing::debug!(
                class_id = class.id,
                member_id,
                "Booking cancelled"
            ),
        }

        Ok(CancelOutcome { removed, promoted })
    }

    /// Rosters loaded from a store must hold one booking per member
    fn check_unique_members(&self, class_id: i64) -> LedgerResult<()> {
        let mut seen = HashSet::with_capacity(self.bookings.len());
        for booking in &self.bookings {
            if !seen.insert(booking.member_id.as_str()) {
                return Err(LedgerError::DuplicateInRoster {
                    class_id,
                    member_id: booking.member_id.clone(),
                });
            }
        }
        Ok(())
    }

    fn check_capacity(&self, class: &ClassInfo) -> LedgerResult<()> {
        let confirmed = self.confirmed_count();
        if confirmed as i64 > class.capacity.max(0) {
            return Err(LedgerError::CapacityInvariantViolation {
                class_id: class.id,
                confirmed,
                capacity: class.capacity,
            });
        }
        Ok(())
    }
}

/// In-memory booking ledger for all classes touched by this process
#[derive(Debug, Default)]
pub struct EnrollmentLedger {
    rosters: HashMap<i64, ClassRoster>,
}

impl EnrollmentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the roster for `class_id` has been loaded (or started) in memory
    pub fn is_loaded(&self, class_id: i64) -> bool {
        self.rosters.contains_key(&class_id)
    }

    /// Replace the roster of a class with bookings loaded from a store.
    ///
    /// `bookings` must be in the store's insertion order. A roster holding more
    /// confirmed bookings than the class capacity, or two bookings of one
    /// member, is rejected and not loaded.
    pub fn hydrate(&mut self, class: &ClassInfo, bookings: Vec<Booking>) -> LedgerResult<()> {
        let roster = ClassRoster {
            bookings: bookings
                .into_iter()
                .filter(|b| b.class_id == class.id)
                .collect(),
        };
        roster.check_capacity(class)?;
        roster.check_unique_members(class.id)?;
        tracing::debug!(
            class_id = class.id,
            count = roster.bookings.len(),
            "Roster hydrated"
        );
        self.rosters.insert(class.id, roster);
        Ok(())
    }

    /// Drop the in-memory roster of a class (class deleted, or store out of sync)
    pub fn evict(&mut self, class_id: i64) {
        self.rosters.remove(&class_id);
    }

    /// Copy of the roster of a class (empty if none is loaded)
    ///
    /// Together with [`install`](Self::install) this lets a caller stage a
    /// change, persist it, and only then make it visible.
    pub fn snapshot(&self, class_id: i64) -> ClassRoster {
        self.rosters.get(&class_id).cloned().unwrap_or_default()
    }

    /// Make a staged roster the current one
    pub fn install(&mut self, class_id: i64, roster: ClassRoster) {
        self.rosters.insert(class_id, roster);
    }

    /// Book `member_id` into `class`.
    ///
    /// Confirmed while confirmed seats < capacity, otherwise appended to the
    /// waitlist. Fails with [`LedgerError::DuplicateBooking`] if the member
    /// already holds a booking for the class.
    pub fn book(&mut self, class: &ClassInfo, member_id: &str) -> LedgerResult<Booking> {
        let mut roster = self.snapshot(class.id);
        let booking = roster.book(class, member_id)?;
        self.install(class.id, roster);
        Ok(booking)
    }

    /// Cancel the booking of `member_id` in `class`.
    ///
    /// Cancelling a confirmed booking promotes exactly one waitlisted booking
    /// (the earliest) when a seat is free afterwards. Cancelling a waitlisted
    /// booking promotes nobody. The ledger is unchanged on error.
    pub fn cancel(&mut self, class: &ClassInfo, member_id: &str) -> LedgerResult<CancelOutcome> {
        let roster = self
            .rosters
            .get_mut(&class.id)
            .ok_or_else(|| LedgerError::NotFound {
                class_id: class.id,
                member_id: member_id.to_string(),
            })?;
        roster.cancel(class, member_id)
    }

    /// All bookings of a class: confirmed first (booking order), then the
    /// waitlist (FIFO).
    pub fn list_by_class(&self, class_id: i64) -> Vec<Booking> {
        self.rosters
            .get(&class_id)
            .map(ClassRoster::ordered)
            .unwrap_or_default()
    }

    pub fn counts(&self, class_id: i64) -> BookingCounts {
        self.rosters
            .get(&class_id)
            .map(|r| BookingCounts {
                confirmed: r.confirmed_count(),
                waitlisted: r.waitlisted_count(),
            })
            .unwrap_or_default()
    }
}
