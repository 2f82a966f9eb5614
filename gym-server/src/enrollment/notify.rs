//! Enrollment notifications
//!
//! Notifications are fire-and-forget: a sink never fails the operation that
//! triggered it.

use serde::{Deserialize, Serialize};
use shared::models::Booking;
use tokio::sync::broadcast;

/// Default broadcast channel capacity
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Events delivered to members
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EnrollmentEvent {
    /// A waitlisted booking took over a freed seat
    PromotedFromWaitlist { class_id: i64, booking: Booking },
}

/// Notification delivery for a member
pub trait NotificationSink: Send + Sync {
    fn notify(&self, member_id: &str, event: EnrollmentEvent);
}

/// Addressed notification as seen by subscribers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberNotification {
    pub member_id: String,
    pub event: EnrollmentEvent,
}

/// Sink that fans notifications out over a tokio broadcast channel
#[derive(Debug, Clone)]
pub struct BroadcastNotifier {
    tx: broadcast::Sender<MemberNotification>,
}

impl BroadcastNotifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MemberNotification> {
        self.tx.subscribe()
    }
}

impl Default for BroadcastNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

impl NotificationSink for BroadcastNotifier {
    fn notify(&self, member_id: &str, event: EnrollmentEvent) {
        let notification = MemberNotification {
            member_id: member_id.to_string(),
            event,
        };
        if self.tx.send(notification).is_err() {
            tracing::warn!(member_id, "Notification dropped: no active receivers");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::BookingStatus;

    fn promoted_event() -> EnrollmentEvent {
        EnrollmentEvent::PromotedFromWaitlist {
            class_id: 7,
            booking: Booking {
                id: 1,
                class_id: 7,
                member_id: "m2".to_string(),
                status: BookingStatus::Confirmed,
                booked_at: 100,
            },
        }
    }

    #[tokio::test]
    async fn subscribers_receive_notifications() {
        let notifier = BroadcastNotifier::new(8);
        let mut rx = notifier.subscribe();

        notifier.notify("m2", promoted_event());

        let received = rx.recv().await.unwrap();
        assert_eq!(received.member_id, "m2");
        assert_eq!(received.event, promoted_event());
    }

    #[test]
    fn notify_without_subscribers_does_not_panic() {
        BroadcastNotifier::default().notify("m2", promoted_event());
    }

    #[test]
    fn event_is_tagged() {
        let json = serde_json::to_value(promoted_event()).unwrap();
        assert_eq!(json["type"], "promoted_from_waitlist");
        assert_eq!(json["booking"]["status"], "confirmed");
    }
}
