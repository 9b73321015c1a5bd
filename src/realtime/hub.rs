//! In-process publish/subscribe hub behind the SSE endpoint.
//!
//! Delivery is deliberately lossy: publishers use `try_send` and drop events
//! when a subscriber's buffer is full or its stream has gone away. The REST
//! read endpoints (notifications, subscription state) remain the correctness
//! backstop, so a dropped push only delays the UI, never the data.

use crate::models::NotificationType;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RealtimeEvent {
    /// Balance changed (spend, reward, or admin adjustment).
    CreditBalance {
        user_id: i64,
        credits: i64,
        delta: i64,
        reason: String,
    },
    /// Block flag flipped by an admin.
    AccountFlag { user_id: i64, is_blocked: bool },
    /// Admin invalidated the user's sessions.
    ForceLogout { user_id: i64 },
    /// Announcement to one user or to everyone (`user_id` = None).
    Broadcast {
        user_id: Option<i64>,
        title: String,
        message: String,
        notification_type: NotificationType,
    },
    /// The user's inbox changed; clients should refetch.
    NotificationsChanged { user_id: i64 },
    /// A reward engine paid out.
    Reward {
        user_id: i64,
        engine: String,
        description: String,
    },
}

impl RealtimeEvent {
    /// The account this event is addressed to; `None` means every
    /// connected client may see it.
    pub fn target(&self) -> Option<i64> {
        match self {
            RealtimeEvent::CreditBalance { user_id, .. }
            | RealtimeEvent::AccountFlag { user_id, .. }
            | RealtimeEvent::ForceLogout { user_id }
            | RealtimeEvent::NotificationsChanged { user_id }
            | RealtimeEvent::Reward { user_id, .. } => Some(*user_id),
            RealtimeEvent::Broadcast { user_id, .. } => *user_id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RealtimeEvent::CreditBalance { .. } => "credit_balance",
            RealtimeEvent::AccountFlag { .. } => "account_flag",
            RealtimeEvent::ForceLogout { .. } => "force_logout",
            RealtimeEvent::Broadcast { .. } => "broadcast",
            RealtimeEvent::NotificationsChanged { .. } => "notifications_changed",
            RealtimeEvent::Reward { .. } => "reward",
        }
    }
}

struct Subscriber {
    user_id: i64,
    tx: mpsc::Sender<RealtimeEvent>,
}

/// Per-process fan-out of account events. Every SSE connection registers a
/// bounded subscriber keyed by its authenticated user id; the server-side
/// filter here replaces the shared broadcast channel the policy layer used
/// to be bypassed with.
#[derive(Clone)]
pub struct EventHub {
    subscribers: Arc<Mutex<Vec<Subscriber>>>,
}

const SUBSCRIBER_BUFFER: usize = 64;

impl EventHub {
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Register a subscriber for one authenticated user. The receiver sees
    /// events addressed to that user plus global broadcasts.
    pub fn subscribe(&self, user_id: i64) -> mpsc::Receiver<RealtimeEvent> {
        let (tx, rx) = mpsc::channel(SUBSCRIBER_BUFFER);
        let mut subs = self.subscribers.lock().unwrap_or_else(|e| e.into_inner());
        subs.push(Subscriber { user_id, tx });
        rx
    }

    /// Publish an event. Never blocks and never fails: full buffers drop the
    /// event, closed receivers are pruned.
    pub fn publish(&self, event: RealtimeEvent) {
        let mut subs = self.subscribers.lock().unwrap_or_else(|e| e.into_inner());
        subs.retain(|sub| {
            if !sub.tx.is_closed() {
                let visible = match event.target() {
                    Some(target) => target == sub.user_id,
                    None => true,
                };
                if visible && sub.tx.try_send(event.clone()).is_err() {
                    log::debug!(
                        "Realtime event {} dropped for user {} (buffer full)",
                        event.kind(),
                        sub.user_id
                    );
                }
                true
            } else {
                false
            }
        });
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_receives_own_events() {
        let hub = EventHub::new();
        let mut rx = hub.subscribe(7);

        hub.publish(RealtimeEvent::CreditBalance {
            user_id: 7,
            credits: 80,
            delta: -20,
            reason: "Image generation".to_string(),
        });

        let event = rx.recv().await.expect("event expected");
        match event {
            RealtimeEvent::CreditBalance { user_id, credits, delta, .. } => {
                assert_eq!(user_id, 7);
                assert_eq!(credits, 80);
                assert_eq!(delta, -20);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_events_are_filtered_by_user() {
        let hub = EventHub::new();
        let mut rx_target = hub.subscribe(1);
        let mut rx_other = hub.subscribe(2);

        hub.publish(RealtimeEvent::ForceLogout { user_id: 1 });
        hub.publish(RealtimeEvent::Broadcast {
            user_id: None,
            title: "Maintenance".to_string(),
            message: "Back in 10 minutes".to_string(),
            notification_type: NotificationType::Info,
        });

        // Target sees both, the other user only the global broadcast
        assert_eq!(rx_target.recv().await.unwrap().kind(), "force_logout");
        assert_eq!(rx_target.recv().await.unwrap().kind(), "broadcast");
        assert_eq!(rx_other.recv().await.unwrap().kind(), "broadcast");
        assert!(rx_other.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_closed_subscribers_are_pruned() {
        let hub = EventHub::new();
        let rx = hub.subscribe(1);
        assert_eq!(hub.subscriber_count(), 1);

        drop(rx);
        hub.publish(RealtimeEvent::ForceLogout { user_id: 1 });
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_full_buffer_drops_instead_of_blocking() {
        let hub = EventHub::new();
        let mut rx = hub.subscribe(1);

        for _ in 0..(SUBSCRIBER_BUFFER + 10) {
            hub.publish(RealtimeEvent::NotificationsChanged { user_id: 1 });
        }

        // The subscriber still exists and holds a full buffer
        assert_eq!(hub.subscriber_count(), 1);
        let mut received = 0;
        while rx.try_recv().is_ok() {
            received += 1;
        }
        assert_eq!(received, SUBSCRIBER_BUFFER);
    }
}
