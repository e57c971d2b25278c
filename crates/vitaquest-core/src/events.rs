//! One-shot notifications raised by the state core.
//!
//! Consumers poll the queue; each notification is delivered exactly once.
//! This replaces "modal visible" booleans the UI would have to remember
//! to clear.

use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A state change the UI should surface once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Notification {
    /// XP crossed a level threshold upward.
    LevelUp { level: u32, at: DateTime<Utc> },
}

/// FIFO queue of pending notifications.
#[derive(Debug, Default)]
pub struct NotificationQueue {
    items: Mutex<VecDeque<Notification>>,
}

impl NotificationQueue {
    pub fn push(&self, notification: Notification) {
        self.items.lock().unwrap().push_back(notification);
    }

    /// Remove and return the oldest pending notification.
    pub fn poll(&self) -> Option<Notification> {
        self.items.lock().unwrap().pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().unwrap().is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.lock().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poll_delivers_each_notification_once() {
        let queue = NotificationQueue::default();
        queue.push(Notification::LevelUp {
            level: 2,
            at: Utc::now(),
        });
        queue.push(Notification::LevelUp {
            level: 3,
            at: Utc::now(),
        });

        assert_eq!(queue.len(), 2);
        assert!(matches!(
            queue.poll(),
            Some(Notification::LevelUp { level: 2, .. })
        ));
        assert!(matches!(
            queue.poll(),
            Some(Notification::LevelUp { level: 3, .. })
        ));
        assert!(queue.poll().is_none());
        assert!(queue.is_empty());
    }

    #[test]
    fn notification_serializes_with_type_tag() {
        let n = Notification::LevelUp {
            level: 4,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["type"], "LevelUp");
        assert_eq!(json["level"], 4);
    }
}
