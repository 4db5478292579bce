use std::sync::Mutex;

use opticare_alerts::{Notification, NotificationSink};
use opticare_core::NotificationId;

/// In-memory notification sink for tests/dev.
///
/// Collects delivered notifications and supports flipping the `read` flag —
/// the only mutation the notification contract allows.
#[derive(Debug, Default)]
pub struct InMemoryNotificationSink {
    inner: Mutex<Vec<Notification>>,
}

impl InMemoryNotificationSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<Notification> {
        self.inner.lock().map(|g| g.clone()).unwrap_or_default()
    }

    /// Returns false when the notification is unknown.
    pub fn mark_read(&self, id: NotificationId) -> bool {
        let Ok(mut guard) = self.inner.lock() else {
            return false;
        };
        match guard.iter_mut().find(|n| n.id == id) {
            Some(n) => {
                n.mark_read();
                true
            }
            None => false,
        }
    }
}

impl NotificationSink for InMemoryNotificationSink {
    fn deliver(&self, notification: Notification) {
        if let Ok(mut guard) = self.inner.lock() {
            guard.push(notification);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use opticare_alerts::{AlertSubject, NotificationKind, Severity};
    use opticare_core::MachinePartId;

    fn notification() -> Notification {
        Notification {
            id: NotificationId::new(),
            kind: NotificationKind::WearThreshold,
            title: "cutting wheel is approaching its rated lifespan".to_string(),
            message: "cutting wheel: 19500 of 25000 cuts used (78.0%)".to_string(),
            severity: Severity::Medium,
            related: AlertSubject::Part {
                part_id: MachinePartId::new(),
            },
            read: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn mark_read_flips_the_flag_only() {
        let sink = InMemoryNotificationSink::new();
        let n = notification();
        let id = n.id;
        sink.deliver(n.clone());

        assert!(sink.mark_read(id));
        let stored = sink.all();
        assert!(stored[0].read);
        assert_eq!(stored[0].message, n.message);

        assert!(!sink.mark_read(NotificationId::new()));
    }
}
