//! Single-slot transient notifications with auto-expiry.

use std::time::Duration;

use tokio::time::Instant;

/// How long a notification stays up unless dismissed.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    pub created_at: Instant,
    pub expires_at: Instant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Slot {
    None,
    Shown(Notification),
}

/// Holds at most one live notification.
///
/// `show` replaces whatever is displayed and restarts the expiry deadline, so
/// an earlier pending dismissal never clears a later message.
#[derive(Debug, Clone)]
pub struct NotificationChannel {
    slot: Slot,
    ttl: Duration,
}

impl Default for NotificationChannel {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl NotificationChannel {
    pub fn new(ttl: Duration) -> Self {
        Self {
            slot: Slot::None,
            ttl,
        }
    }

    pub fn show(&mut self, message: impl Into<String>, severity: Severity) {
        let now = Instant::now();
        self.slot = Slot::Shown(Notification {
            message: message.into(),
            severity,
            created_at: now,
            expires_at: now + self.ttl,
        });
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.show(message, Severity::Success);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.show(message, Severity::Error);
    }

    pub fn dismiss(&mut self) {
        self.slot = Slot::None;
    }

    /// Clear the notification if its deadline has passed. Returns true when
    /// something was cleared.
    pub fn expire(&mut self, now: Instant) -> bool {
        match &self.slot {
            Slot::Shown(n) if now >= n.expires_at => {
                self.slot = Slot::None;
                true
            }
            _ => false,
        }
    }

    pub fn current(&self) -> Option<&Notification> {
        match &self.slot {
            Slot::Shown(n) => Some(n),
            Slot::None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn expires_after_ttl() {
        let mut channel = NotificationChannel::new(Duration::from_secs(3));
        channel.success("Successfully classified!");

        tokio::time::advance(Duration::from_millis(2900)).await;
        assert!(!channel.expire(Instant::now()));
        assert!(channel.current().is_some());

        tokio::time::advance(Duration::from_millis(200)).await;
        assert!(channel.expire(Instant::now()));
        assert!(channel.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn later_show_preempts_earlier_deadline() {
        let mut channel = NotificationChannel::new(Duration::from_secs(3));
        channel.success("first");
        tokio::time::advance(Duration::from_secs(2)).await;
        channel.error("second");

        // The first deadline has passed, the second has not.
        tokio::time::advance(Duration::from_millis(1500)).await;
        assert!(!channel.expire(Instant::now()));
        let current = channel.current().unwrap();
        assert_eq!(current.message, "second");
        assert_eq!(current.severity, Severity::Error);
    }

    #[test]
    fn dismiss_clears_immediately() {
        let mut channel = NotificationChannel::default();
        channel.error("boom");
        channel.dismiss();
        assert!(channel.current().is_none());
    }
}
