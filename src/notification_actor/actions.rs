use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub enum NotificationAction {
    /// Answers `true` when the notification was unread before.
    MarkRead { at: DateTime<Utc> },
}
