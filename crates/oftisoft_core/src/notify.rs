//! Notification queue for the presentation layer.
//!
//! The edit session pushes typed signals; whichever frontend hosts the editor
//! drains them and decides how they look (toasts, banners, status lines).

use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, message)
    }

    fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct NotificationCenter {
    pending: VecDeque<Notification>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn push(&mut self, notification: Notification) {
        self.pending.push_back(notification);
    }

    /// Most recent notification, without draining.
    pub fn last(&self) -> Option<&Notification> {
        self.pending.back()
    }

    pub fn take_pending(&mut self) -> Vec<Notification> {
        self.pending.drain(..).collect()
    }
}
