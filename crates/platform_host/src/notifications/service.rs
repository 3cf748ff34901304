//! Notification service contracts and in-memory/no-op adapters.

use std::{cell::RefCell, rc::Rc};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Severity of a user-facing notice.
pub enum NoticeLevel {
    /// A mutation completed (item added, cart cleared).
    Success,
    /// Neutral confirmation (item removed, quantity updated).
    Info,
    /// A recoverable failure the user should know about.
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Short-lived, non-blocking message surfaced to the user.
pub struct Notice {
    /// Severity used by renderers to pick styling.
    pub level: NoticeLevel,
    /// Headline, for example `"Added to Cart"`.
    pub title: String,
    /// Secondary line with item details.
    pub description: String,
}

impl Notice {
    /// Builds a [`NoticeLevel::Success`] notice.
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, title, description)
    }

    /// Builds a [`NoticeLevel::Info`] notice.
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, title, description)
    }

    /// Builds a [`NoticeLevel::Warning`] notice.
    pub fn warning(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, title, description)
    }

    fn new(level: NoticeLevel, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Host service for user-visible notices.
///
/// Delivery is fire-and-forget: a collaborator may ignore notices entirely.
pub trait NotificationService {
    /// Dispatches a notice.
    fn notify(&self, notice: &Notice);
}

impl<S: NotificationService + ?Sized> NotificationService for Rc<S> {
    fn notify(&self, notice: &Notice) {
        (**self).notify(notice);
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op notification service for hosts without a notice surface.
pub struct NoopNotificationService;

impl NotificationService for NoopNotificationService {
    fn notify(&self, _notice: &Notice) {}
}

#[derive(Debug, Clone, Default)]
/// Notification service that records every notice in order.
pub struct MemoryNotificationService {
    delivered: Rc<RefCell<Vec<Notice>>>,
}

impl MemoryNotificationService {
    /// Returns all notices delivered so far.
    pub fn delivered(&self) -> Vec<Notice> {
        self.delivered.borrow().clone()
    }

    /// Returns the most recent notice, if any.
    pub fn last(&self) -> Option<Notice> {
        self.delivered.borrow().last().cloned()
    }

    /// Drains and returns all recorded notices.
    pub fn take(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.delivered.borrow_mut())
    }
}

impl NotificationService for MemoryNotificationService {
    fn notify(&self, notice: &Notice) {
        self.delivered.borrow_mut().push(notice.clone());
    }
}
