//! User-facing notice contracts and lightweight adapters.

mod service;

pub use service::{
    MemoryNotificationService, Notice, NoticeLevel, NoopNotificationService, NotificationService,
};
