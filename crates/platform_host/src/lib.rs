//! Typed host-domain contracts shared by the storefront state core and its browser adapters.
//!
//! This crate is the API-first boundary for platform services. It exposes the key-value
//! persistence contract used by the cart and recently-viewed stores, the user-facing notice
//! contract, and monotonic time helpers, while concrete browser adapters live in
//! `platform_host_web`.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod host;
pub mod notifications;
pub mod storage;
pub mod time;

pub use host::{HostServices, HostStrategy};
pub use notifications::{
    MemoryNotificationService, Notice, NoticeLevel, NoopNotificationService, NotificationService,
};
pub use storage::error::PersistenceError;
pub use storage::prefs::{
    load_pref_with, save_pref_with, MemoryPrefsStore, NoopPrefsStore, PrefsStore,
    ScopedPrefsStore,
};
pub use time::{next_view_stamp_ms, unix_time_ms_now};
