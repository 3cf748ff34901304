//! Browser (`wasm32`) implementations of [`platform_host`] service contracts.
//!
//! This crate is the concrete browser-side wiring layer for the storefront's durable key-value
//! storage (`window.localStorage`) and console-backed notice delivery. Native builds compile the
//! same adapters with inert browser calls so the workspace stays testable off-wasm.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

/// Compile-time host-strategy selection and concrete adapter factories for runtime wiring.
pub mod adapters;
/// Console-backed notice delivery.
pub mod notifications;
/// `localStorage` key-value persistence.
pub mod storage;

pub use adapters::{
    build_host_services, host_strategy_name, notification_service, prefs_store,
    selected_host_strategy, NotificationServiceAdapter, PrefsStoreAdapter,
};
pub use notifications::WebConsoleNotificationService;
pub use storage::local_prefs::WebPrefsStore;
