use std::rc::Rc;

use platform_host::{
    HostServices, HostStrategy, MemoryNotificationService, MemoryPrefsStore, Notice,
    NotificationService, PersistenceError, PrefsStore,
};

use crate::{WebConsoleNotificationService, WebPrefsStore};

/// Returns the compile-time selected host strategy for the active build.
pub const fn selected_host_strategy() -> HostStrategy {
    #[cfg(feature = "memory-host")]
    {
        HostStrategy::Memory
    }

    #[cfg(not(feature = "memory-host"))]
    {
        HostStrategy::Browser
    }
}

/// Returns the selected host strategy as a stable string token.
pub fn host_strategy_name() -> &'static str {
    selected_host_strategy().as_str()
}

/// Adapter enum that erases the concrete key-value backend behind [`PrefsStore`].
#[derive(Debug, Clone)]
pub enum PrefsStoreAdapter {
    /// Browser-backed `localStorage` persistence.
    Browser(WebPrefsStore),
    /// In-memory persistence for native builds and demos.
    Memory(MemoryPrefsStore),
}

impl PrefsStore for PrefsStoreAdapter {
    fn load_pref(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        match self {
            Self::Browser(store) => store.load_pref(key),
            Self::Memory(store) => store.load_pref(key),
        }
    }

    fn save_pref(&self, key: &str, raw_json: &str) -> Result<(), PersistenceError> {
        match self {
            Self::Browser(store) => store.save_pref(key, raw_json),
            Self::Memory(store) => store.save_pref(key, raw_json),
        }
    }

    fn delete_pref(&self, key: &str) -> Result<(), PersistenceError> {
        match self {
            Self::Browser(store) => store.delete_pref(key),
            Self::Memory(store) => store.delete_pref(key),
        }
    }
}

/// Adapter enum that erases the concrete notice surface behind [`NotificationService`].
#[derive(Debug, Clone)]
pub enum NotificationServiceAdapter {
    /// Browser console mirror.
    Browser(WebConsoleNotificationService),
    /// Recording service for native builds and demos.
    Memory(MemoryNotificationService),
}

impl NotificationService for NotificationServiceAdapter {
    fn notify(&self, notice: &Notice) {
        match self {
            Self::Browser(service) => service.notify(notice),
            Self::Memory(service) => service.notify(notice),
        }
    }
}

/// Builds the key-value adapter for the compile-time selected host strategy.
pub fn prefs_store() -> PrefsStoreAdapter {
    match selected_host_strategy() {
        HostStrategy::Browser => PrefsStoreAdapter::Browser(WebPrefsStore),
        HostStrategy::Memory => PrefsStoreAdapter::Memory(MemoryPrefsStore::default()),
    }
}

/// Builds the notice adapter for the compile-time selected host strategy.
pub fn notification_service() -> NotificationServiceAdapter {
    match selected_host_strategy() {
        HostStrategy::Browser => NotificationServiceAdapter::Browser(WebConsoleNotificationService),
        HostStrategy::Memory => {
            NotificationServiceAdapter::Memory(MemoryNotificationService::default())
        }
    }
}

/// Assembles the [`HostServices`] bundle handed to the storefront state core at the app root.
pub fn build_host_services() -> HostServices {
    HostServices::new(
        Rc::new(prefs_store()),
        Rc::new(notification_service()),
        selected_host_strategy(),
    )
}
