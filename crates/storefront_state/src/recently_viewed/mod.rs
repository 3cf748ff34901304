//! Persisted, bounded list of recently viewed products.
//!
//! Every read and write runs stored entries through the [`migrate`] chain, so legacy and
//! corrupted data heal on first contact. The migrated list is cached against the raw stored
//! text; an unchanged value is not migrated twice.

pub mod migrate;
pub mod mru;

use std::rc::Rc;

use leptos::logging;
use platform_host::{
    next_view_stamp_ms, unix_time_ms_now, NotificationService, PrefsStore,
};
use serde_json::Value;

use crate::{
    model::{ProductSummary, ViewedProduct},
    persistence,
    validation::{parse_product, validate_product, ValidationError},
};

pub use migrate::{migrate_entries, MigrationReport, LEGACY_IMAGE_ALT_FALLBACK};
pub use mru::{RecentlyViewedList, RECENTLY_VIEWED_CAPACITY};

#[derive(Debug, Clone)]
struct CachedList {
    /// Stored text the list was derived from (`None` when the key was absent).
    raw: Option<String>,
    list: RecentlyViewedList,
}

/// Store owning the `recentlyViewed` key.
pub struct RecentlyViewedCache {
    prefs: Rc<dyn PrefsStore>,
    notifications: Rc<dyn NotificationService>,
    key: String,
    cached: Option<CachedList>,
}

impl RecentlyViewedCache {
    pub fn new(
        prefs: Rc<dyn PrefsStore>,
        notifications: Rc<dyn NotificationService>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            prefs,
            notifications,
            key: key.into(),
            cached: None,
        }
    }

    /// Records a product view and returns the updated list, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when `product` fails the schema; nothing is stored and a
    /// warning notice is emitted.
    pub fn record_view(
        &mut self,
        product: ProductSummary,
    ) -> Result<Vec<ViewedProduct>, ValidationError> {
        if let Err(err) = validate_product(&product) {
            return Err(self.reject(err));
        }

        let (raw, mut list) = self.load();
        let viewed_at = next_view_stamp_ms()
            .max(list.newest_viewed_at().map_or(0, |at| at.saturating_add(1)));
        let evicted = list.promote(product.viewed_at(viewed_at));
        if !evicted.is_empty() {
            logging::log!(
                "recently viewed evicted {} entr{}",
                evicted.len(),
                if evicted.len() == 1 { "y" } else { "ies" }
            );
        }

        let entries = list.entries().to_vec();
        self.store(raw, list);
        Ok(entries)
    }

    /// Records a view from an untyped product value, as handed over by page glue.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when the value is not a valid product.
    pub fn record_view_value(&mut self, value: &Value) -> Result<Vec<ViewedProduct>, ValidationError> {
        match parse_product(value) {
            Ok(product) => self.record_view(product),
            Err(err) => Err(self.reject(err)),
        }
    }

    /// Returns up to [`RECENTLY_VIEWED_CAPACITY`] entries, newest first.
    ///
    /// Rewrites the stored value when migration changed it.
    pub fn list_recent(&mut self) -> Vec<ViewedProduct> {
        let (raw, list) = self.load();
        let entries = list.entries().to_vec();

        let stored_matches = raw
            .as_deref()
            .and_then(|text| serde_json::from_str::<Value>(text).ok())
            .is_some_and(|stored| serde_json::to_value(&entries).ok() == Some(stored));
        if raw.is_some() && !stored_matches {
            self.store(raw, list);
        } else {
            self.cached = Some(CachedList { raw, list });
        }
        entries
    }

    fn reject(&self, err: ValidationError) -> ValidationError {
        logging::warn!("recently viewed rejected product: {err}");
        self.notifications.notify(&err.notice());
        err
    }

    /// Reads the stored text and returns it with its migrated list.
    ///
    /// Falls back to the last in-memory list when storage is unreadable.
    fn load(&mut self) -> (Option<String>, RecentlyViewedList) {
        let raw = match self.prefs.load_pref(&self.key) {
            Ok(raw) => raw,
            Err(err) => {
                logging::warn!("recently viewed load failed: {err}");
                let cached = self.cached.clone();
                return cached
                    .map(|cached| (cached.raw, cached.list))
                    .unwrap_or_default();
            }
        };

        if let Some(cached) = self.cached.as_ref().filter(|cached| cached.raw == raw) {
            return (raw, cached.list.clone());
        }

        let list = match raw.as_deref() {
            None => RecentlyViewedList::default(),
            Some(text) => match serde_json::from_str::<Vec<Value>>(text) {
                Ok(stored) => {
                    let report = migrate_entries(&stored, unix_time_ms_now());
                    if report.migrated > 0 || report.discarded > 0 {
                        logging::log!(
                            "recently viewed migrated {} and discarded {} stored entries",
                            report.migrated,
                            report.discarded
                        );
                    }
                    RecentlyViewedList::from_entries(report.entries)
                }
                Err(err) => {
                    logging::warn!("recently viewed value is not a list, discarding: {err}");
                    RecentlyViewedList::default()
                }
            },
        };
        (raw, list)
    }

    /// Persists `list`; on failure keeps it in memory keyed to the unchanged stored text.
    fn store(&mut self, previous_raw: Option<String>, list: RecentlyViewedList) {
        let written = if list.is_empty() {
            self.prefs.delete_pref(&self.key).map(|()| None)
        } else {
            persistence::persist_recently_viewed(self.prefs.as_ref(), &self.key, list.entries())
                .map(Some)
        };

        let raw = match written {
            Ok(raw) => raw,
            Err(err) => {
                logging::warn!("persist recently viewed failed: {err}");
                previous_raw
            }
        };
        self.cached = Some(CachedList { raw, list });
    }
}
