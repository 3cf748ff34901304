//! Application-root composition of the cart and recently-viewed stores.

use std::rc::Rc;

use platform_host::{HostServices, NotificationService, PrefsStore, ScopedPrefsStore};

use crate::{
    cart::CartStore,
    config::{ConfigError, StorefrontConfig},
    pricing::OrderSummary,
    recently_viewed::RecentlyViewedCache,
};

/// Both persisted stores, built once at the application root and handed to consumers by
/// reference.
pub struct Storefront {
    pub cart: CartStore,
    pub recently_viewed: RecentlyViewedCache,
    config: StorefrontConfig,
}

impl Storefront {
    /// Validates `config`, applies the storage scope, and restores the cart.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `config` is invalid; no store is created.
    pub fn new(services: &HostServices, config: StorefrontConfig) -> Result<Self, ConfigError> {
        Self::with_notifications(services, Rc::clone(&services.notifications), config)
    }

    /// Like [`Storefront::new`], but routes notices through `notifications` instead of the
    /// host bundle's service.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `config` is invalid.
    pub fn with_notifications(
        services: &HostServices,
        notifications: Rc<dyn NotificationService>,
        config: StorefrontConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let prefs: Rc<dyn PrefsStore> = match config.storage_scope.as_deref() {
            Some(scope) => Rc::new(ScopedPrefsStore::new(scope, Rc::clone(&services.prefs))),
            None => Rc::clone(&services.prefs),
        };

        Ok(Self {
            cart: CartStore::restore(
                Rc::clone(&prefs),
                Rc::clone(&notifications),
                config.cart_key.clone(),
            ),
            recently_viewed: RecentlyViewedCache::new(
                prefs,
                notifications,
                config.recently_viewed_key.clone(),
            ),
            config,
        })
    }

    pub fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    /// Checkout totals using the configured shipping fee.
    pub fn order_summary(&self) -> OrderSummary {
        self.cart.order_summary(self.config.flat_shipping)
    }
}
