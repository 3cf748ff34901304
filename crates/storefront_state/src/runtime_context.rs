//! Reactive bridge between the stores and leptos components.
//!
//! [`StorefrontRuntime`] is built once at the application root and passed to components as a
//! prop. It owns the [`Storefront`] in a `StoredValue`, mirrors each snapshot into signals after
//! every operation, and turns notices into dismissible toasts. Notices are queued while a store
//! is mutating and flushed afterwards, so toast subscribers never observe a store mid-update.

use std::{cell::RefCell, rc::Rc};

use leptos::{
    create_rw_signal, logging, store_value, RwSignal, SignalGetUntracked, SignalSet,
    SignalUpdate, SignalWith, StoredValue,
};
use platform_host::{HostServices, Notice, NotificationService};

use crate::{
    cart::CartStore,
    config::{ConfigError, StorefrontConfig},
    model::{CartLineItem, CartState, LineKey, ProductSummary, ViewedProduct},
    pricing::OrderSummary,
    reducer::CartError,
    storefront::Storefront,
    validation::ValidationError,
};

/// Toasts kept on screen at once; older ones are dropped first.
pub const MAX_VISIBLE_TOASTS: usize = 3;

#[derive(Debug, Clone, PartialEq)]
/// A notice awaiting display or dismissal.
pub struct Toast {
    /// Stable id used to dismiss the toast.
    pub id: u64,
    /// Notice content.
    pub notice: Notice,
}

#[derive(Clone)]
struct NoticeQueue {
    pending: Rc<RefCell<Vec<Notice>>>,
    forward: Rc<dyn NotificationService>,
}

impl NoticeQueue {
    fn new(forward: Rc<dyn NotificationService>) -> Self {
        Self {
            pending: Rc::new(RefCell::new(Vec::new())),
            forward,
        }
    }

    fn drain(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.pending.borrow_mut())
    }
}

impl NotificationService for NoticeQueue {
    fn notify(&self, notice: &Notice) {
        self.forward.notify(notice);
        self.pending.borrow_mut().push(notice.clone());
    }
}

#[derive(Clone, Copy)]
/// Reactive handle over the storefront stores.
pub struct StorefrontRuntime {
    /// Latest cart snapshot.
    pub cart: RwSignal<CartState>,
    /// Latest recently-viewed list, newest first.
    pub recently_viewed: RwSignal<Vec<ViewedProduct>>,
    /// Toasts currently on screen, oldest first.
    pub toasts: RwSignal<Vec<Toast>>,
    store: StoredValue<Storefront>,
    queue: StoredValue<NoticeQueue>,
    next_toast_id: StoredValue<u64>,
}

impl StorefrontRuntime {
    /// Builds the stores, restores persisted state, and seeds the signals.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `config` is invalid.
    pub fn new(services: &HostServices, config: StorefrontConfig) -> Result<Self, ConfigError> {
        let queue = NoticeQueue::new(Rc::clone(&services.notifications));
        let mut storefront =
            Storefront::with_notifications(services, Rc::new(queue.clone()), config)?;
        let recent = storefront.recently_viewed.list_recent();
        let cart = storefront.cart.snapshot().clone();

        Ok(Self {
            cart: create_rw_signal(cart),
            recently_viewed: create_rw_signal(recent),
            toasts: create_rw_signal(Vec::new()),
            store: store_value(storefront),
            queue: store_value(queue),
            next_toast_id: store_value(0),
        })
    }

    /// Builds the runtime over the compile-time selected host adapters.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `config` is invalid.
    pub fn from_selected_host(config: StorefrontConfig) -> Result<Self, ConfigError> {
        let services = platform_host_web::build_host_services();
        logging::log!(
            "storefront runtime using {} host",
            services.host_strategy.as_str()
        );
        Self::new(&services, config)
    }

    pub fn add_item(&self, item: CartLineItem) {
        self.with_cart(|cart| {
            cart.add_item(item);
        });
    }

    /// # Errors
    ///
    /// Returns [`CartError::NotFound`] when the line is absent.
    pub fn remove_item(&self, key: &LineKey) -> Result<(), CartError> {
        self.with_cart(|cart| cart.remove_item(key).map(|_| ()))
            .unwrap_or(Ok(()))
    }

    /// # Errors
    ///
    /// Returns [`CartError`] for invalid quantities or unknown lines.
    pub fn update_quantity(&self, key: &LineKey, quantity: i64) -> Result<(), CartError> {
        self.with_cart(|cart| cart.update_quantity(key, quantity).map(|_| ()))
            .unwrap_or(Ok(()))
    }

    pub fn clear_cart(&self) {
        self.with_cart(|cart| {
            cart.clear_cart();
        });
    }

    /// Records a product view and refreshes [`Self::recently_viewed`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when `product` fails the schema.
    pub fn record_view(&self, product: ProductSummary) -> Result<(), ValidationError> {
        let outcome = self
            .store
            .try_update_value(|storefront| storefront.recently_viewed.record_view(product));
        let result = match outcome {
            Some(Ok(entries)) => {
                self.recently_viewed.set(entries);
                Ok(())
            }
            Some(Err(err)) => Err(err),
            None => {
                logging::warn!("storefront runtime disposed; view not recorded");
                Ok(())
            }
        };
        self.flush_notices();
        result
    }

    /// Re-reads the recently-viewed list from storage.
    pub fn refresh_recently_viewed(&self) {
        if let Some(entries) = self
            .store
            .try_update_value(|storefront| storefront.recently_viewed.list_recent())
        {
            self.recently_viewed.set(entries);
        }
        self.flush_notices();
    }

    /// Units in the cart; tracked, for badge rendering.
    pub fn item_count(&self) -> u64 {
        self.cart.with(CartState::item_count)
    }

    pub fn order_summary(&self) -> OrderSummary {
        let flat_shipping = self.store.with_value(|storefront| storefront.config().flat_shipping);
        self.cart
            .with(|cart| OrderSummary::for_cart(cart, flat_shipping))
    }

    /// Removes a toast; unknown ids are ignored.
    pub fn dismiss_toast(&self, id: u64) {
        self.toasts.update(|toasts| toasts.retain(|toast| toast.id != id));
    }

    fn with_cart<O>(&self, f: impl FnOnce(&mut CartStore) -> O) -> Option<O> {
        let outcome = self.store.try_update_value(|storefront| {
            let outcome = f(&mut storefront.cart);
            (outcome, storefront.cart.snapshot().clone())
        });
        let outcome = outcome.map(|(outcome, snapshot)| {
            if self.cart.get_untracked() != snapshot {
                self.cart.set(snapshot);
            }
            outcome
        });
        if outcome.is_none() {
            logging::warn!("storefront runtime disposed; cart operation dropped");
        }
        self.flush_notices();
        outcome
    }

    fn flush_notices(&self) {
        let notices = self.queue.with_value(NoticeQueue::drain);
        if notices.is_empty() {
            return;
        }

        let mut toasts = self.toasts.get_untracked();
        for notice in notices {
            let id = self.next_toast_id.get_value();
            self.next_toast_id.set_value(id + 1);
            toasts.push(Toast { id, notice });
        }
        let overflow = toasts.len().saturating_sub(MAX_VISIBLE_TOASTS);
        toasts.drain(..overflow);
        self.toasts.set(toasts);
    }
}

#[cfg(test)]
mod tests {
    use leptos::create_runtime;
    use platform_host::{MemoryPrefsStore, NoticeLevel, NoopNotificationService, PrefsStore};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{ProductId, ProductImage};

    fn tee() -> CartLineItem {
        CartLineItem::new(ProductId(1), "Tee", 35.0, 1, "/tee.jpg").with_size("M")
    }

    fn services(prefs: &MemoryPrefsStore) -> HostServices {
        HostServices::new(
            Rc::new(prefs.clone()),
            Rc::new(NoopNotificationService),
            platform_host::HostStrategy::Memory,
        )
    }

    #[test]
    fn cart_operations_update_signals_and_toasts() {
        let owner = create_runtime();
        let prefs = MemoryPrefsStore::default();
        let runtime =
            StorefrontRuntime::new(&services(&prefs), StorefrontConfig::default()).expect("runtime");

        runtime.add_item(tee());
        runtime.add_item(tee());
        assert_eq!(runtime.cart.get_untracked().total, 70.0);
        assert_eq!(runtime.item_count(), 2);
        assert_eq!(runtime.order_summary().total, 80.0);

        let err = runtime
            .update_quantity(&LineKey::new(ProductId(1)).with_size("M"), 0)
            .expect_err("invalid");
        assert_eq!(err, CartError::InvalidQuantity { quantity: 0 });

        let toasts = runtime.toasts.get_untracked();
        assert_eq!(toasts.len(), 3);
        assert_eq!(toasts[2].notice.level, NoticeLevel::Warning);

        runtime.dismiss_toast(toasts[0].id);
        assert_eq!(runtime.toasts.get_untracked().len(), 2);

        runtime.clear_cart();
        runtime.clear_cart();
        let toasts = runtime.toasts.get_untracked();
        assert_eq!(toasts.len(), MAX_VISIBLE_TOASTS);
        assert_eq!(toasts[2].notice.title, "Cart Cleared");
        assert!(runtime.cart.get_untracked().is_empty());

        owner.dispose();
    }

    #[test]
    fn runtime_restores_persisted_state_on_construction() {
        let owner = create_runtime();
        let prefs = MemoryPrefsStore::default();
        {
            let first =
                StorefrontRuntime::new(&services(&prefs), StorefrontConfig::default()).expect("first");
            first.add_item(tee());
            first
                .record_view(ProductSummary {
                    product_id: ProductId(3),
                    name: "Wool Blend Sweater".into(),
                    unit_price: 89.99,
                    rating: 4.7,
                    category: "clothing".into(),
                    images: vec![ProductImage {
                        id: 3001,
                        url: "/sweater.jpg".into(),
                        alt: "Sweater".into(),
                    }],
                })
                .expect("record");
        }
        assert!(prefs.load_pref("cart").expect("load").is_some());

        let second =
            StorefrontRuntime::new(&services(&prefs), StorefrontConfig::default()).expect("second");
        assert_eq!(second.cart.get_untracked().total, 35.0);
        assert_eq!(second.recently_viewed.get_untracked()[0].product_id, ProductId(3));
        assert!(second.toasts.get_untracked().is_empty());

        owner.dispose();
    }

    #[test]
    fn selected_host_runtime_starts_empty() {
        let owner = create_runtime();
        let runtime =
            StorefrontRuntime::from_selected_host(StorefrontConfig::default()).expect("runtime");
        assert!(runtime.cart.get_untracked().is_empty());
        assert!(runtime.recently_viewed.get_untracked().is_empty());
        owner.dispose();
    }
}
