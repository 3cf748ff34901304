//! Cart store: owns [`CartState`], runs reducer effects, and broadcasts snapshots.

use std::rc::Rc;

use leptos::logging;
use platform_host::{NotificationService, PrefsStore};

use crate::{
    model::{CartLineItem, CartPhase, CartState, LineKey},
    persistence,
    pricing::OrderSummary,
    reducer::{reduce_cart, CartAction, CartEffect, CartError},
};

/// Handle returned by [`CartStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&CartState)>;

/// Single owner of the cart state and its `cart` storage key.
///
/// Mutations are strictly serialized through `&mut self`. Persistence failures are logged and
/// the session continues in memory.
pub struct CartStore {
    state: CartState,
    prefs: Rc<dyn PrefsStore>,
    notifications: Rc<dyn NotificationService>,
    key: String,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl CartStore {
    /// Creates an empty store without touching storage.
    pub fn new(
        prefs: Rc<dyn PrefsStore>,
        notifications: Rc<dyn NotificationService>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            state: CartState::default(),
            prefs,
            notifications,
            key: key.into(),
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Creates a store and rebuilds its state from the persisted snapshot.
    ///
    /// Restoring emits no notices and does not rewrite storage. Missing or corrupt snapshots
    /// yield an empty cart.
    pub fn restore(
        prefs: Rc<dyn PrefsStore>,
        notifications: Rc<dyn NotificationService>,
        key: impl Into<String>,
    ) -> Self {
        let mut store = Self::new(prefs, notifications, key);
        match persistence::load_cart_items(store.prefs.as_ref(), &store.key) {
            Ok(Some(items)) => {
                if let Err(err) = reduce_cart(&mut store.state, CartAction::Hydrate { items }) {
                    logging::warn!("cart hydrate failed: {err}");
                }
            }
            Ok(None) => {}
            Err(err) => logging::warn!("cart restore failed, starting empty: {err}"),
        }
        store
    }

    /// Current state for rendering.
    pub fn snapshot(&self) -> &CartState {
        &self.state
    }

    pub fn phase(&self) -> CartPhase {
        self.state.phase()
    }

    /// Units across all lines, for the cart badge.
    pub fn item_count(&self) -> u64 {
        self.state.item_count()
    }

    pub fn order_summary(&self, flat_shipping: f64) -> OrderSummary {
        OrderSummary::for_cart(&self.state, flat_shipping)
    }

    /// Adds `item`, merging with an existing line of the same identity. Never fails.
    pub fn add_item(&mut self, item: CartLineItem) -> &CartState {
        if let Err(err) = self.dispatch(CartAction::AddItem(item)) {
            logging::warn!("cart add rejected: {err}");
        }
        &self.state
    }

    /// Removes the line identified by `key`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotFound`] when no such line exists; the state is unchanged.
    pub fn remove_item(&mut self, key: &LineKey) -> Result<&CartState, CartError> {
        self.dispatch(CartAction::RemoveItem { key: key.clone() })
    }

    /// Replaces the quantity of the line identified by `key`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] for `quantity < 1` and [`CartError::NotFound`]
    /// for unknown lines; the state is unchanged in both cases.
    pub fn update_quantity(
        &mut self,
        key: &LineKey,
        quantity: i64,
    ) -> Result<&CartState, CartError> {
        self.dispatch(CartAction::UpdateQuantity {
            key: key.clone(),
            quantity,
        })
    }

    /// Resets to the empty cart.
    pub fn clear_cart(&mut self) -> &CartState {
        if let Err(err) = self.dispatch(CartAction::ClearCart) {
            logging::warn!("cart clear rejected: {err}");
        }
        &self.state
    }

    /// Registers `listener` to receive the snapshot after every successful mutation.
    ///
    /// Listeners must not call back into the store.
    pub fn subscribe(&mut self, listener: impl FnMut(&CartState) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener; returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    fn dispatch(&mut self, action: CartAction) -> Result<&CartState, CartError> {
        let mut next = self.state.clone();
        match reduce_cart(&mut next, action) {
            Ok(effects) => {
                self.state = next;
                for effect in effects {
                    self.run_effect(effect);
                }
                self.broadcast();
                Ok(&self.state)
            }
            Err(err) => {
                logging::warn!("cart reducer error: {err}");
                self.notifications.notify(&err.notice());
                Err(err)
            }
        }
    }

    fn run_effect(&self, effect: CartEffect) {
        match effect {
            CartEffect::PersistCart => {
                if let Err(err) =
                    persistence::persist_cart(self.prefs.as_ref(), &self.key, &self.state)
                {
                    logging::warn!("persist cart failed: {err}");
                }
            }
            CartEffect::Notify(notice) => self.notifications.notify(&notice),
        }
    }

    fn broadcast(&mut self) {
        for (_, listener) in &mut self.listeners {
            listener(&self.state);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use platform_host::{
        MemoryNotificationService, MemoryPrefsStore, NoticeLevel, PersistenceError,
    };
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::ProductId;

    #[derive(Debug, Default)]
    struct FullStore;

    impl PrefsStore for FullStore {
        fn load_pref(&self, _key: &str) -> Result<Option<String>, PersistenceError> {
            Ok(None)
        }

        fn save_pref(&self, _key: &str, _raw_json: &str) -> Result<(), PersistenceError> {
            Err(PersistenceError::QuotaExceeded)
        }

        fn delete_pref(&self, _key: &str) -> Result<(), PersistenceError> {
            Ok(())
        }
    }

    fn tee(quantity: u32) -> CartLineItem {
        CartLineItem::new(ProductId(1), "Tee", 35.0, quantity, "/tee.jpg")
            .with_size("M")
            .with_color("Black")
    }

    fn tee_key() -> LineKey {
        LineKey::new(ProductId(1)).with_size("M").with_color("Black")
    }

    fn store() -> (CartStore, MemoryPrefsStore, MemoryNotificationService) {
        let prefs = MemoryPrefsStore::default();
        let notices = MemoryNotificationService::default();
        let store = CartStore::restore(Rc::new(prefs.clone()), Rc::new(notices.clone()), "cart");
        (store, prefs, notices)
    }

    #[test]
    fn add_merge_remove_scenario() {
        let (mut store, prefs, notices) = store();

        assert_eq!(store.add_item(tee(1)).total, 35.0);
        let state = store.add_item(tee(2));
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].quantity, 3);
        assert_eq!(state.total, 105.0);

        let state = store.remove_item(&tee_key()).expect("remove");
        assert!(state.is_empty());
        assert_eq!(state.total, 0.0);
        assert_eq!(store.phase(), CartPhase::Empty);

        let titles = notices
            .delivered()
            .into_iter()
            .map(|n| n.title)
            .collect::<Vec<_>>();
        assert_eq!(titles, vec!["Added to Cart", "Added to Cart", "Removed from Cart"]);
        assert!(prefs.load_pref("cart").expect("load").is_some());
    }

    #[test]
    fn every_mutation_rewrites_full_snapshot() {
        let (mut store, prefs, _) = store();
        store.add_item(tee(1));
        store.add_item(CartLineItem::new(ProductId(2), "Mug", 12.5, 2, "/mug.jpg"));
        store.update_quantity(&tee_key(), 4).expect("update");

        let restored = CartStore::restore(
            Rc::new(prefs.clone()),
            Rc::new(MemoryNotificationService::default()),
            "cart",
        );
        assert_eq!(restored.snapshot(), store.snapshot());
        assert_eq!(restored.snapshot().total, 165.0);
    }

    #[test]
    fn restore_emits_no_notices_and_keeps_distinct_lines() {
        let prefs = MemoryPrefsStore::default();
        prefs
            .save_pref(
                "cart",
                r#"{"items":[
                    {"productId":1,"name":"Tee","unitPrice":35,"quantity":1,"imageUrl":"/t.jpg","size":"M","color":"Black"},
                    {"productId":1,"name":"Tee","unitPrice":35,"quantity":2,"imageUrl":"/t.jpg","size":"L","color":"Black"}
                ],"total":0}"#,
            )
            .expect("seed");
        let notices = MemoryNotificationService::default();
        let store = CartStore::restore(Rc::new(prefs), Rc::new(notices.clone()), "cart");

        assert_eq!(store.snapshot().items.len(), 2);
        assert_eq!(store.snapshot().total, 105.0);
        assert_eq!(store.item_count(), 3);
        assert!(notices.delivered().is_empty());
    }

    #[test]
    fn corrupt_snapshot_restores_empty() {
        let prefs = MemoryPrefsStore::default();
        prefs.save_pref("cart", "not json").expect("seed");
        let store = CartStore::restore(
            Rc::new(prefs),
            Rc::new(MemoryNotificationService::default()),
            "cart",
        );
        assert_eq!(store.snapshot(), &CartState::default());
    }

    #[test]
    fn rejected_mutations_warn_and_keep_state() {
        let (mut store, prefs, notices) = store();
        store.add_item(tee(2));
        let persisted = prefs.load_pref("cart").expect("load");
        notices.take();

        assert!(matches!(
            store.update_quantity(&tee_key(), 0),
            Err(CartError::InvalidQuantity { quantity: 0 })
        ));
        assert!(matches!(
            store.update_quantity(&tee_key(), -1),
            Err(CartError::InvalidQuantity { quantity: -1 })
        ));
        assert!(matches!(
            store.remove_item(&LineKey::new(ProductId(99))),
            Err(CartError::NotFound { .. })
        ));

        assert_eq!(store.snapshot().items[0].quantity, 2);
        assert_eq!(prefs.load_pref("cart").expect("load"), persisted);
        let levels = notices
            .delivered()
            .into_iter()
            .map(|n| n.level)
            .collect::<Vec<_>>();
        assert_eq!(levels, vec![NoticeLevel::Warning; 3]);
    }

    #[test]
    fn clear_twice_matches_clear_once() {
        let (mut store, _, notices) = store();
        store.add_item(tee(1));
        let once = store.clear_cart().clone();
        let twice = store.clear_cart().clone();
        assert_eq!(once, twice);
        assert_eq!(twice, CartState::default());
        assert_eq!(notices.last().map(|n| n.title), Some("Cart Cleared".to_string()));
    }

    #[test]
    fn listeners_receive_snapshots_until_unsubscribed() {
        let (mut store, _, _) = store();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let id = store.subscribe(move |state| sink.borrow_mut().push(state.total));

        store.add_item(tee(1));
        let _ = store.update_quantity(&tee_key(), 0);
        store.add_item(tee(1));
        assert!(store.unsubscribe(id));
        store.clear_cart();

        assert_eq!(*seen.borrow(), vec![35.0, 70.0]);
        assert!(!store.unsubscribe(id));
    }

    #[test]
    fn persistence_failure_keeps_in_memory_state() {
        let notices = MemoryNotificationService::default();
        let mut store = CartStore::restore(Rc::new(FullStore), Rc::new(notices.clone()), "cart");

        store.add_item(tee(1));
        store.add_item(tee(1));
        assert_eq!(store.snapshot().items[0].quantity, 2);
        assert_eq!(store.snapshot().total, 70.0);
        assert!(notices
            .delivered()
            .iter()
            .all(|n| n.level == NoticeLevel::Success));
    }

    #[test]
    fn invalid_price_is_ignored_and_saved_cart_survives_reload() {
        let (mut store, prefs, notices) = store();
        store.add_item(tee(2));
        let state = store.add_item(CartLineItem::new(ProductId(9), "Glitch", f64::NAN, 1, ""));
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.total, 70.0);
        assert_eq!(notices.last().map(|n| n.level), Some(NoticeLevel::Warning));

        let restored = CartStore::restore(
            Rc::new(prefs.clone()),
            Rc::new(MemoryNotificationService::default()),
            "cart",
        );
        assert_eq!(restored.snapshot().items.len(), 1);
        assert_eq!(restored.snapshot().items[0].product_id, ProductId(1));
        assert_eq!(restored.snapshot().total, 70.0);
    }

    #[test]
    fn order_summary_uses_flat_shipping() {
        let (mut store, _, _) = store();
        store.add_item(tee(3));
        let summary = store.order_summary(10.0);
        assert_eq!(summary.subtotal, 105.0);
        assert_eq!(summary.total, 115.0);
    }
}
