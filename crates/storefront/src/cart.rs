//! In-memory cart shared by the catalog pages, the cart drawer and the
//! reservation page.
//!
//! [`CartStore`] is an explicitly constructed container; clones share the
//! same cart. Every mutation is applied and then broadcast to subscribers
//! through a `watch` channel, so readers never see a half-applied change.
//! Nothing is persisted.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::debug;

use serenity_core::types::{ItemId, Price};

/// Something bookable: a service or a package, captured at add time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ItemId,
    pub title: String,
    /// Unit price when the item was added.
    pub price: Price,
    /// Relative image path, if the item has one.
    pub image: Option<String>,
}

/// How repeated adds of the same item are stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CartMode {
    /// Every add appends a separate entry (one booking slot per add).
    #[default]
    Slots,
    /// Repeated adds of an identical item share one entry with a quantity
    /// counter. An add at a different price or title starts a new entry.
    Merged,
}

/// Unknown `SERENITY_CART_MODE` value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown cart mode '{0}', expected 'slots' or 'merged'")]
pub struct ParseCartModeError(String);

impl FromStr for CartMode {
    type Err = ParseCartModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "slots" | "slot" => Ok(Self::Slots),
            "merged" | "merge" => Ok(Self::Merged),
            other => Err(ParseCartModeError(other.to_string())),
        }
    }
}

impl fmt::Display for CartMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Slots => write!(f, "slots"),
            Self::Merged => write!(f, "merged"),
        }
    }
}

/// One stored entry. In [`CartMode::Slots`] the quantity is always 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartEntry {
    pub item: CartItem,
    pub quantity: u32,
}

/// Entries grouped by item id for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLine {
    pub item: CartItem,
    pub quantity: u32,
    pub line_total: Price,
}

/// Cart contents at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    mode: CartMode,
    entries: Vec<CartEntry>,
}

impl Cart {
    #[must_use]
    pub const fn new(mode: CartMode) -> Self {
        Self {
            mode,
            entries: Vec::new(),
        }
    }

    #[must_use]
    pub const fn mode(&self) -> CartMode {
        self.mode
    }

    /// Raw entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of units in the cart.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.entries.iter().map(|e| e.quantity).sum()
    }

    /// Sum of the unit prices of every unit; zero when empty.
    #[must_use]
    pub fn total(&self) -> Price {
        self.entries.iter().map(|e| e.item.price * e.quantity).sum()
    }

    /// Units of `id` in the cart.
    #[must_use]
    pub fn quantity_of(&self, id: &ItemId) -> u32 {
        self.entries
            .iter()
            .filter(|e| &e.item.id == id)
            .map(|e| e.quantity)
            .sum()
    }

    /// Entries grouped by id, in order of first appearance.
    #[must_use]
    pub fn lines(&self) -> Vec<CartLine> {
        let mut lines: Vec<CartLine> = Vec::new();
        for entry in &self.entries {
            let subtotal = entry.item.price * entry.quantity;
            if let Some(line) = lines.iter_mut().find(|l| l.item.id == entry.item.id) {
                line.quantity += entry.quantity;
                line.line_total = line.line_total + subtotal;
            } else {
                lines.push(CartLine {
                    item: entry.item.clone(),
                    quantity: entry.quantity,
                    line_total: subtotal,
                });
            }
        }
        lines
    }

    fn add(&mut self, item: CartItem) {
        if self.mode == CartMode::Merged
            && let Some(entry) = self.entries.iter_mut().find(|e| e.item == item)
        {
            entry.quantity += 1;
            return;
        }
        self.entries.push(CartEntry { item, quantity: 1 });
    }

    fn remove(&mut self, id: &ItemId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| &e.item.id != id);
        self.entries.len() != before
    }

    fn reduce(&mut self, id: &ItemId) -> bool {
        let Some(idx) = self.entries.iter().position(|e| &e.item.id == id) else {
            return false;
        };
        let exhausted = self.entries.get_mut(idx).is_some_and(|entry| {
            entry.quantity = entry.quantity.saturating_sub(1);
            entry.quantity == 0
        });
        if exhausted {
            self.entries.remove(idx);
        }
        true
    }

    fn clear(&mut self) -> bool {
        let changed = !self.entries.is_empty();
        self.entries.clear();
        changed
    }
}

/// Shared, observable cart.
#[derive(Debug, Clone)]
pub struct CartStore {
    state: Arc<watch::Sender<Cart>>,
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new(CartMode::default())
    }
}

impl CartStore {
    /// An empty cart.
    #[must_use]
    pub fn new(mode: CartMode) -> Self {
        let (state, _) = watch::channel(Cart::new(mode));
        Self {
            state: Arc::new(state),
        }
    }

    /// Receiver that observes every change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.state.subscribe()
    }

    /// Clone of the current contents.
    #[must_use]
    pub fn snapshot(&self) -> Cart {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn mode(&self) -> CartMode {
        self.state.borrow().mode()
    }

    /// Add one unit of `item`. Always succeeds.
    pub fn add_to_cart(&self, item: CartItem) {
        debug!(id = %item.id, title = %item.title, "Adding to cart");
        self.state.send_modify(|cart| cart.add(item));
    }

    /// Remove every unit of `id`. Unknown ids are ignored.
    pub fn remove_from_cart(&self, id: &ItemId) {
        if self.state.send_if_modified(|cart| cart.remove(id)) {
            debug!(id = %id, "Removed from cart");
        }
    }

    /// Remove one unit of `id`. Unknown ids are ignored.
    pub fn reduce_quantity(&self, id: &ItemId) {
        if self.state.send_if_modified(|cart| cart.reduce(id)) {
            debug!(id = %id, "Reduced cart quantity");
        }
    }

    /// Empty the cart.
    pub fn clear(&self) {
        if self.state.send_if_modified(Cart::clear) {
            debug!("Cart cleared");
        }
    }

    #[must_use]
    pub fn cart_total(&self) -> Price {
        self.state.borrow().total()
    }

    #[must_use]
    pub fn cart_count(&self) -> u32 {
        self.state.borrow().count()
    }

    #[must_use]
    pub fn lines(&self) -> Vec<CartLine> {
        self.state.borrow().lines()
    }

    #[must_use]
    pub fn quantity_of(&self, id: &ItemId) -> u32 {
        self.state.borrow().quantity_of(id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.borrow().is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn package(id: &str, naira: i64) -> CartItem {
        CartItem {
            id: ItemId::package(id),
            title: format!("Package {id}"),
            price: Price::from_naira(naira),
            image: None,
        }
    }

    fn item(id: &str, naira: i64) -> CartItem {
        CartItem {
            id: ItemId::service(id),
            title: format!("Item {id}"),
            price: Price::from_naira(naira),
            image: None,
        }
    }

    fn both_modes() -> [CartStore; 2] {
        [CartStore::new(CartMode::Slots), CartStore::new(CartMode::Merged)]
    }

    #[test]
    fn test_empty_cart() {
        let store = CartStore::default();
        assert_eq!(store.cart_count(), 0);
        assert_eq!(store.cart_total(), Price::ZERO);
        assert!(store.is_empty());
        assert!(store.lines().is_empty());
    }

    #[test]
    fn test_add_twice_shows_quantity_two() {
        for store in both_modes() {
            store.add_to_cart(item("1", 15_000));
            store.add_to_cart(item("1", 15_000));

            assert_eq!(store.cart_count(), 2);
            assert_eq!(store.cart_total(), Price::from_naira(30_000));
            assert_eq!(store.quantity_of(&ItemId::service("1")), 2);

            let lines = store.lines();
            assert_eq!(lines.len(), 1);
            assert_eq!(lines[0].quantity, 2);
            assert_eq!(lines[0].line_total, Price::from_naira(30_000));
        }
    }

    #[test]
    fn test_price_change_between_adds_counts_both_prices() {
        for store in both_modes() {
            store.add_to_cart(item("3", 10_000));
            store.add_to_cart(item("3", 12_000));

            assert_eq!(store.cart_count(), 2, "{}", store.mode());
            assert_eq!(store.cart_total(), Price::from_naira(22_000), "{}", store.mode());
            let lines = store.lines();
            assert_eq!(lines.len(), 1);
            assert_eq!(lines[0].quantity, 2);
            assert_eq!(lines[0].line_total, Price::from_naira(22_000));

            store.reduce_quantity(&ItemId::service("3"));
            assert_eq!(store.cart_total(), Price::from_naira(12_000), "{}", store.mode());
        }
    }

    #[test]
    fn test_merged_mode_splits_entries_on_new_price() {
        let store = CartStore::new(CartMode::Merged);
        store.add_to_cart(item("3", 10_000));
        store.add_to_cart(item("3", 10_000));
        store.add_to_cart(item("3", 12_000));
        let cart = store.snapshot();
        let quantities: Vec<u32> = cart.entries().iter().map(|e| e.quantity).collect();
        assert_eq!(quantities, vec![2, 1]);
    }

    #[test]
    fn test_service_and_package_with_same_id_stay_apart() {
        for store in both_modes() {
            store.add_to_cart(item("3", 5_000));
            store.add_to_cart(package("3", 40_000));

            let lines = store.lines();
            assert_eq!(lines.len(), 2);
            assert_eq!(lines[0].item.title, "Item 3");
            assert_eq!(lines[0].quantity, 1);
            assert_eq!(lines[1].item.title, "Package 3");

            store.remove_from_cart(&ItemId::service("3"));
            assert_eq!(store.cart_count(), 1);
            assert_eq!(store.cart_total(), Price::from_naira(40_000));
            assert_eq!(store.quantity_of(&ItemId::package("3")), 1);
        }
    }

    #[test]
    fn test_slots_mode_appends_entries() {
        let store = CartStore::new(CartMode::Slots);
        store.add_to_cart(item("1", 100));
        store.add_to_cart(item("1", 100));
        let cart = store.snapshot();
        assert_eq!(cart.entries().len(), 2);
        assert!(cart.entries().iter().all(|e| e.quantity == 1));
    }

    #[test]
    fn test_merged_mode_counts_quantity() {
        let store = CartStore::new(CartMode::Merged);
        store.add_to_cart(item("1", 100));
        store.add_to_cart(item("1", 100));
        let cart = store.snapshot();
        assert_eq!(cart.entries().len(), 1);
        assert_eq!(cart.entries()[0].quantity, 2);
    }

    #[test]
    fn test_count_and_total_after_mixed_adds() {
        for store in both_modes() {
            store.add_to_cart(item("a", 5_000));
            store.add_to_cart(item("b", 12_500));
            store.add_to_cart(item("a", 5_000));
            assert_eq!(store.cart_count(), 3);
            assert_eq!(store.cart_total(), Price::from_naira(22_500));

            let lines = store.lines();
            let ids: Vec<_> = lines.iter().map(|l| l.item.id.as_str()).collect();
            assert_eq!(ids, vec!["a", "b"]);
        }
    }

    #[test]
    fn test_remove_drops_every_unit() {
        for store in both_modes() {
            store.add_to_cart(item("a", 10));
            store.add_to_cart(item("a", 10));
            store.add_to_cart(item("b", 20));
            store.remove_from_cart(&ItemId::service("a"));
            assert_eq!(store.cart_count(), 1);
            assert_eq!(store.quantity_of(&ItemId::service("a")), 0);
            assert_eq!(store.cart_total(), Price::from_naira(20));
        }
    }

    #[test]
    fn test_reduce_removes_one_unit() {
        for store in both_modes() {
            store.add_to_cart(item("a", 10));
            store.add_to_cart(item("a", 10));
            store.reduce_quantity(&ItemId::service("a"));
            assert_eq!(store.quantity_of(&ItemId::service("a")), 1);
            store.reduce_quantity(&ItemId::service("a"));
            assert!(store.is_empty());
            store.reduce_quantity(&ItemId::service("a"));
            assert!(store.is_empty());
        }
    }

    #[test]
    fn test_unknown_id_is_noop_and_silent() {
        let store = CartStore::default();
        store.add_to_cart(item("a", 10));
        let mut rx = store.subscribe();
        let _ = rx.borrow_and_update();

        store.remove_from_cart(&ItemId::service("zzz"));
        store.reduce_quantity(&ItemId::service("zzz"));

        assert!(!rx.has_changed().unwrap());
        assert_eq!(store.cart_count(), 1);
    }

    #[test]
    fn test_subscribers_see_each_mutation() {
        let store = CartStore::default();
        let mut rx = store.subscribe();

        store.add_to_cart(item("a", 10));
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().count(), 1);

        store.clear();
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_empty());
    }

    #[test]
    fn test_clones_share_state() {
        let store = CartStore::default();
        let other = store.clone();
        other.add_to_cart(item("a", 10));
        assert_eq!(store.cart_count(), 1);
    }

    #[test]
    fn test_separate_stores_are_independent() {
        let first = CartStore::default();
        let second = CartStore::default();
        first.add_to_cart(item("a", 10));
        assert!(second.is_empty());
    }

    #[test]
    fn test_cart_mode_parse() {
        assert_eq!("merged".parse::<CartMode>().unwrap(), CartMode::Merged);
        assert_eq!(" Slots ".parse::<CartMode>().unwrap(), CartMode::Slots);
        assert!("bogus".parse::<CartMode>().is_err());
    }
}
