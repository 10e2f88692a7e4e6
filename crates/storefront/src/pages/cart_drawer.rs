//! Cart drawer view model and actions.

use serde::Serialize;

use serenity_core::types::ItemId;

use super::cards::resolve_image;
use crate::cart::CartLine;
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLineView {
    pub id: ItemId,
    pub title: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub total: String,
    pub count: u32,
    pub is_empty: bool,
}

/// The slide-out cart. Stateless apart from the shared [`CartStore`](crate::cart::CartStore).
#[derive(Debug, Clone)]
pub struct CartDrawer {
    state: AppState,
}

impl CartDrawer {
    #[must_use]
    pub fn new(state: &AppState) -> Self {
        Self {
            state: state.clone(),
        }
    }

    #[must_use]
    pub fn view(&self) -> CartView {
        let cart = self.state.cart().snapshot();
        let client = self.state.client();
        let lines = cart
            .lines()
            .into_iter()
            .map(|CartLine { item, quantity, line_total }| CartLineView {
                image_url: resolve_image(client, item.image.as_deref()),
                unit_price: item.price.display(),
                line_total: line_total.display(),
                id: item.id,
                title: item.title,
                quantity,
            })
            .collect();

        CartView {
            lines,
            total: cart.total().display(),
            count: cart.count(),
            is_empty: cart.is_empty(),
        }
    }

    pub fn remove(&self, id: &ItemId) {
        self.state.cart().remove_from_cart(id);
    }

    pub fn reduce(&self, id: &ItemId) {
        self.state.cart().reduce_quantity(id);
    }

    /// Add another unit of an item already in the cart. Unknown ids are
    /// ignored.
    pub fn add_one(&self, id: &ItemId) {
        let cart = self.state.cart();
        if let Some(line) = cart.lines().into_iter().find(|l| &l.item.id == id) {
            cart.add_to_cart(line.item);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serenity_core::types::Price;

    use super::*;
    use crate::cart::{CartItem, CartMode};
    use crate::state::test_support::offline_state;

    fn massage() -> CartItem {
        CartItem {
            id: ItemId::service("7"),
            title: "Swedish Massage".to_string(),
            price: Price::from_naira(1_234_567),
            image: Some("img/swedish.png".to_string()),
        }
    }

    #[test]
    fn test_empty_view() {
        let (state, _toasts) = offline_state(CartMode::Slots);
        let view = CartDrawer::new(&state).view();
        assert!(view.is_empty);
        assert_eq!(view.total, "₦0");
        assert_eq!(view.count, 0);
    }

    #[test]
    fn test_view_groups_and_formats() {
        let (state, _toasts) = offline_state(CartMode::Slots);
        state.cart().add_to_cart(massage());
        state.cart().add_to_cart(massage());

        let view = CartDrawer::new(&state).view();
        assert_eq!(view.count, 2);
        assert_eq!(view.lines.len(), 1);
        let line = &view.lines[0];
        assert_eq!(line.quantity, 2);
        assert_eq!(line.unit_price, "₦1,234,567");
        assert_eq!(line.line_total, "₦2,469,134");
        assert_eq!(
            line.image_url.as_deref(),
            Some("http://127.0.0.1:9/storage/img/swedish.png")
        );
        assert_eq!(view.total, "₦2,469,134");
    }

    #[test]
    fn test_actions_delegate_to_store() {
        for mode in [CartMode::Slots, CartMode::Merged] {
            let (state, _toasts) = offline_state(mode);
            let drawer = CartDrawer::new(&state);
            let id = ItemId::service("7");
            state.cart().add_to_cart(massage());

            drawer.add_one(&id);
            assert_eq!(state.cart().quantity_of(&id), 2);
            drawer.reduce(&id);
            assert_eq!(state.cart().quantity_of(&id), 1);
            drawer.add_one(&ItemId::service("unknown"));
            assert_eq!(state.cart().cart_count(), 1);
            drawer.remove(&id);
            assert!(drawer.view().is_empty);
        }
    }
}
