//! Process-local cart store.

use async_trait::async_trait;
use bookstore_core::{Cart, UserId};
use dashmap::DashMap;

use super::{CartStore, StoreError};

/// Cart store backed by a concurrent in-process map.
///
/// Carts live until the process exits; nothing is persisted.
#[derive(Debug, Default)]
pub struct InMemoryCartStore {
    carts: DashMap<UserId, Cart>,
}

impl InMemoryCartStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of users with a cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.carts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.carts.is_empty()
    }
}

#[async_trait]
impl CartStore for InMemoryCartStore {
    async fn get(&self, user_id: &UserId) -> Result<Option<Cart>, StoreError> {
        Ok(self.carts.get(user_id).map(|cart| cart.value().clone()))
    }

    async fn set(&self, user_id: &UserId, cart: Cart) -> Result<(), StoreError> {
        self.carts.insert(user_id.clone(), cart);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bookstore_core::{Price, ProductId};
    use rust_decimal::Decimal;

    use super::*;

    fn cart_with(product: &str) -> Cart {
        let mut cart = Cart::new();
        cart.add(ProductId::new(product), 1, Price::new(Decimal::ONE).unwrap())
            .unwrap();
        cart
    }

    #[tokio::test]
    async fn test_get_missing() {
        let store = InMemoryCartStore::new();
        assert!(store.get(&UserId::new("nobody")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let store = InMemoryCartStore::new();
        let user = UserId::new("alice");
        store.set(&user, cart_with("b1")).await.unwrap();

        let cart = store.get(&user).await.unwrap().unwrap();
        assert!(cart.get(&ProductId::new("b1")).is_some());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_set_replaces() {
        let store = InMemoryCartStore::new();
        let user = UserId::new("alice");
        store.set(&user, cart_with("b1")).await.unwrap();
        store.set(&user, cart_with("b2")).await.unwrap();

        let cart = store.get(&user).await.unwrap().unwrap();
        assert!(cart.get(&ProductId::new("b1")).is_none());
        assert!(cart.get(&ProductId::new("b2")).is_some());
    }

    #[tokio::test]
    async fn test_users_are_isolated() {
        let store = InMemoryCartStore::new();
        store.set(&UserId::new("alice"), cart_with("b1")).await.unwrap();

        assert!(store.get(&UserId::new("bob")).await.unwrap().is_none());
    }
}
