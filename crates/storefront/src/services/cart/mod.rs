//! Cart service: per-user carts over a pluggable [`CartStore`].
//!
//! Every operation on a user's cart runs while holding that user's lock, so
//! concurrent requests for the same user are applied one at a time and the
//! one-line-item-per-product invariant survives parallel handlers. Requests
//! for different users never contend. A user's lock only lives in the registry
//! while some request holds or waits on it.

mod error;
pub mod input;

use std::sync::Arc;

use bookstore_core::{CartSummary, LineItemChange, ProductId, UserId};
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::instrument;

pub use error::CartServiceError;
pub use input::{AddItem, RemoveItem, UpdateItem};

use crate::store::{CartStore, InMemoryCartStore};

type LockRegistry = DashMap<UserId, Arc<Mutex<()>>>;

/// One user's cart lock. Dropping it releases the lock and prunes the
/// registry entry when no other request is waiting on it.
struct UserLock<'a> {
    registry: &'a LockRegistry,
    user_id: UserId,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for UserLock<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        // Waiters hold a clone of the Arc, so only the registry's own
        // reference is left when nobody else needs the lock
        self.registry
            .remove_if(&self.user_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}

/// Cart operations shared by all handlers.
pub struct CartService {
    store: Arc<dyn CartStore>,
    locks: LockRegistry,
}

impl std::fmt::Debug for CartService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartService")
            .field("locked_users", &self.locks.len())
            .finish_non_exhaustive()
    }
}

impl Default for CartService {
    fn default() -> Self {
        Self::new(Arc::new(InMemoryCartStore::new()))
    }
}

impl CartService {
    /// Create a service over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn CartStore>) -> Self {
        Self {
            store,
            locks: DashMap::new(),
        }
    }

    /// Acquire the lock serializing operations on one user's cart.
    async fn lock(&self, user_id: &UserId) -> UserLock<'_> {
        let mut held = UserLock {
            registry: &self.locks,
            user_id: user_id.clone(),
            guard: None,
        };
        // Clone the Arc out so the map shard is not held across the await
        let lock = Arc::clone(self.locks.entry(user_id.clone()).or_default().value());
        held.guard = Some(lock.lock_owned().await);
        held
    }

    /// The user's line items and totals; empty if the user has no cart.
    ///
    /// # Errors
    ///
    /// Returns `CartServiceError::Store` if the store fails.
    #[instrument(skip(self))]
    pub async fn list(&self, user_id: &UserId) -> Result<CartSummary, CartServiceError> {
        let _guard = self.lock(user_id).await;
        let summary = self
            .store
            .get(user_id)
            .await?
            .map_or_else(CartSummary::empty, |cart| cart.summary());
        Ok(summary)
    }

    /// Add units of a product, creating the cart on first use.
    ///
    /// Re-adding a product increases its quantity and keeps the price it was
    /// first added at. Returns the input unchanged.
    ///
    /// # Errors
    ///
    /// Returns `CartServiceError::Invalid` if the summed quantity overflows, or
    /// `CartServiceError::Store` if the store fails.
    #[instrument(skip(self), fields(product_id = %item.product_id))]
    pub async fn add(&self, user_id: &UserId, item: AddItem) -> Result<AddItem, CartServiceError> {
        let _guard = self.lock(user_id).await;
        let mut cart = self.store.get(user_id).await?.unwrap_or_default();

        let change = cart.add(item.product_id.clone(), item.quantity, item.price)?;
        self.store.set(user_id, cart).await?;

        match change {
            LineItemChange::Created => {
                tracing::info!(quantity = item.quantity, "Item added to cart");
            }
            LineItemChange::Incremented(total) => {
                tracing::info!(quantity = item.quantity, total, "Item quantity increased");
            }
        }
        Ok(item)
    }

    /// Set the absolute quantity of a product; zero removes the line item.
    ///
    /// # Errors
    ///
    /// Returns `CartServiceError::CartNotFound` if the user has no cart,
    /// `CartServiceError::ItemNotFound` if the product is not in it, or
    /// `CartServiceError::Store` if the store fails.
    #[instrument(skip(self), fields(product_id = %item.product_id))]
    pub async fn update(
        &self,
        user_id: &UserId,
        item: UpdateItem,
    ) -> Result<UpdateItem, CartServiceError> {
        let _guard = self.lock(user_id).await;
        let mut cart = self
            .store
            .get(user_id)
            .await?
            .ok_or_else(|| CartServiceError::CartNotFound(user_id.clone()))?;

        cart.set_quantity(&item.product_id, item.quantity)?;
        self.store.set(user_id, cart).await?;

        if item.quantity == 0 {
            tracing::info!("Item removed from cart by zero quantity");
        } else {
            tracing::info!(quantity = item.quantity, "Item quantity set");
        }
        Ok(item)
    }

    /// Remove a product's line item and return its identifier.
    ///
    /// # Errors
    ///
    /// Returns `CartServiceError::CartNotFound` if the user has no cart,
    /// `CartServiceError::ItemNotFound` if the product is not in it, or
    /// `CartServiceError::Store` if the store fails.
    #[instrument(skip(self), fields(item_id = %item.item_id))]
    pub async fn remove(
        &self,
        user_id: &UserId,
        item: RemoveItem,
    ) -> Result<ProductId, CartServiceError> {
        let _guard = self.lock(user_id).await;
        let mut cart = self
            .store
            .get(user_id)
            .await?
            .ok_or_else(|| CartServiceError::CartNotFound(user_id.clone()))?;

        let removed = cart.remove(&item.item_id)?;
        self.store.set(user_id, cart).await?;

        tracing::info!(quantity = removed.quantity, "Item removed from cart");
        Ok(removed.product_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bookstore_core::Price;
    use rust_decimal::Decimal;

    use super::*;

    fn user(id: &str) -> UserId {
        UserId::new(id)
    }

    fn add_item(product: &str, quantity: u32, price: i64) -> AddItem {
        AddItem {
            product_id: ProductId::new(product),
            quantity,
            price: Price::new(Decimal::from(price)).unwrap(),
        }
    }

    fn update_item(product: &str, quantity: u32) -> UpdateItem {
        UpdateItem {
            product_id: ProductId::new(product),
            quantity,
        }
    }

    fn remove_item(product: &str) -> RemoveItem {
        RemoveItem {
            item_id: ProductId::new(product),
        }
    }

    #[tokio::test]
    async fn test_list_without_cart_is_empty() {
        let service = CartService::default();
        let summary = service.list(&user("alice")).await.unwrap();
        assert_eq!(summary, CartSummary::empty());
    }

    #[tokio::test]
    async fn test_add_echoes_input() {
        let service = CartService::default();
        let item = add_item("b1", 2, 10);
        let echoed = service.add(&user("alice"), item.clone()).await.unwrap();
        assert_eq!(echoed, item);
    }

    #[tokio::test]
    async fn test_repeated_add_merges() {
        let service = CartService::default();
        let alice = user("alice");
        service.add(&alice, add_item("b1", 2, 10)).await.unwrap();
        service.add(&alice, add_item("b1", 3, 50)).await.unwrap();

        let summary = service.list(&alice).await.unwrap();
        assert_eq!(summary.total_items, 1);
        assert_eq!(summary.items[0].quantity, 5);
        assert_eq!(summary.items[0].price.amount(), Decimal::from(10));
        assert_eq!(summary.total_price, Decimal::from(50));
    }

    #[tokio::test]
    async fn test_totals() {
        let service = CartService::default();
        let alice = user("alice");
        service.add(&alice, add_item("b1", 2, 10)).await.unwrap();
        service.add(&alice, add_item("b2", 1, 5)).await.unwrap();

        let summary = service.list(&alice).await.unwrap();
        assert_eq!(summary.total_items, 2);
        assert_eq!(summary.total_price, Decimal::from(25));
    }

    #[tokio::test]
    async fn test_update_sets_quantity() {
        let service = CartService::default();
        let alice = user("alice");
        service.add(&alice, add_item("b1", 2, 10)).await.unwrap();
        service.update(&alice, update_item("b1", 5)).await.unwrap();

        let summary = service.list(&alice).await.unwrap();
        assert_eq!(summary.items[0].quantity, 5);
        assert_eq!(summary.total_price, Decimal::from(50));
    }

    #[tokio::test]
    async fn test_update_zero_removes() {
        let service = CartService::default();
        let alice = user("alice");
        service.add(&alice, add_item("b1", 2, 10)).await.unwrap();
        service.update(&alice, update_item("b1", 0)).await.unwrap();

        let summary = service.list(&alice).await.unwrap();
        assert!(summary.items.is_empty());
    }

    #[tokio::test]
    async fn test_update_without_cart() {
        let service = CartService::default();
        let err = service
            .update(&user("ghost"), update_item("b1", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, CartServiceError::CartNotFound(_)));
    }

    #[tokio::test]
    async fn test_update_missing_item() {
        let service = CartService::default();
        let alice = user("alice");
        service.add(&alice, add_item("b1", 1, 10)).await.unwrap();

        let err = service
            .update(&alice, update_item("b9", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, CartServiceError::ItemNotFound(id) if id.as_str() == "b9"));
    }

    #[tokio::test]
    async fn test_remove() {
        let service = CartService::default();
        let alice = user("alice");
        service.add(&alice, add_item("b1", 1, 10)).await.unwrap();

        let removed = service.remove(&alice, remove_item("b1")).await.unwrap();
        assert_eq!(removed.as_str(), "b1");
        assert!(service.list(&alice).await.unwrap().items.is_empty());
    }

    #[tokio::test]
    async fn test_remove_not_found() {
        let service = CartService::default();
        let alice = user("alice");

        let err = service.remove(&alice, remove_item("b1")).await.unwrap_err();
        assert!(matches!(err, CartServiceError::CartNotFound(_)));

        service.add(&alice, add_item("b1", 1, 10)).await.unwrap();
        let err = service.remove(&alice, remove_item("b2")).await.unwrap_err();
        assert!(matches!(err, CartServiceError::ItemNotFound(_)));
    }

    #[tokio::test]
    async fn test_emptied_cart_still_exists() {
        let service = CartService::default();
        let alice = user("alice");
        service.add(&alice, add_item("b1", 1, 10)).await.unwrap();
        service.remove(&alice, remove_item("b1")).await.unwrap();

        // The cart outlives its last item, so the miss is on the item
        let err = service.remove(&alice, remove_item("b1")).await.unwrap_err();
        assert!(matches!(err, CartServiceError::ItemNotFound(_)));
    }

    #[tokio::test]
    async fn test_quantity_overflow_is_invalid() {
        let service = CartService::default();
        let alice = user("alice");
        service.add(&alice, add_item("b1", u32::MAX, 1)).await.unwrap();

        let err = service.add(&alice, add_item("b1", 1, 1)).await.unwrap_err();
        match err {
            CartServiceError::Invalid(errors) => assert!(errors.has_field("quantity")),
            other => panic!("unexpected error: {other:?}"),
        }
        let summary = service.list(&alice).await.unwrap();
        assert_eq!(summary.items[0].quantity, u32::MAX);
    }

    #[tokio::test]
    async fn test_users_are_isolated() {
        let service = CartService::default();
        service.add(&user("alice"), add_item("b1", 1, 10)).await.unwrap();

        assert!(service.list(&user("bob")).await.unwrap().items.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_adds_for_one_user_merge() {
        let service = Arc::new(CartService::default());
        let alice = user("alice");

        let tasks: Vec<_> = (0..64)
            .map(|_| {
                let service = Arc::clone(&service);
                let alice = alice.clone();
                tokio::spawn(async move { service.add(&alice, add_item("b1", 1, 10)).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let summary = service.list(&alice).await.unwrap();
        assert_eq!(summary.total_items, 1);
        assert_eq!(summary.items[0].quantity, 64);
        assert_eq!(service.locks.len(), 0);
    }

    #[tokio::test]
    async fn test_total_overflow_is_invalid() {
        let service = CartService::default();
        let alice = user("alice");
        let huge = AddItem {
            product_id: ProductId::new("b1"),
            quantity: 1,
            price: Price::new(Decimal::MAX).unwrap(),
        };
        service.add(&alice, huge).await.unwrap();

        let err = service.add(&alice, add_item("b2", 1, 1)).await.unwrap_err();
        assert!(matches!(err, CartServiceError::Invalid(ref e) if e.has_field("quantity")));
        assert_eq!(service.list(&alice).await.unwrap().total_items, 1);
    }

    #[tokio::test]
    async fn test_lock_registry_does_not_grow_for_unknown_users() {
        let service = CartService::default();
        for i in 0..1_000 {
            let visitor = user(&format!("visitor-{i}"));
            service.list(&visitor).await.unwrap();
            service.update(&visitor, update_item("b1", 1)).await.unwrap_err();
            service.remove(&visitor, remove_item("b1")).await.unwrap_err();
        }

        assert_eq!(service.locks.len(), 0);
    }

    #[tokio::test]
    async fn test_lock_registry_is_pruned_after_writes() {
        let service = CartService::default();
        let alice = user("alice");
        service.add(&alice, add_item("b1", 1, 10)).await.unwrap();
        service.update(&alice, update_item("b1", 3)).await.unwrap();

        assert_eq!(service.locks.len(), 0);
        assert_eq!(service.list(&alice).await.unwrap().items[0].quantity, 3);
    }

    #[tokio::test]
    async fn test_custom_store() {
        let store = Arc::new(InMemoryCartStore::new());
        let service = CartService::new(store.clone());
        service.add(&user("alice"), add_item("b1", 1, 10)).await.unwrap();

        assert_eq!(store.len(), 1);
    }
}
