//! Cart storage.
//!
//! Carts are addressed by [`UserId`] through the [`CartStore`] trait, which
//! only knows how to get and set a whole cart. Handlers never talk to
//! a store directly; [`crate::services::cart::CartService`] layers the
//! per-user locking and mutation rules on top, so a shared key-value backend
//! can replace [`memory::InMemoryCartStore`] without touching either.

pub mod memory;

use async_trait::async_trait;
use bookstore_core::{Cart, UserId};

pub use memory::InMemoryCartStore;

/// Errors surfaced by a cart store backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend could not be reached or refused the operation.
    #[error("cart store unavailable: {0}")]
    Unavailable(String),
}

/// Keyed storage for whole carts.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Fetch the cart for a user, if one has been created.
    async fn get(&self, user_id: &UserId) -> Result<Option<Cart>, StoreError>;

    /// Create or replace the cart for a user.
    async fn set(&self, user_id: &UserId, cart: Cart) -> Result<(), StoreError>;
}
