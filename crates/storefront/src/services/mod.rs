//! Business logic services for storefront.
//!
//! # Services
//!
//! - `cart` - Per-user cart operations over a pluggable store

pub mod cart;

pub use cart::{CartService, CartServiceError};
