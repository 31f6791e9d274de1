//! Core types for the bookstore.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod book;
pub mod cart;
pub mod id;
pub mod price;

pub use book::{Book, BookId, Genre};
pub use cart::{Cart, CartError, CartLineItem, CartSummary, LineItemChange};
pub use id::*;
pub use price::{Price, PriceError};
