//! Shopping cart line items and the rules for mutating them.
//!
//! A [`Cart`] holds at most one [`CartLineItem`] per product. All mutation
//! goes through the methods here so that invariant holds no matter which
//! store backs the cart.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// Errors raised by cart mutations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// No line item exists for the product.
    #[error("item {0} not found in cart")]
    ItemNotFound(ProductId),
    /// Increasing the quantity would exceed the supported maximum.
    #[error("quantity for {product_id} would exceed {max}")]
    QuantityOverflow {
        /// Product whose quantity overflowed.
        product_id: ProductId,
        /// Maximum supported quantity.
        max: u32,
    },
    /// The cart total would no longer fit in a decimal amount.
    #[error("cart total would overflow with {0} at the requested quantity")]
    TotalOverflow(ProductId),
}

/// One product entry within a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub price: Price,
}

impl CartLineItem {
    /// `price * quantity` for this line, `None` on decimal overflow.
    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        self.price.times(self.quantity)
    }
}

/// What an add did to the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineItemChange {
    /// A new line item was appended.
    Created,
    /// An existing line item's quantity was increased to the contained value.
    Incremented(u32),
}

/// An ordered collection of line items belonging to one user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find the line item for a product.
    #[must_use]
    pub fn get(&self, product_id: &ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|item| &item.product_id == product_id)
    }

    fn get_mut(&mut self, product_id: &ProductId) -> Option<&mut CartLineItem> {
        self.items
            .iter_mut()
            .find(|item| &item.product_id == product_id)
    }

    fn position(&self, product_id: &ProductId) -> Option<usize> {
        self.items
            .iter()
            .position(|item| &item.product_id == product_id)
    }

    /// Add `quantity` units of a product.
    ///
    /// An existing line item for the product has its quantity increased and
    /// keeps its original price; the `price` argument only applies when a new
    /// line item is created.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::QuantityOverflow`] if the summed quantity does not
    /// fit in a `u32`, or [`CartError::TotalOverflow`] if the cart total would
    /// not fit in a [`Decimal`]. The cart is left unchanged in both cases.
    pub fn add(
        &mut self,
        product_id: ProductId,
        quantity: u32,
        price: Price,
    ) -> Result<LineItemChange, CartError> {
        let Some(existing) = self.get(&product_id) else {
            self.check_total(&product_id, quantity, price)?;
            self.items.push(CartLineItem {
                product_id,
                quantity,
                price,
            });
            return Ok(LineItemChange::Created);
        };

        let line_price = existing.price;
        let total = existing
            .quantity
            .checked_add(quantity)
            .ok_or_else(|| CartError::QuantityOverflow {
                product_id: product_id.clone(),
                max: u32::MAX,
            })?;
        self.check_total(&product_id, total, line_price)?;

        if let Some(item) = self.get_mut(&product_id) {
            item.quantity = total;
        }
        Ok(LineItemChange::Incremented(total))
    }

    /// Set the absolute quantity of an existing line item.
    ///
    /// A quantity of zero removes the line item.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] if the product is not in the cart,
    /// or [`CartError::TotalOverflow`] if the cart total would not fit in a
    /// [`Decimal`].
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: u32) -> Result<(), CartError> {
        let index = self
            .position(product_id)
            .ok_or_else(|| CartError::ItemNotFound(product_id.clone()))?;

        if quantity == 0 {
            self.items.remove(index);
            return Ok(());
        }

        if let Some(price) = self.get(product_id).map(|item| item.price) {
            self.check_total(product_id, quantity, price)?;
        }
        if let Some(item) = self.get_mut(product_id) {
            item.quantity = quantity;
        }
        Ok(())
    }

    /// Refuse a line for `product_id` that would push the total past
    /// [`Decimal::MAX`].
    fn check_total(
        &self,
        product_id: &ProductId,
        quantity: u32,
        price: Price,
    ) -> Result<(), CartError> {
        price
            .times(quantity)
            .and_then(|line| {
                self.items
                    .iter()
                    .filter(|item| &item.product_id != product_id)
                    .try_fold(line, |acc, item| acc.checked_add(item.line_total()?))
            })
            .map(|_| ())
            .ok_or_else(|| CartError::TotalOverflow(product_id.clone()))
    }

    /// Remove a line item and return it.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] if the product is not in the cart.
    pub fn remove(&mut self, product_id: &ProductId) -> Result<CartLineItem, CartError> {
        let index = self
            .position(product_id)
            .ok_or_else(|| CartError::ItemNotFound(product_id.clone()))?;
        Ok(self.items.remove(index))
    }

    /// Number of line items (not the sum of quantities).
    #[must_use]
    pub fn total_items(&self) -> usize {
        self.items.len()
    }

    /// Sum of `price * quantity` over all line items.
    ///
    /// [`Cart::add`] and [`Cart::set_quantity`] keep this representable; a
    /// cart deserialized from elsewhere saturates at [`Decimal::MAX`].
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.items
            .iter()
            .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(item.line_total()?))
            .unwrap_or(Decimal::MAX)
    }

    /// Snapshot of the cart with derived totals.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        CartSummary {
            items: self.items.clone(),
            total_items: self.total_items(),
            total_price: self.total_price(),
        }
    }
}

/// Cart contents plus derived totals, as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub items: Vec<CartLineItem>,
    pub total_items: usize,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub total_price: Decimal,
}

impl CartSummary {
    /// Summary of a user with no cart.
    #[must_use]
    pub fn empty() -> Self {
        Cart::new().summary()
    }
}
