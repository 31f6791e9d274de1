//! Cart service error types.

use bookstore_core::validation::IssueCode;
use bookstore_core::{CartError, ProductId, UserId, ValidationErrors, ValidationIssue};
use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur during cart operations.
#[derive(Debug, Error)]
pub enum CartServiceError {
    /// The user has never added anything to a cart.
    #[error("no cart for user {0}")]
    CartNotFound(UserId),

    /// The cart has no line item for the product.
    #[error("item {0} not found in cart")]
    ItemNotFound(ProductId),

    /// The input was well-formed but cannot be applied.
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),

    /// Store backend error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl From<CartError> for CartServiceError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::ItemNotFound(product_id) => Self::ItemNotFound(product_id),
            overflow @ (CartError::QuantityOverflow { .. } | CartError::TotalOverflow(_)) => {
                Self::Invalid(ValidationErrors::single(ValidationIssue::new(
                    "quantity",
                    IssueCode::TooBig,
                    overflow.to_string(),
                )))
            }
        }
    }
}
