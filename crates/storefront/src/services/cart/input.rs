//! Validated inputs for cart operations.
//!
//! Each operation declares its own [`Schema`]; the input types here are only
//! constructible from documents that pass it.

use bookstore_core::validation::IssueCode;
use bookstore_core::{
    FieldRule, Price, ProductId, Schema, ValidatedFields, ValidationErrors, ValidationIssue,
};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

/// Body of `POST /cart`.
pub const ADD_ITEM_SCHEMA: Schema = Schema::new(&[
    FieldRule::string("productId").non_empty(),
    FieldRule::integer("quantity").min(1),
    FieldRule::number("price").range(Some(Decimal::ZERO), None),
]);

/// Body of `PUT /cart`.
pub const UPDATE_ITEM_SCHEMA: Schema = Schema::new(&[
    FieldRule::string("productId").non_empty(),
    FieldRule::integer("quantity").min(0),
]);

/// Query of `DELETE /cart`.
pub const REMOVE_ITEM_SCHEMA: Schema = Schema::new(&[FieldRule::string("itemId").non_empty()]);

/// Add `quantity` units of a product at `price`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub price: Price,
}

/// Set the quantity of a product already in the cart; zero removes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItem {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Remove a product from the cart.
///
/// The field is named `itemId` on the wire but addresses the product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveItem {
    pub item_id: ProductId,
}

impl TryFrom<&Value> for AddItem {
    type Error = ValidationErrors;

    fn try_from(input: &Value) -> Result<Self, Self::Error> {
        let mut fields = ADD_ITEM_SCHEMA.validate(input)?;
        let price = fields.number("price")?;
        Ok(Self {
            product_id: ProductId::new(fields.take_string("productId")?),
            quantity: quantity(&fields)?,
            price: Price::new(price).map_err(|e| {
                ValidationErrors::single(ValidationIssue::new(
                    "price",
                    IssueCode::TooSmall,
                    e.to_string(),
                ))
            })?,
        })
    }
}

impl TryFrom<&Value> for UpdateItem {
    type Error = ValidationErrors;

    fn try_from(input: &Value) -> Result<Self, Self::Error> {
        let mut fields = UPDATE_ITEM_SCHEMA.validate(input)?;
        Ok(Self {
            product_id: ProductId::new(fields.take_string("productId")?),
            quantity: quantity(&fields)?,
        })
    }
}

impl TryFrom<&Value> for RemoveItem {
    type Error = ValidationErrors;

    fn try_from(input: &Value) -> Result<Self, Self::Error> {
        let mut fields = REMOVE_ITEM_SCHEMA.validate(input)?;
        Ok(Self {
            item_id: ProductId::new(fields.take_string("itemId")?),
        })
    }
}

fn quantity(fields: &ValidatedFields) -> Result<u32, ValidationErrors> {
    let quantity = fields.integer("quantity")?;
    u32::try_from(quantity).map_err(|_| {
        ValidationErrors::single(ValidationIssue::new(
            "quantity",
            IssueCode::TooBig,
            "is out of range",
        ))
    })
}
