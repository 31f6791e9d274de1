//! Cart route handlers.
//!
//! All four handlers act on the cart of the [`CartOwner`] named by the
//! `userId` query parameter. Bodies and queries are taken as raw JSON so that
//! malformed input is reported through the same structured validation errors
//! as out-of-range input, instead of the framework's plain-text rejections.

use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use bookstore_core::{CartSummary, ProductId};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::middleware::CartOwner;
use crate::services::cart::{AddItem, RemoveItem, UpdateItem};
use crate::state::AppState;

/// Response for add and update.
#[derive(Debug, Serialize)]
pub struct ItemResponse<T> {
    pub message: &'static str,
    pub item: T,
}

/// Response for remove.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovedResponse {
    pub message: &'static str,
    pub item_id: ProductId,
}

/// Show the cart with derived totals.
#[instrument(skip(state), fields(user_id = %owner.0))]
pub async fn show(State(state): State<AppState>, owner: CartOwner) -> Result<Json<CartSummary>> {
    let summary = state.carts().list(&owner.0).await?;
    Ok(Json(summary))
}

/// Add an item to the cart, creating the cart if needed.
#[instrument(skip(state, body), fields(user_id = %owner.0))]
pub async fn add(
    State(state): State<AppState>,
    owner: CartOwner,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<ItemResponse<AddItem>>> {
    let Json(body) = body?;
    let item = AddItem::try_from(&body)?;

    add_breadcrumb(
        "cart",
        "Add to cart",
        Some(&[("product_id", item.product_id.as_str())]),
    );
    let item = state.carts().add(&owner.0, item).await?;

    Ok(Json(ItemResponse {
        message: "Item added to cart",
        item,
    }))
}

/// Set the quantity of an item already in the cart.
#[instrument(skip(state, body), fields(user_id = %owner.0))]
pub async fn update(
    State(state): State<AppState>,
    owner: CartOwner,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<ItemResponse<UpdateItem>>> {
    let Json(body) = body?;
    let item = UpdateItem::try_from(&body)?;

    add_breadcrumb(
        "cart",
        "Update cart",
        Some(&[("product_id", item.product_id.as_str())]),
    );
    let item = state.carts().update(&owner.0, item).await?;

    Ok(Json(ItemResponse {
        message: "Cart updated",
        item,
    }))
}

/// Remove an item from the cart.
#[instrument(skip(state, query), fields(user_id = %owner.0))]
pub async fn remove(
    State(state): State<AppState>,
    owner: CartOwner,
    query: std::result::Result<Query<Map<String, Value>>, QueryRejection>,
) -> Result<Json<RemovedResponse>> {
    let Query(query) = query?;
    let item = RemoveItem::try_from(&Value::Object(query))?;

    add_breadcrumb(
        "cart",
        "Remove from cart",
        Some(&[("item_id", item.item_id.as_str())]),
    );
    let item_id = state.carts().remove(&owner.0, item).await?;

    Ok(Json(RemovedResponse {
        message: "Item removed from cart",
        item_id,
    }))
}
