//! Book catalog route handlers.

use axum::{
    Json,
    extract::State,
    http::header::CACHE_CONTROL,
    response::IntoResponse,
};
use tracing::instrument;

use crate::state::AppState;

/// The catalog never changes while the process runs.
const CATALOG_CACHE_CONTROL: &str = "public, max-age=300";

/// List every book with its genre normalized to a single string.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    let books = state.catalog().list();
    tracing::debug!(count = books.len(), "Listing books");

    ([(CACHE_CONTROL, CATALOG_CACHE_CONTROL)], Json(books.to_vec()))
}
