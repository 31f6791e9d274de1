//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health          - Liveness check
//! GET    /health/ready    - Readiness check (catalog loaded)
//!
//! # Catalog
//! GET    /books           - All books, genre normalized
//!
//! # Cart (?userId=..., defaults to the shared guest cart)
//! GET    /cart            - Line items with totalItems / totalPrice
//! POST   /cart            - Add item {productId, quantity, price}
//! PUT    /cart            - Set quantity {productId, quantity}; 0 removes
//! DELETE /cart?itemId=..  - Remove item
//! ```

pub mod books;
pub mod cart;
pub mod health;

use axum::{Router, middleware::from_fn, routing::get};
use tower_http::trace::TraceLayer;

use crate::middleware::{cors_layer, request_id_middleware, security_headers_middleware};
use crate::state::AppState;

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        // Catalog
        .route("/books", get(books::index))
        // Cart
        .route(
            "/cart",
            get(cart::show)
                .post(cart::add)
                .put(cart::update)
                .delete(cart::remove),
        )
}

/// Build the complete application: routes, middleware and state.
///
/// Sentry layers are left to the binary so tests can use this as-is.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config().cors_origins);

    routes()
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(
            |request: &axum::extract::Request| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                    user_id = tracing::field::Empty,
                )
            },
        ))
        .layer(cors)
        .with_state(state)
}
