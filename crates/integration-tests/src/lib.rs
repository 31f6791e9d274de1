//! Integration test harness for the bookstore storefront.
//!
//! Requests are driven through the fully layered router with
//! [`tower::ServiceExt::oneshot`], so no socket or running server is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bookstore-integration-tests
//! ```

#![allow(clippy::unwrap_used)]

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode, header::CONTENT_TYPE},
};
use bookstore_storefront::catalog::Catalog;
use bookstore_storefront::config::{IdentityMode, StorefrontConfig};
use bookstore_storefront::routes;
use bookstore_storefront::state::AppState;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

/// A decoded response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Router plus the state behind it, one fresh cart store per context.
#[derive(Debug, Clone)]
pub struct TestContext {
    pub state: AppState,
}

impl TestContext {
    /// Context over the embedded catalog with default configuration.
    ///
    /// # Panics
    ///
    /// Panics if the embedded catalog fails to parse.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(StorefrontConfig::default())
    }

    /// Context that rejects cart requests without a `userId`.
    #[must_use]
    pub fn strict() -> Self {
        Self::with_config(StorefrontConfig {
            identity: IdentityMode::Required,
            ..StorefrontConfig::default()
        })
    }

    /// Context over a caller-supplied catalog document.
    ///
    /// # Panics
    ///
    /// Panics if `json` is not a valid catalog.
    #[must_use]
    pub fn with_catalog(json: &str) -> Self {
        let catalog = Catalog::from_json(json).unwrap();
        Self {
            state: AppState::new(StorefrontConfig::default(), catalog),
        }
    }

    fn with_config(config: StorefrontConfig) -> Self {
        let catalog = Catalog::embedded().unwrap();
        Self {
            state: AppState::new(config, catalog),
        }
    }

    /// The application router as the binary serves it, minus Sentry.
    #[must_use]
    pub fn app(&self) -> Router {
        routes::app(self.state.clone())
    }

    /// Send a request and decode the JSON body (`Value::Null` when empty,
    /// `Value::String` when not JSON).
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    pub async fn send(&self, method: Method, uri: &str, body: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if body.is_some() {
            builder = builder.header(CONTENT_TYPE, "application/json");
        }
        let request = builder
            .body(body.map_or_else(Body::empty, |b| Body::from(b.to_owned())))
            .unwrap();

        self.send_request(request).await
    }

    /// Send a prebuilt request.
    ///
    /// # Panics
    ///
    /// Panics if the body cannot be read.
    pub async fn send_request(&self, request: Request<Body>) -> TestResponse {
        let response = self.app().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: &str) -> TestResponse {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: &str) -> TestResponse {
        self.send(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send(Method::DELETE, uri, None).await
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Read a JSON number as `f64` for comparisons.
///
/// # Panics
///
/// Panics if `value` is not a number.
#[must_use]
pub fn number(value: &Value) -> f64 {
    value.as_f64().unwrap()
}
