//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, added by the binary)
//! 2. CORS
//! 3. `TraceLayer` (request span)
//! 4. Request ID (records on the request span)
//! 5. Security headers
//!
//! Cart handlers additionally resolve their owner with the [`CartOwner`]
//! extractor.

pub mod cors;
pub mod identity;
pub mod request_id;
pub mod security_headers;

pub use cors::cors_layer;
pub use identity::CartOwner;
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use security_headers::security_headers_middleware;
