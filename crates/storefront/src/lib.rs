//! Bookstore storefront library.
//!
//! Serves the static book catalog and per-user shopping carts over a JSON
//! HTTP API. The binary in `main.rs` only wires configuration, logging and
//! Sentry around [`routes::app`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
