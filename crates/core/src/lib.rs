//! Bookstore Core - Shared types library.
//!
//! This crate provides the domain types used by the bookstore backend:
//! - `storefront` - HTTP service exposing the catalog and shopping carts
//! - `integration-tests` - End-to-end tests against the assembled router
//!
//! # Architecture
//!
//! The core crate contains only types, pure domain logic and input
//! validation - no I/O, no HTTP, no shared state. Cart mutation rules live
//! here so they can be tested without a runtime.
//!
//! # Modules
//!
//! - [`types`] - Books, carts, prices and type-safe identifiers
//! - [`validation`] - Declarative field schemas producing structured issues

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;
pub mod validation;

pub use types::*;
pub use validation::{
    FieldRule, IssueCode, Schema, ValidatedFields, ValidationErrors, ValidationIssue,
};
