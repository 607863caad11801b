//! Farmstand Core - Shared types library.
//!
//! This crate provides common types used across all Farmstand components:
//! - `market` - The marketplace web application (storefront + dashboards)
//! - `integration-tests` - End-to-end tests against a running server
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no access
//! to the hosted backend. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, roles,
//!   and order statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
