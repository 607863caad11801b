//! Application services.
//!
//! Each module wraps one operation family over the hosted services:
//!
//! - [`profile`] - session resolution, registration, login, logout
//! - [`catalog`] - category/product reads and the category join
//! - [`products`] - farmer-side product create/update/delete
//! - [`orders`] - the order draft state machine and order reads
//! - [`payments`] - gateway order creation and receipt verification

pub mod catalog;
pub mod orders;
pub mod payments;
pub mod products;
pub mod profile;
