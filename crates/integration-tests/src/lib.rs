//! Shared helpers for Farmstand integration tests.
//!
//! These tests require:
//! - A running market server (cargo run -p farmstand-market)
//! - Hosted-backend credentials in the environment
//! - Optionally, seeded test accounts (see the individual tests)
//!
//! All tests are `#[ignore]`d by default; run them explicitly once the
//! server is up.

#![cfg_attr(not(test), forbid(unsafe_code))]

use reqwest::Client;

/// Base URL for the market server (configurable via environment).
#[must_use]
pub fn market_base_url() -> String {
    std::env::var("MARKET_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// A client with a cookie store and redirects disabled, so gate redirects
/// are observable.
///
/// # Panics
///
/// Panics if the client cannot be constructed (test-only code).
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// Log in with the given credentials, leaving the session cookie in the
/// client's store.
///
/// # Panics
///
/// Panics if the login request cannot be sent.
pub async fn login(client: &Client, email: &str, password: &str) -> reqwest::Response {
    let base_url = market_base_url();
    client
        .post(format!("{base_url}/login"))
        .form(&[("email", email), ("password", password)])
        .send()
        .await
        .expect("Failed to send login request")
}

/// Credentials for a seeded test account, from the environment.
#[must_use]
pub fn seeded_account(role: &str) -> Option<(String, String)> {
    let email = std::env::var(format!("TEST_{}_EMAIL", role.to_uppercase())).ok()?;
    let password = std::env::var(format!("TEST_{}_PASSWORD", role.to_uppercase())).ok()?;
    Some((email, password))
}
