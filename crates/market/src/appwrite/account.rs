//! Auth service operations (accounts and sessions).
//!
//! Registration and login act as the user, not the server: account creation
//! and email-session creation go out with only the project header, while
//! session-scoped calls carry the session secret the auth service returned
//! at login.

use reqwest::Method;
use serde_json::json;
use tracing::instrument;

use super::types::{AuthSession, AuthUser};
use super::{AppwriteClient, AppwriteError, check_status, parse_json};

/// Typed access to the auth service.
#[derive(Clone)]
pub struct Account {
    client: AppwriteClient,
}

impl Account {
    /// Create a new auth service wrapper.
    #[must_use]
    pub const fn new(client: AppwriteClient) -> Self {
        Self { client }
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is already registered or the request
    /// fails.
    #[instrument(skip(self, password))]
    pub async fn create(
        &self,
        user_id: &str,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<AuthUser, AppwriteError> {
        let response = self
            .client
            .request(Method::POST, "account")
            .json(&json!({
                "userId": user_id,
                "email": email,
                "password": password,
                "name": name,
            }))
            .send()
            .await?;

        let response = check_status(response).await?;
        parse_json(response).await
    }

    /// Create an email+password session (login).
    ///
    /// The returned session carries the secret that authenticates all
    /// session-scoped calls until logout.
    ///
    /// # Errors
    ///
    /// Returns an error on bad credentials or request failure.
    #[instrument(skip(self, password))]
    pub async fn create_email_session(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, AppwriteError> {
        let response = self
            .client
            .request(Method::POST, "account/sessions/email")
            .json(&json!({
                "email": email,
                "password": password,
            }))
            .send()
            .await?;

        let response = check_status(response).await?;
        parse_json(response).await
    }

    /// Get the account behind a session secret.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is missing, expired, or revoked.
    #[instrument(skip_all)]
    pub async fn get(&self, session_secret: &str) -> Result<AuthUser, AppwriteError> {
        let response = self
            .client
            .request(Method::GET, "account")
            .header("X-Appwrite-Session", session_secret)
            .send()
            .await?;

        let response = check_status(response).await?;
        parse_json(response).await
    }

    /// Delete the current session (logout).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; an already-dead session is
    /// not treated as success.
    #[instrument(skip_all)]
    pub async fn delete_current_session(&self, session_secret: &str) -> Result<(), AppwriteError> {
        let response = self
            .client
            .request(Method::DELETE, "account/sessions/current")
            .header("X-Appwrite-Session", session_secret)
            .send()
            .await?;

        check_status(response).await?;
        Ok(())
    }
}
