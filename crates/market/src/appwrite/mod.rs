//! Hosted backend clients (document store, auth sessions, object storage).
//!
//! # Architecture
//!
//! - The hosted backend is the source of truth - NO local sync, direct REST
//!   calls for every request (navigating between pages always refetches)
//! - One shared [`AppwriteClient`] carries the HTTP connection pool and
//!   project credentials; [`Documents`], [`Storage`] and [`Account`] wrap it
//!   per concern
//! - Raw documents are converted into domain types at the fetch boundary
//!   (see `crate::models`), never passed through untyped
//!
//! # Example
//!
//! ```rust,ignore
//! use farmstand_market::appwrite::{AppwriteClient, Documents, Query};
//!
//! let client = AppwriteClient::new(&config.appwrite);
//! let documents = Documents::new(client.clone(), &config.appwrite);
//!
//! let page = documents
//!     .list("categories", &[Query::order_asc("name")])
//!     .await?;
//! ```

mod account;
mod documents;
mod storage;
pub mod types;

pub use account::Account;
pub use documents::{Documents, Query};
pub use storage::{ImageUpload, Storage};
pub use types::{AuthSession, AuthUser, Document, DocumentList, StoredFile};

use std::sync::Arc;

use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::AppwriteConfig;

/// Errors that can occur when talking to the hosted backend.
#[derive(Debug, Error)]
pub enum AppwriteError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend returned a structured API error.
    #[error("API error ({code} {kind}): {message}")]
    Api {
        /// HTTP status code.
        code: u16,
        /// Backend error type tag (e.g. `document_not_found`).
        kind: String,
        /// Human-readable message.
        message: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppwriteError {
    /// Whether this error is a 404 from the backend.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Api { code: 404, .. })
    }
}

/// Shared client for the hosted backend REST API.
///
/// Cheap to clone; all wrappers share the same connection pool.
#[derive(Clone)]
pub struct AppwriteClient {
    inner: Arc<AppwriteClientInner>,
}

struct AppwriteClientInner {
    http: reqwest::Client,
    endpoint: String,
    project_id: String,
    api_key: String,
}

impl AppwriteClient {
    /// Create a new client from configuration.
    #[must_use]
    pub fn new(config: &AppwriteConfig) -> Self {
        Self {
            inner: Arc::new(AppwriteClientInner {
                http: reqwest::Client::new(),
                endpoint: config.endpoint.trim_end_matches('/').to_string(),
                project_id: config.project_id.clone(),
                api_key: config.api_key.expose_secret().to_string(),
            }),
        }
    }

    /// The configured REST endpoint (no trailing slash).
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    /// The configured project id.
    #[must_use]
    pub fn project_id(&self) -> &str {
        &self.inner.project_id
    }

    /// Start a request against an API path, with the project header set.
    pub(crate) fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.inner
            .http
            .request(method, format!("{}/{path}", self.inner.endpoint))
            .header("X-Appwrite-Project", &self.inner.project_id)
    }

    /// Start a request authenticated with the server-side API key.
    pub(crate) fn keyed_request(
        &self,
        method: reqwest::Method,
        path: &str,
    ) -> reqwest::RequestBuilder {
        self.request(method, path)
            .header("X-Appwrite-Key", &self.inner.api_key)
    }

    /// Liveness probe against the backend's health endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or unhealthy.
    pub async fn health(&self) -> Result<(), AppwriteError> {
        let response = self.request(reqwest::Method::GET, "health").send().await?;
        check_status(response).await?;
        Ok(())
    }
}

/// Generate a unique id acceptable to the backend as a document or file id.
#[must_use]
pub fn unique_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Convert a non-success response into an [`AppwriteError::Api`].
///
/// The backend reports errors as `{"message", "code", "type"}`.
pub(crate) async fn check_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, AppwriteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    #[derive(serde::Deserialize)]
    struct ApiErrorBody {
        message: Option<String>,
        #[serde(rename = "type")]
        kind: Option<String>,
    }

    let body = response.text().await.unwrap_or_default();
    let parsed: ApiErrorBody = serde_json::from_str(&body).unwrap_or(ApiErrorBody {
        message: None,
        kind: None,
    });

    tracing::debug!(
        status = %status,
        body = %body.chars().take(300).collect::<String>(),
        "backend returned non-success status"
    );

    Err(AppwriteError::Api {
        code: status.as_u16(),
        kind: parsed.kind.unwrap_or_else(|| "unknown".to_string()),
        message: parsed
            .message
            .unwrap_or_else(|| format!("HTTP {status}")),
    })
}

/// Parse a JSON response body, logging a body snippet on failure.
pub(crate) async fn parse_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, AppwriteError> {
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| {
        tracing::error!(
            error = %e,
            body = %text.chars().take(300).collect::<String>(),
            "failed to parse backend response"
        );
        AppwriteError::Parse(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AppwriteError::Api {
            code: 404,
            kind: "document_not_found".to_string(),
            message: "Document with the requested ID could not be found.".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "API error (404 document_not_found): Document with the requested ID could not be found."
        );
    }

    #[test]
    fn test_unique_id_shape() {
        let id = unique_id();
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_is_not_found() {
        let err = AppwriteError::Api {
            code: 404,
            kind: "document_not_found".to_string(),
            message: String::new(),
        };
        assert!(err.is_not_found());

        let err = AppwriteError::Api {
            code: 500,
            kind: "general_unknown".to_string(),
            message: String::new(),
        };
        assert!(!err.is_not_found());
    }
}
