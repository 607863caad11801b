//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` that captures server-side failures to
//! Sentry before responding. All route handlers return `Result<T, AppError>`;
//! nothing is allowed to crash the request path, and nothing is retried.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::appwrite::AppwriteError;
use crate::razorpay::RazorpayError;

/// A failed client-side field check, naming the offending fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationError {
    /// Required fields that were empty or absent.
    pub missing: Vec<&'static str>,
    /// Fields whose value could not be accepted (non-numeric input in a
    /// numeric field, unsupported image type).
    pub invalid: Vec<&'static str>,
}

impl ValidationError {
    /// Record a missing required field.
    pub fn missing(&mut self, field: &'static str) {
        self.missing.push(field);
    }

    /// Record an unacceptable value.
    pub fn invalid(&mut self, field: &'static str) {
        self.invalid.push(field);
    }

    /// Whether any problem was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.invalid.is_empty()
    }

    /// Convert into a `Result`, erring when any problem was recorded.
    ///
    /// # Errors
    ///
    /// Returns `self` if any field was flagged.
    pub fn into_result(self) -> std::result::Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();
        if !self.missing.is_empty() {
            parts.push(format!("missing required field(s): {}", self.missing.join(", ")));
        }
        if !self.invalid.is_empty() {
            parts.push(format!("invalid field(s): {}", self.invalid.join(", ")));
        }
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationError {}

/// Application-level error type for the marketplace.
#[derive(Debug, Error)]
pub enum AppError {
    /// No session, or the auth service rejected it.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The session is valid but no profile record matches it.
    #[error("Profile not found")]
    ProfileNotFound,

    /// Client-side field validation failed.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Image upload to the object store failed.
    #[error("Upload error: {0}")]
    Upload(#[source] AppwriteError),

    /// Document create/update/delete failed.
    #[error("Write error: {0}")]
    Write(#[source] AppwriteError),

    /// Document read failed.
    #[error("Store error: {0}")]
    Store(#[from] AppwriteError),

    /// The seller has no payment-collection link; checkout cannot start.
    #[error("Payment unavailable: seller has no payment link")]
    PaymentUnavailable,

    /// The payment gateway rejected the order-creation call.
    #[error("Payment gateway error: {0}")]
    Gateway(#[from] RazorpayError),

    /// The verification authority rejected or never received the receipt.
    #[error("Payment verification failed: {0}")]
    Verification(String),

    /// Authenticated, but not allowed to touch this resource.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server-side and external-service failures to Sentry
        if matches!(
            self,
            Self::Upload(_)
                | Self::Write(_)
                | Self::Store(_)
                | Self::Gateway(_)
                | Self::Verification(_)
                | Self::Internal(_)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::ProfileNotFound | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Upload(_) | Self::Write(_) | Self::Store(_) | Self::Gateway(_) | Self::Verification(_) => {
                StatusCode::BAD_GATEWAY
            }
            Self::PaymentUnavailable => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Unauthorized(_) => "Unauthorized: Please log in first.".to_string(),
            Self::ProfileNotFound => "Profile not found.".to_string(),
            Self::Upload(_) => "Image upload failed. Please try again.".to_string(),
            Self::Write(_) | Self::Store(_) => "External service error".to_string(),
            Self::PaymentUnavailable => "Farmer payment link not available.".to_string(),
            Self::Gateway(_) | Self::Verification(_) => "Payment failed. Please try again.".to_string(),
            Self::Internal(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_names_fields() {
        let mut err = ValidationError::default();
        err.missing("title");
        err.missing("category");
        err.invalid("price");

        assert_eq!(
            err.to_string(),
            "missing required field(s): title, category; invalid field(s): price"
        );
    }

    #[test]
    fn test_validation_into_result() {
        assert!(ValidationError::default().into_result().is_ok());

        let mut err = ValidationError::default();
        err.missing("image");
        assert!(err.into_result().is_err());
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::Unauthorized("no session".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(get_status(AppError::ProfileNotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            get_status(AppError::PaymentUnavailable),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::BadRequest("bad".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("boom".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product prod-123".to_string());
        assert_eq!(err.to_string(), "Not found: product prod-123");
    }
}
