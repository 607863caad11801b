//! Payment gateway client (order creation for the checkout widget).
//!
//! Only the order-creation endpoint is called from here; the checkout
//! widget runs in the browser and its receipt is forwarded to the external
//! verification authority by the payment bridge.

pub mod types;

pub use types::{GatewayOrder, PaymentReceipt};

use std::sync::Arc;

use secrecy::ExposeSecret;
use serde_json::json;
use thiserror::Error;
use tracing::instrument;

use crate::config::PaymentConfig;

const ORDERS_ENDPOINT: &str = "https://api.razorpay.com/v1/orders";

/// Errors that can occur when talking to the payment gateway.
#[derive(Debug, Error)]
pub enum RazorpayError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway rejected the request.
    #[error("gateway error ({code}): {description}")]
    Api {
        /// Gateway error code (e.g. `BAD_REQUEST_ERROR`).
        code: String,
        /// Human-readable description.
        description: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Client for the payment gateway orders API.
#[derive(Clone)]
pub struct RazorpayClient {
    inner: Arc<RazorpayClientInner>,
}

struct RazorpayClientInner {
    http: reqwest::Client,
    key_id: String,
    key_secret: String,
}

impl RazorpayClient {
    /// Create a new gateway client.
    #[must_use]
    pub fn new(config: &PaymentConfig) -> Self {
        Self {
            inner: Arc::new(RazorpayClientInner {
                http: reqwest::Client::new(),
                key_id: config.key_id.clone(),
                key_secret: config.key_secret.expose_secret().to_string(),
            }),
        }
    }

    /// The public key id, handed to the checkout widget.
    #[must_use]
    pub fn key_id(&self) -> &str {
        &self.inner.key_id
    }

    /// Create a gateway order.
    ///
    /// `amount` is in minor currency units (paise). `payment_capture: 1`
    /// makes the gateway capture the charge as soon as it is authorized.
    ///
    /// # Errors
    ///
    /// Returns an error if the gateway rejects the request or it fails.
    #[instrument(skip(self))]
    pub async fn create_order(
        &self,
        amount: i64,
        currency: &str,
        receipt: &str,
    ) -> Result<GatewayOrder, RazorpayError> {
        let response = self
            .inner
            .http
            .post(ORDERS_ENDPOINT)
            .basic_auth(&self.inner.key_id, Some(&self.inner.key_secret))
            .json(&json!({
                "amount": amount,
                "currency": currency,
                "receipt": receipt,
                "payment_capture": 1,
            }))
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            #[derive(serde::Deserialize)]
            struct ErrorBody {
                error: ErrorDetail,
            }
            #[derive(serde::Deserialize)]
            struct ErrorDetail {
                #[serde(default)]
                code: String,
                #[serde(default)]
                description: String,
            }

            return Err(serde_json::from_str::<ErrorBody>(&text).map_or_else(
                |_| RazorpayError::Api {
                    code: status.to_string(),
                    description: text.chars().take(200).collect(),
                },
                |body| RazorpayError::Api {
                    code: body.error.code,
                    description: body.error.description,
                },
            ));
        }

        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %text.chars().take(300).collect::<String>(),
                "failed to parse gateway order response"
            );
            RazorpayError::Parse(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RazorpayError::Api {
            code: "BAD_REQUEST_ERROR".to_string(),
            description: "amount must be at least INR 1.00".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "gateway error (BAD_REQUEST_ERROR): amount must be at least INR 1.00"
        );
    }
}
