//! Payments API route handlers.
//!
//! The checkout widget runs in the browser; these endpoints bracket it:
//! `checkout` creates the gateway order and returns the widget options,
//! `verify` forwards the widget's receipt to the verification authority.

use axum::{Json, extract::State};
use serde::Deserialize;

use farmstand_core::ProductId;

use crate::error::Result;
use crate::middleware::auth::RequireCustomer;
use crate::services::payments::{self, CheckoutSession, VerificationRequest};
use crate::state::AppState;

/// Checkout request body.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub product_id: ProductId,
}

/// Start a checkout for a product.
///
/// Responds 409 when the seller has no payment-collection link, so the
/// client shows the explicit "unavailable" state instead of opening the
/// widget.
pub async fn checkout(
    State(state): State<AppState>,
    RequireCustomer(customer): RequireCustomer,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<CheckoutSession>> {
    let session = payments::initiate(&state, &request.product_id, &customer).await?;
    Ok(Json(session))
}

/// Forward a widget receipt for verification.
pub async fn verify(
    State(state): State<AppState>,
    RequireCustomer(_customer): RequireCustomer,
    Json(request): Json<VerificationRequest>,
) -> Result<Json<serde_json::Value>> {
    payments::verify(&state, &request).await?;
    Ok(Json(serde_json::json!({ "status": "verified" })))
}
