//! Payment bridge: seller link resolution, gateway order creation, and
//! receipt verification.
//!
//! Fire-and-forget by design: nothing here retries, and nothing rolls back
//! an already-created order record. An order can sit in `pending` payment
//! forever, and a verified charge whose status write fails stays `pending`
//! too - both are surfaced as warnings only.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;

use chrono::Utc;
use farmstand_core::{OrderId, ProductId, UserId};

use crate::appwrite::unique_id;
use crate::error::{AppError, Result};
use crate::models::CurrentUser;
use crate::razorpay::PaymentReceipt;
use crate::services::{catalog, profile};
use crate::state::AppState;

/// Currency every gateway order is created in.
const CURRENCY: &str = "INR";

/// Everything the checkout widget needs to open.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutSession {
    /// Gateway key id.
    pub key: String,
    /// Amount in minor currency units.
    pub amount: i64,
    /// ISO currency code.
    pub currency: String,
    /// Gateway order handle.
    pub order_id: String,
    /// Merchant display name.
    pub name: String,
    /// Line shown in the widget.
    pub description: String,
    /// Prefilled buyer contact info.
    pub prefill: CheckoutPrefill,
}

/// Buyer contact info prefilled into the widget.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutPrefill {
    pub name: String,
    pub email: String,
    pub contact: String,
}

/// Receipt forwarded to the verification authority.
#[derive(Debug, Clone, Deserialize)]
pub struct VerificationRequest {
    /// The widget's receipt triple.
    #[serde(flatten)]
    pub receipt: PaymentReceipt,
    /// Product the charge was for.
    pub product_id: ProductId,
    /// Buyer identity.
    pub customer_id: UserId,
    /// Seller identity.
    pub farmer_id: UserId,
    /// Charged amount in whole rupees.
    pub total_price: i64,
    /// Order record to flip to `paid` after verification, when one exists.
    #[serde(default)]
    pub order_id: Option<OrderId>,
}

/// Resolve the seller's payment-collection link.
///
/// # Errors
///
/// Returns [`AppError::PaymentUnavailable`] when the seller has no link;
/// checkout must not be attempted in that case.
pub async fn seller_payment_link(state: &AppState, farmer_id: &UserId) -> Result<String> {
    let farmer = profile::profile_by_user_id(state, farmer_id.as_str())
        .await
        .map_err(|e| match e {
            AppError::ProfileNotFound => AppError::PaymentUnavailable,
            other => other,
        })?;

    farmer.payment_link.ok_or(AppError::PaymentUnavailable)
}

/// Start a checkout for a product.
///
/// Looks up the seller's payment link, creates the gateway order (amount in
/// paise), and returns the widget descriptor. Side effects only; the caller
/// renders the descriptor and the widget takes over.
///
/// # Errors
///
/// - [`AppError::PaymentUnavailable`] when the seller has no payment link
///   (no gateway call is made).
/// - [`AppError::Gateway`] when order creation fails.
#[instrument(skip(state, customer), fields(product = %product_id))]
pub async fn initiate(
    state: &AppState,
    product_id: &ProductId,
    customer: &CurrentUser,
) -> Result<CheckoutSession> {
    let product = catalog::fetch_product(state, product_id).await?;

    // An absent link is an explicit "unavailable" state, not a failed
    // checkout attempt.
    let _link = seller_payment_link(state, &product.farmer_id).await?;

    let receipt = format!("receipt_{}", unique_id());
    let order = state
        .razorpay()
        .create_order(product.price.to_minor_units(), CURRENCY, &receipt)
        .await?;

    Ok(CheckoutSession {
        key: state.razorpay().key_id().to_owned(),
        amount: order.amount,
        currency: order.currency,
        order_id: order.id,
        name: "Farmstand".to_owned(),
        description: format!("Payment for {}", product.title),
        prefill: CheckoutPrefill {
            name: customer.name.clone(),
            email: customer.email.to_string(),
            contact: customer.phone.clone(),
        },
    })
}

/// Forward a widget receipt to the verification authority, then flip the
/// order's payment status best-effort.
///
/// # Errors
///
/// Returns [`AppError::Verification`] when the authority is unreachable or
/// rejects the receipt. A failed status write after successful verification
/// is logged, not returned - there is no reconciliation job.
#[instrument(skip(state, request), fields(order = %request.receipt.razorpay_order_id))]
pub async fn verify(state: &AppState, request: &VerificationRequest) -> Result<()> {
    let response = state
        .http()
        .post(&state.config().payment.verify_url)
        .json(&json!({
            "razorpay_order_id": request.receipt.razorpay_order_id,
            "razorpay_payment_id": request.receipt.razorpay_payment_id,
            "razorpay_signature": request.receipt.razorpay_signature,
            "productId": request.product_id,
            "customerId": request.customer_id,
            "farmerId": request.farmer_id,
            "totalPrice": request.total_price,
        }))
        .send()
        .await
        .map_err(|e| AppError::Verification(e.to_string()))?;

    if !response.status().is_success() {
        return Err(AppError::Verification(format!(
            "verification authority returned {}",
            response.status()
        )));
    }

    if let Some(order_id) = &request.order_id {
        let update = state
            .documents()
            .update(
                state.orders_collection(),
                order_id.as_str(),
                json!({
                    "paymentStatus": "paid",
                    "updatedAt": Utc::now().to_rfc3339(),
                }),
            )
            .await;

        if let Err(e) = update {
            tracing::warn!(
                error = %e,
                order = %order_id,
                "payment verified but status write failed; order stays pending"
            );
        }
    }

    Ok(())
}
