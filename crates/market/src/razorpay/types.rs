//! Wire types for the payment gateway.

use serde::{Deserialize, Serialize};

/// An order created on the gateway, consumed by the checkout widget.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GatewayOrder {
    /// Gateway order handle (e.g. `order_9A33XWu170gUtm`).
    pub id: String,
    /// Amount in minor currency units.
    pub amount: i64,
    /// ISO currency code.
    pub currency: String,
    /// Our receipt id echoed back.
    #[serde(default)]
    pub receipt: String,
    /// Gateway-side order status.
    #[serde(default)]
    pub status: String,
}

/// The receipt the checkout widget hands back after a successful charge.
///
/// Field names follow the widget's callback payload verbatim.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaymentReceipt {
    /// Gateway order handle.
    pub razorpay_order_id: String,
    /// Gateway payment id.
    pub razorpay_payment_id: String,
    /// Signature over order id + payment id, checked by the verification
    /// authority.
    pub razorpay_signature: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_order_parses_minimal_response() {
        let order: GatewayOrder = serde_json::from_str(
            r#"{"id":"order_9A33XWu170gUtm","amount":30000,"currency":"INR"}"#,
        )
        .unwrap();
        assert_eq!(order.id, "order_9A33XWu170gUtm");
        assert_eq!(order.amount, 30_000);
        assert!(order.receipt.is_empty());
    }

    #[test]
    fn test_receipt_round_trip() {
        let receipt = PaymentReceipt {
            razorpay_order_id: "order_1".to_string(),
            razorpay_payment_id: "pay_1".to_string(),
            razorpay_signature: "sig".to_string(),
        };
        let json = serde_json::to_value(&receipt).unwrap();
        assert_eq!(json["razorpay_order_id"], "order_1");
    }
}
