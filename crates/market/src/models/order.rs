//! Order domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use farmstand_core::{OrderId, OrderStatus, PaymentStatus, Price, UserId};

use super::{InvalidDocument, timestamp_field};
use crate::appwrite::Document;

const COLLECTION: &str = "orders";

/// A placed order.
///
/// Products are recorded by title (denormalized), not by id; the order keeps
/// working even if the listing is later edited or deleted.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    /// Order document id.
    pub id: OrderId,
    /// Auth identity of the buyer.
    pub customer_id: UserId,
    /// Auth identity of the seller.
    pub farmer_id: UserId,
    /// Titles of the ordered products.
    pub products: Vec<String>,
    /// Ordered quantity.
    pub quantity: i64,
    /// Total in whole rupees (`unit price * quantity` at placement time).
    pub total_price: Price,
    /// Payment state, flipped to `paid` by the verification step.
    pub payment_status: PaymentStatus,
    /// Fulfilment state (read-only here).
    pub order_status: OrderStatus,
    /// Free-form shipping address string (`"{address}, {phone}"`).
    pub shipping_address: String,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
    /// When the order was last updated.
    pub updated_at: DateTime<Utc>,
}

fn parse_payment_status(raw: &str) -> Option<PaymentStatus> {
    match raw {
        "pending" => Some(PaymentStatus::Pending),
        "paid" => Some(PaymentStatus::Paid),
        _ => None,
    }
}

fn parse_order_status(raw: &str) -> Option<OrderStatus> {
    match raw {
        "pending" => Some(OrderStatus::Pending),
        "shipped" => Some(OrderStatus::Shipped),
        "delivered" => Some(OrderStatus::Delivered),
        _ => None,
    }
}

impl Order {
    /// Map a raw document into an order.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidDocument`] when a required field is missing or a
    /// status value is unknown.
    pub fn from_document(doc: &Document) -> Result<Self, InvalidDocument> {
        let invalid = |field| InvalidDocument::new(COLLECTION, doc, field);

        let customer_id = doc
            .non_empty_field("customerId")
            .ok_or_else(|| invalid("customerId"))?;
        let farmer_id = doc
            .non_empty_field("farmerId")
            .ok_or_else(|| invalid("farmerId"))?;
        let quantity = doc.i64_field("quantity").ok_or_else(|| invalid("quantity"))?;
        let total_price = doc
            .i64_field("totalPrice")
            .ok_or_else(|| invalid("totalPrice"))?;
        let payment_status = doc
            .str_field("paymentStatus")
            .and_then(parse_payment_status)
            .ok_or_else(|| invalid("paymentStatus"))?;
        let order_status = doc
            .str_field("orderStatus")
            .and_then(parse_order_status)
            .ok_or_else(|| invalid("orderStatus"))?;

        Ok(Self {
            id: OrderId::new(&doc.id),
            customer_id: UserId::new(customer_id),
            farmer_id: UserId::new(farmer_id),
            products: doc.str_list_field("products").unwrap_or_default(),
            quantity,
            total_price: Price::new(total_price),
            payment_status,
            order_status,
            shipping_address: doc
                .str_field("shippingAddress")
                .unwrap_or_default()
                .to_owned(),
            created_at: timestamp_field(doc, "createdAt", &doc.created_at)
                .ok_or_else(|| invalid("createdAt"))?,
            updated_at: timestamp_field(doc, "updatedAt", &doc.updated_at)
                .ok_or_else(|| invalid("updatedAt"))?,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn order_json() -> serde_json::Value {
        serde_json::json!({
            "$id": "ord1",
            "$createdAt": "2025-03-05T12:00:00+00:00",
            "$updatedAt": "2025-03-05T12:00:00+00:00",
            "customerId": "cust1",
            "farmerId": "farm1",
            "products": ["Alphonso Mangoes"],
            "quantity": 3,
            "totalPrice": 1350,
            "paymentStatus": "pending",
            "orderStatus": "pending",
            "shippingAddress": "12 Lake Road, 9876543210",
            "createdAt": "2025-03-05T12:00:00+00:00",
            "updatedAt": "2025-03-05T12:00:00+00:00",
        })
    }

    #[test]
    fn test_from_document() {
        let doc: Document = serde_json::from_value(order_json()).unwrap();
        let order = Order::from_document(&doc).unwrap();

        assert_eq!(order.total_price, Price::new(1350));
        assert_eq!(order.payment_status, PaymentStatus::Pending);
        assert_eq!(order.order_status, OrderStatus::Pending);
        assert_eq!(order.products, vec!["Alphonso Mangoes".to_string()]);
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let mut json = order_json();
        json["paymentStatus"] = serde_json::json!("refunded");
        let doc: Document = serde_json::from_value(json).unwrap();

        let err = Order::from_document(&doc).unwrap_err();
        assert_eq!(err.field, "paymentStatus");
    }

    #[test]
    fn test_missing_customer_is_rejected() {
        let mut json = order_json();
        json.as_object_mut().unwrap().remove("customerId");
        let doc: Document = serde_json::from_value(json).unwrap();

        assert!(Order::from_document(&doc).is_err());
    }
}
