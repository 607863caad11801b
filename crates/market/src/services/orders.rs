//! The order draft state machine and order reads.
//!
//! A draft moves `Editing -> Submitting -> Placed`, or `Editing ->
//! Submitting -> Failed -> Editing`. Every quantity change recomputes the
//! total; a failed submission keeps every entered field so the buyer can
//! retry without retyping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;

use farmstand_core::{Price, ProductId, UserId};

use crate::appwrite::{Query, unique_id};
use crate::error::{AppError, Result, ValidationError};
use crate::models::{CurrentUser, Order, Product, convert_all};
use crate::state::AppState;

/// Where a draft is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftState {
    /// Accepting edits.
    Editing,
    /// The order record is being created.
    Submitting,
    /// The record exists; the draft is finished (terminal).
    Placed,
    /// The write failed; edits return the draft to `Editing`.
    Failed,
}

/// Shipping form fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShippingDetails {
    /// Recipient name.
    #[serde(default)]
    pub full_name: String,
    /// Contact email.
    #[serde(default)]
    pub email: String,
    /// Delivery address.
    #[serde(default)]
    pub address: String,
    /// Contact phone.
    #[serde(default)]
    pub phone: String,
}

impl ShippingDetails {
    /// Flag every empty field.
    fn validate(&self, validation: &mut ValidationError) {
        if self.full_name.trim().is_empty() {
            validation.missing("full_name");
        }
        if self.email.trim().is_empty() {
            validation.missing("email");
        }
        if self.address.trim().is_empty() {
            validation.missing("address");
        }
        if self.phone.trim().is_empty() {
            validation.missing("phone");
        }
    }
}

/// A single-product order being composed.
#[derive(Debug, Clone, Serialize)]
pub struct OrderDraft {
    /// The product being ordered.
    pub product_id: ProductId,
    /// Denormalized product title recorded on the order.
    pub product_title: String,
    /// Seller the order is routed to.
    pub farmer_id: UserId,
    /// Unit price at draft time.
    pub unit_price: Price,
    /// Shipping fields.
    pub shipping: ShippingDetails,
    /// Ordered quantity, always >= 1.
    pub quantity: i64,
    /// `unit_price * quantity`, recomputed on every quantity change.
    pub total_price: Price,
    /// Lifecycle state.
    pub state: DraftState,
}

impl OrderDraft {
    /// Start a draft for one product, quantity 1.
    #[must_use]
    pub fn new(product: &Product) -> Self {
        Self {
            product_id: product.id.clone(),
            product_title: product.title.clone(),
            farmer_id: product.farmer_id.clone(),
            unit_price: product.price,
            shipping: ShippingDetails::default(),
            quantity: 1,
            total_price: product.price,
            state: DraftState::Editing,
        }
    }

    fn recompute_total(&mut self) {
        self.total_price = self.unit_price.times(self.quantity);
    }

    /// Any edit after a failure returns the draft to `Editing`, keeping the
    /// entered values.
    fn resume_editing(&mut self) {
        if self.state == DraftState::Failed {
            self.state = DraftState::Editing;
        }
    }

    /// Set the quantity, clamping to a minimum of 1, and recompute the
    /// total.
    pub fn set_quantity(&mut self, quantity: i64) {
        self.resume_editing();
        self.quantity = quantity.max(1);
        self.recompute_total();
    }

    /// Set the quantity from raw input; non-numeric input coerces to 1.
    pub fn set_quantity_input(&mut self, raw: &str) {
        let parsed = raw.trim().parse::<i64>().unwrap_or(1);
        self.set_quantity(parsed);
    }

    /// Replace the shipping fields.
    pub fn set_shipping(&mut self, shipping: ShippingDetails) {
        self.resume_editing();
        self.shipping = shipping;
    }

    /// Attempt the `Editing -> Submitting` transition.
    ///
    /// Refused (draft stays in `Editing`) unless every shipping field is
    /// non-empty and a customer identity is resolved.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the empty fields, with
    /// `customer` flagged when no identity is available.
    pub fn begin_submit(
        &mut self,
        customer_id: Option<&UserId>,
    ) -> std::result::Result<(), ValidationError> {
        self.resume_editing();

        let mut validation = ValidationError::default();
        self.shipping.validate(&mut validation);
        if customer_id.is_none() {
            validation.missing("customer");
        }

        validation.into_result()?;
        self.state = DraftState::Submitting;
        Ok(())
    }

    /// The record was created; the draft is done.
    pub fn mark_placed(&mut self) {
        self.state = DraftState::Placed;
    }

    /// The write failed; field values are kept for the retry.
    pub fn mark_failed(&mut self) {
        self.state = DraftState::Failed;
    }

    /// Build the order document for the store.
    ///
    /// Both status fields start `pending`; the shipping address is stored
    /// as one `"{address}, {phone}"` string.
    #[must_use]
    pub fn to_document(&self, customer_id: &UserId, now: DateTime<Utc>) -> serde_json::Value {
        json!({
            "quantity": self.quantity,
            "customerId": customer_id,
            "farmerId": self.farmer_id,
            "paymentStatus": "pending",
            "products": [self.product_title],
            "totalPrice": self.total_price,
            "orderStatus": "pending",
            "shippingAddress": format!("{}, {}", self.shipping.address.trim(), self.shipping.phone.trim()),
            "createdAt": now.to_rfc3339(),
            "updatedAt": now.to_rfc3339(),
        })
    }
}

/// Drive a draft through submission: create the order record and advance
/// the state machine.
///
/// # Errors
///
/// - [`AppError::Validation`] when the `Editing -> Submitting` transition
///   is refused (the draft is unchanged).
/// - [`AppError::Write`] when the record create fails; the draft is in
///   `Failed` with all fields intact.
#[instrument(skip(state, draft), fields(product = %draft.product_id))]
pub async fn place_order(
    state: &AppState,
    customer: &CurrentUser,
    draft: &mut OrderDraft,
) -> Result<Order> {
    draft.begin_submit(Some(&customer.user_id))?;

    let order_id = unique_id();
    let document = draft.to_document(&customer.user_id, Utc::now());

    let created = state
        .documents()
        .create(state.orders_collection(), &order_id, document)
        .await;

    match created {
        Ok(doc) => {
            draft.mark_placed();
            tracing::info!(order = %doc.id, total = %draft.total_price, "order placed");
            Order::from_document(&doc).map_err(|e| AppError::Internal(e.to_string()))
        }
        Err(e) => {
            draft.mark_failed();
            Err(AppError::Write(e))
        }
    }
}

/// Orders placed by one customer.
///
/// # Errors
///
/// Returns [`AppError::Store`] on a failed read.
pub async fn customer_orders(state: &AppState, customer_id: &UserId) -> Result<Vec<Order>> {
    let page = state
        .documents()
        .list(
            state.orders_collection(),
            &[Query::equal("customerId", customer_id.as_str())],
        )
        .await?;

    Ok(convert_all(&page.documents, Order::from_document))
}

/// Orders routed to one farmer.
///
/// # Errors
///
/// Returns [`AppError::Store`] on a failed read.
pub async fn farmer_orders(state: &AppState, farmer_id: &UserId) -> Result<Vec<Order>> {
    let page = state
        .documents()
        .list(
            state.orders_collection(),
            &[Query::equal("farmerId", farmer_id.as_str())],
        )
        .await?;

    Ok(convert_all(&page.documents, Order::from_document))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use farmstand_core::Price;

    use super::*;
    use crate::models::PLACEHOLDER_IMAGE;

    fn product() -> Product {
        Product {
            id: ProductId::new("prod1"),
            farmer_id: UserId::new("farmer1"),
            title: "Alphonso Mangoes".to_string(),
            description: String::new(),
            price: Price::new(100),
            quantity: 50,
            discount: 0,
            sku: String::new(),
            category: "Fruits".to_string(),
            is_featured: false,
            file_id: None,
            image_url: PLACEHOLDER_IMAGE.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn filled_shipping() -> ShippingDetails {
        ShippingDetails {
            full_name: "Asha Patel".to_string(),
            email: "asha@example.com".to_string(),
            address: "12 Lake Road".to_string(),
            phone: "9876543210".to_string(),
        }
    }

    #[test]
    fn test_new_draft_totals_one_unit() {
        let draft = OrderDraft::new(&product());
        assert_eq!(draft.quantity, 1);
        assert_eq!(draft.total_price, Price::new(100));
        assert_eq!(draft.state, DraftState::Editing);
    }

    #[test]
    fn test_total_recomputed_on_every_quantity_change() {
        let mut draft = OrderDraft::new(&product());

        draft.set_quantity(3);
        assert_eq!(draft.total_price, Price::new(300));

        draft.set_quantity(7);
        assert_eq!(draft.total_price, Price::new(700));
    }

    #[test]
    fn test_quantity_clamped_to_minimum_one() {
        let mut draft = OrderDraft::new(&product());

        draft.set_quantity(0);
        assert_eq!(draft.quantity, 1);

        draft.set_quantity(-5);
        assert_eq!(draft.quantity, 1);
        assert_eq!(draft.total_price, Price::new(100));
    }

    #[test]
    fn test_non_numeric_quantity_coerces_to_one() {
        let mut draft = OrderDraft::new(&product());
        draft.set_quantity(4);

        draft.set_quantity_input("lots");
        assert_eq!(draft.quantity, 1);
        assert_eq!(draft.total_price, Price::new(100));
    }

    #[test]
    fn test_submit_refused_with_empty_shipping() {
        let mut draft = OrderDraft::new(&product());
        let customer = UserId::new("cust1");

        let err = draft.begin_submit(Some(&customer)).unwrap_err();
        assert_eq!(err.missing, vec!["full_name", "email", "address", "phone"]);
        assert_eq!(draft.state, DraftState::Editing);
    }

    #[test]
    fn test_submit_refused_without_customer_identity() {
        let mut draft = OrderDraft::new(&product());
        draft.set_shipping(filled_shipping());

        let err = draft.begin_submit(None).unwrap_err();
        assert_eq!(err.missing, vec!["customer"]);
        assert_eq!(draft.state, DraftState::Editing);
    }

    #[test]
    fn test_submit_transition() {
        let mut draft = OrderDraft::new(&product());
        draft.set_shipping(filled_shipping());
        let customer = UserId::new("cust1");

        draft.begin_submit(Some(&customer)).unwrap();
        assert_eq!(draft.state, DraftState::Submitting);

        draft.mark_placed();
        assert_eq!(draft.state, DraftState::Placed);
    }

    #[test]
    fn test_failure_keeps_fields_and_resumes_editing() {
        let mut draft = OrderDraft::new(&product());
        draft.set_shipping(filled_shipping());
        draft.set_quantity(3);
        draft.begin_submit(Some(&UserId::new("cust1"))).unwrap();

        draft.mark_failed();
        assert_eq!(draft.state, DraftState::Failed);
        assert_eq!(draft.shipping.full_name, "Asha Patel");
        assert_eq!(draft.total_price, Price::new(300));

        // The next edit returns to Editing without losing anything
        draft.set_quantity(3);
        assert_eq!(draft.state, DraftState::Editing);
        assert_eq!(draft.shipping.address, "12 Lake Road");
    }

    #[test]
    fn test_order_document_starts_pending_with_computed_total() {
        let mut draft = OrderDraft::new(&product());
        draft.set_shipping(filled_shipping());
        draft.set_quantity(3);

        let now = Utc.with_ymd_and_hms(2025, 3, 5, 12, 0, 0).unwrap();
        let doc = draft.to_document(&UserId::new("cust1"), now);

        assert_eq!(doc["paymentStatus"], "pending");
        assert_eq!(doc["orderStatus"], "pending");
        assert_eq!(doc["totalPrice"], 300);
        assert_eq!(doc["quantity"], 3);
        assert_eq!(doc["products"], serde_json::json!(["Alphonso Mangoes"]));
        assert_eq!(doc["shippingAddress"], "12 Lake Road, 9876543210");
        assert_eq!(doc["customerId"], "cust1");
        assert_eq!(doc["farmerId"], "farmer1");
    }
}
