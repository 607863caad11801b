//! Order route handlers (customer checkout and both order lists).

use axum::{
    Form, Json,
    extract::State,
    response::Redirect,
};
use serde::{Deserialize, Serialize};

use farmstand_core::ProductId;

use crate::error::Result;
use crate::layout::LayoutMode;
use crate::middleware::auth::{RequireCustomer, RequireFarmer};
use crate::models::Order;
use crate::services::{
    catalog,
    orders::{self, OrderDraft, ShippingDetails},
};
use crate::state::AppState;

/// Customer dashboard payload.
#[derive(Debug, Serialize)]
pub struct CustomerDashboardView {
    pub layout: LayoutMode,
    pub name: String,
    pub orders: Vec<Order>,
}

/// Checkout form: the product plus shipping fields.
///
/// Quantity arrives raw; the draft coerces it (minimum 1, non-numeric
/// becomes 1).
#[derive(Debug, Deserialize)]
pub struct PlaceOrderForm {
    pub product_id: ProductId,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub quantity: String,
}

/// Customer dashboard: order history under customer chrome.
pub async fn dashboard(
    State(state): State<AppState>,
    RequireCustomer(customer): RequireCustomer,
) -> Result<Json<CustomerDashboardView>> {
    let orders = orders::customer_orders(&state, &customer.user_id).await?;
    Ok(Json(CustomerDashboardView {
        layout: LayoutMode::from_path("/customer"),
        name: customer.name,
        orders,
    }))
}

/// Order history for the logged-in customer.
pub async fn my_orders(
    State(state): State<AppState>,
    RequireCustomer(customer): RequireCustomer,
) -> Result<Json<Vec<Order>>> {
    let orders = orders::customer_orders(&state, &customer.user_id).await?;
    Ok(Json(orders))
}

/// Place an order: build the draft, run it through submission, and leave
/// the checkout page.
///
/// Validation failures return 400 naming the empty fields; a failed write
/// surfaces as a gateway error and the client re-renders the form with the
/// values it already holds.
pub async fn place(
    State(state): State<AppState>,
    RequireCustomer(customer): RequireCustomer,
    Form(form): Form<PlaceOrderForm>,
) -> Result<Redirect> {
    let product = catalog::fetch_product(&state, &form.product_id).await?;

    let mut draft = OrderDraft::new(&product);
    draft.set_shipping(ShippingDetails {
        full_name: form.full_name,
        email: form.email,
        address: form.address,
        phone: form.phone,
    });
    draft.set_quantity_input(&form.quantity);

    orders::place_order(&state, &customer, &mut draft).await?;

    Ok(Redirect::to("/customer/orders"))
}

/// Incoming orders for the logged-in farmer (read-only).
pub async fn farmer_orders(
    State(state): State<AppState>,
    RequireFarmer(farmer): RequireFarmer,
) -> Result<Json<Vec<Order>>> {
    let orders = orders::farmer_orders(&state, &farmer.user_id).await?;
    Ok(Json(orders))
}
