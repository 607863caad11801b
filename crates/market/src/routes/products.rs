//! Farmer-side product route handlers.
//!
//! Create and update take multipart forms (text fields + optional image
//! file). Only the owning farmer may touch a listing.

use axum::{
    Json,
    extract::{Multipart, Path, State},
};
use serde::Serialize;

use farmstand_core::ProductId;

use crate::appwrite::ImageUpload;
use crate::error::{AppError, Result};
use crate::layout::LayoutMode;
use crate::middleware::auth::RequireFarmer;
use crate::models::{CurrentUser, Product};
use crate::services::{
    catalog,
    products::{self, DeleteOutcome, ProductForm},
};
use crate::state::AppState;

/// Farmer dashboard payload.
#[derive(Debug, Serialize)]
pub struct FarmerDashboardView {
    pub layout: LayoutMode,
    pub name: String,
    pub products: Vec<Product>,
}

/// Deletion result payload; degraded success is distinct from silent
/// success.
#[derive(Debug, Serialize)]
pub struct DeleteView {
    pub status: &'static str,
}

/// Read a multipart product form into fields plus an optional image.
///
/// An image part with no filename (the browser's empty file input) counts
/// as no image.
async fn read_product_form(
    multipart: &mut Multipart,
) -> Result<(ProductForm, Option<ImageUpload>)> {
    let mut form = ProductForm::default();
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("malformed form: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_owned();

        if name == "image" {
            let filename = field.file_name().unwrap_or_default().to_owned();
            let content_type = field.content_type().unwrap_or_default().to_owned();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("malformed image: {e}")))?;

            if !filename.is_empty() && !bytes.is_empty() {
                image = Some(ImageUpload {
                    filename,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(format!("malformed field {name}: {e}")))?;

        match name.as_str() {
            "title" => form.title = value,
            "description" => form.description = value,
            "price" => form.price = value,
            "quantity" => form.quantity = value,
            "discount" => form.discount = value,
            "sku" => form.sku = value,
            "category" => form.category = value,
            "is_featured" => form.is_featured = matches!(value.as_str(), "true" | "on" | "1"),
            _ => {}
        }
    }

    Ok((form, image))
}

/// Fetch a product and check the caller owns it.
async fn owned_product(
    state: &AppState,
    farmer: &CurrentUser,
    product_id: &ProductId,
) -> Result<Product> {
    let product = catalog::fetch_product(state, product_id).await?;
    if product.farmer_id != farmer.user_id {
        return Err(AppError::Forbidden(format!(
            "product {product_id} belongs to another farmer"
        )));
    }
    Ok(product)
}

/// Farmer dashboard: own listings under farmer chrome.
pub async fn dashboard(
    State(state): State<AppState>,
    RequireFarmer(farmer): RequireFarmer,
) -> Result<Json<FarmerDashboardView>> {
    let products = catalog::fetch_farmer_products(&state, farmer.user_id.as_str()).await?;
    Ok(Json(FarmerDashboardView {
        layout: LayoutMode::from_path("/farmer"),
        name: farmer.name,
        products,
    }))
}

/// The logged-in farmer's product listings.
pub async fn my_products(
    State(state): State<AppState>,
    RequireFarmer(farmer): RequireFarmer,
) -> Result<Json<Vec<Product>>> {
    let products = catalog::fetch_farmer_products(&state, farmer.user_id.as_str()).await?;
    Ok(Json(products))
}

/// Create a product listing.
pub async fn create(
    State(state): State<AppState>,
    RequireFarmer(farmer): RequireFarmer,
    mut multipart: Multipart,
) -> Result<Json<Product>> {
    let (form, image) = read_product_form(&mut multipart).await?;
    let product = products::create_product(&state, &farmer.user_id, &form, image).await?;
    Ok(Json(product))
}

/// Update an owned product listing; image re-upload optional.
pub async fn update(
    State(state): State<AppState>,
    RequireFarmer(farmer): RequireFarmer,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<Product>> {
    let product_id = ProductId::new(id);
    owned_product(&state, &farmer, &product_id).await?;

    let (form, image) = read_product_form(&mut multipart).await?;
    let product = products::update_product(&state, &product_id, &form, image).await?;
    Ok(Json(product))
}

/// Delete an owned product listing and its image (best-effort).
pub async fn delete(
    State(state): State<AppState>,
    RequireFarmer(farmer): RequireFarmer,
    Path(id): Path<String>,
) -> Result<Json<DeleteView>> {
    let product_id = ProductId::new(id);
    let product = owned_product(&state, &farmer, &product_id).await?;

    let outcome = products::delete_product(&state, &product_id, product.file_id.as_ref()).await?;

    Ok(Json(DeleteView {
        status: match outcome {
            DeleteOutcome::Complete => "deleted",
            DeleteOutcome::ImageCleanupFailed => "deleted_image_cleanup_failed",
        },
    }))
}
