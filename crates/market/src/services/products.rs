//! Farmer-side product writes (create / update / delete).
//!
//! Creation order matters: validation first (nothing leaves the process on
//! a validation failure), then the image upload, then the document write.
//! A failed upload aborts before any record exists; a failed write after a
//! successful upload leaves an orphaned image, which is accepted (there are
//! no compensating transactions anywhere in this system).

use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use farmstand_core::{FileId, Price, ProductId, UserId};

use crate::appwrite::{ImageUpload, unique_id};
use crate::error::{AppError, Result, ValidationError};
use crate::models::Product;
use crate::state::AppState;

/// Image types the product form accepts.
const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/jpg", "image/webp"];

/// Raw product form fields, as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductForm {
    /// Listing title.
    #[serde(default)]
    pub title: String,
    /// Listing description.
    #[serde(default)]
    pub description: String,
    /// Unit price in whole rupees (raw input).
    #[serde(default)]
    pub price: String,
    /// Units in stock (raw input).
    #[serde(default)]
    pub quantity: String,
    /// Discount percentage (raw input).
    #[serde(default)]
    pub discount: String,
    /// Stock-keeping unit label.
    #[serde(default)]
    pub sku: String,
    /// Category name the product files under.
    #[serde(default)]
    pub category: String,
    /// Whether to surface the product on the home page.
    #[serde(default)]
    pub is_featured: bool,
}

/// A product form after validation and numeric coercion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedProduct {
    pub title: String,
    pub description: String,
    pub price: Price,
    pub quantity: i64,
    pub discount: i64,
    pub sku: String,
    pub category: String,
    pub is_featured: bool,
}

/// Parse an optional integer field, flagging non-numeric input.
///
/// Empty input coerces to 0; only present-but-unparseable input is flagged.
fn parse_numeric(
    raw: &str,
    field: &'static str,
    validation: &mut ValidationError,
) -> i64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0;
    }
    trimmed.parse().unwrap_or_else(|_| {
        validation.invalid(field);
        0
    })
}

/// Validate a product form.
///
/// Title, price, and category are mandatory; an image is mandatory when
/// `require_image` (creation). No network call happens before this passes.
///
/// # Errors
///
/// Returns a [`ValidationError`] naming every missing or invalid field.
pub fn validate(
    form: &ProductForm,
    image: Option<&ImageUpload>,
    require_image: bool,
) -> std::result::Result<ValidatedProduct, ValidationError> {
    let mut validation = ValidationError::default();

    if form.title.trim().is_empty() {
        validation.missing("title");
    }
    if form.price.trim().is_empty() {
        validation.missing("price");
    }
    if form.category.trim().is_empty() {
        validation.missing("category");
    }
    if require_image && image.is_none() {
        validation.missing("image");
    }

    if let Some(image) = image
        && !ALLOWED_IMAGE_TYPES.contains(&image.content_type.as_str())
    {
        validation.invalid("image");
    }

    let price = parse_numeric(&form.price, "price", &mut validation);
    let quantity = parse_numeric(&form.quantity, "quantity", &mut validation);
    let discount = parse_numeric(&form.discount, "discount", &mut validation);

    validation.into_result()?;

    Ok(ValidatedProduct {
        title: form.title.trim().to_owned(),
        description: form.description.trim().to_owned(),
        price: Price::new(price),
        quantity,
        discount,
        sku: form.sku.trim().to_owned(),
        category: form.category.trim().to_owned(),
        is_featured: form.is_featured,
    })
}

/// Outcome of a product deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Image (if any) and record both removed.
    Complete,
    /// The record was removed but the stored image could not be; cleanup is
    /// best-effort and the caller is told.
    ImageCleanupFailed,
}

/// Create a product for the authenticated farmer.
///
/// # Errors
///
/// - [`AppError::Validation`] before anything is uploaded or written.
/// - [`AppError::Upload`] when the image upload fails (no record is
///   created).
/// - [`AppError::Write`] when the document create fails (the uploaded image
///   is not rolled back).
#[instrument(skip(state, form, image), fields(farmer = %farmer_id))]
pub async fn create_product(
    state: &AppState,
    farmer_id: &UserId,
    form: &ProductForm,
    image: Option<ImageUpload>,
) -> Result<Product> {
    let validated = validate(form, image.as_ref(), true)?;
    // validate() guarantees the image is present on the create path
    let image = image.ok_or_else(|| AppError::Internal("image vanished after validation".into()))?;

    let stored = state
        .storage()
        .create_file(&unique_id(), image)
        .await
        .map_err(AppError::Upload)?;

    let product_id = unique_id();
    let now = Utc::now();

    let doc = state
        .documents()
        .create(
            state.products_collection(),
            &product_id,
            json!({
                "productId": product_id,
                "farmerId": farmer_id,
                "title": validated.title,
                "description": validated.description,
                "price": validated.price,
                "quantity": validated.quantity,
                "discount": validated.discount,
                "sku": validated.sku,
                "category": validated.category,
                "isFeatured": validated.is_featured,
                "fileId": stored.id,
                "createdAt": now.to_rfc3339(),
                "updatedAt": now.to_rfc3339(),
            }),
        )
        .await
        .map_err(AppError::Write)?;

    tracing::info!(product = %doc.id, "product created");
    Product::from_document(&doc, state.storage()).map_err(|e| AppError::Internal(e.to_string()))
}

/// Update a product by id.
///
/// Re-uploading the image is optional; when omitted the previous reference
/// is retained.
///
/// # Errors
///
/// - [`AppError::Validation`] on bad fields.
/// - [`AppError::Upload`] when a replacement image fails to upload.
/// - [`AppError::Write`] when the document update fails.
#[instrument(skip(state, form, image))]
pub async fn update_product(
    state: &AppState,
    product_id: &ProductId,
    form: &ProductForm,
    image: Option<ImageUpload>,
) -> Result<Product> {
    let validated = validate(form, image.as_ref(), false)?;

    let mut data = json!({
        "title": validated.title,
        "description": validated.description,
        "price": validated.price,
        "quantity": validated.quantity,
        "discount": validated.discount,
        "sku": validated.sku,
        "category": validated.category,
        "isFeatured": validated.is_featured,
        "updatedAt": Utc::now().to_rfc3339(),
    });

    if let Some(image) = image {
        let stored = state
            .storage()
            .create_file(&unique_id(), image)
            .await
            .map_err(AppError::Upload)?;
        data["fileId"] = json!(stored.id);
    }

    let doc = state
        .documents()
        .update(state.products_collection(), product_id.as_str(), data)
        .await
        .map_err(AppError::Write)?;

    Product::from_document(&doc, state.storage()).map_err(|e| AppError::Internal(e.to_string()))
}

/// Delete a product and its stored image.
///
/// Image deletion is best-effort: a failure is reported via
/// [`DeleteOutcome::ImageCleanupFailed`] but never blocks record deletion.
///
/// # Errors
///
/// Returns [`AppError::Write`] when the record deletion itself fails.
#[instrument(skip(state))]
pub async fn delete_product(
    state: &AppState,
    product_id: &ProductId,
    file_id: Option<&FileId>,
) -> Result<DeleteOutcome> {
    let mut outcome = DeleteOutcome::Complete;

    if let Some(file_id) = file_id {
        if let Err(e) = state.storage().delete_file(file_id.as_str()).await {
            tracing::warn!(error = %e, file = %file_id, "image cleanup failed, deleting record anyway");
            outcome = DeleteOutcome::ImageCleanupFailed;
        }
    }

    state
        .documents()
        .delete(state.products_collection(), product_id.as_str())
        .await
        .map_err(AppError::Write)?;

    tracing::info!(product = %product_id, "product deleted");
    Ok(outcome)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_form() -> ProductForm {
        ProductForm {
            title: "Alphonso Mangoes".to_string(),
            description: "Ripe and ready".to_string(),
            price: "450".to_string(),
            quantity: "20".to_string(),
            discount: "10".to_string(),
            sku: "MNG-01".to_string(),
            category: "Fruits".to_string(),
            is_featured: false,
        }
    }

    fn jpeg() -> ImageUpload {
        ImageUpload {
            filename: "mangoes.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            bytes: vec![0xFF, 0xD8, 0xFF],
        }
    }

    #[test]
    fn test_valid_form_passes() {
        let validated = validate(&valid_form(), Some(&jpeg()), true).unwrap();
        assert_eq!(validated.price, Price::new(450));
        assert_eq!(validated.quantity, 20);
        assert_eq!(validated.discount, 10);
    }

    #[test]
    fn test_missing_title_is_named() {
        // A form like {title: "", price: 50, category: "Fruits"} with a
        // valid image must be rejected before any upload happens; validate()
        // runs before the first network call in create_product().
        let mut form = valid_form();
        form.title = String::new();
        form.price = "50".to_string();

        let err = validate(&form, Some(&jpeg()), true).unwrap_err();
        assert_eq!(err.missing, vec!["title"]);
        assert!(err.invalid.is_empty());
    }

    #[test]
    fn test_missing_image_on_create() {
        let err = validate(&valid_form(), None, true).unwrap_err();
        assert_eq!(err.missing, vec!["image"]);
    }

    #[test]
    fn test_image_optional_on_edit() {
        assert!(validate(&valid_form(), None, false).is_ok());
    }

    #[test]
    fn test_multiple_missing_fields_all_named() {
        let form = ProductForm::default();
        let err = validate(&form, None, true).unwrap_err();
        assert_eq!(err.missing, vec!["title", "price", "category", "image"]);
    }

    #[test]
    fn test_non_numeric_price_is_invalid() {
        let mut form = valid_form();
        form.price = "four fifty".to_string();

        let err = validate(&form, Some(&jpeg()), true).unwrap_err();
        assert_eq!(err.invalid, vec!["price"]);
    }

    #[test]
    fn test_empty_quantity_and_discount_coerce_to_zero() {
        let mut form = valid_form();
        form.quantity = String::new();
        form.discount = "  ".to_string();

        let validated = validate(&form, Some(&jpeg()), true).unwrap();
        assert_eq!(validated.quantity, 0);
        assert_eq!(validated.discount, 0);
    }

    #[test]
    fn test_unsupported_image_type_is_invalid() {
        let mut gif = jpeg();
        gif.content_type = "image/gif".to_string();

        let err = validate(&valid_form(), Some(&gif), true).unwrap_err();
        assert_eq!(err.invalid, vec!["image"]);
    }

    #[test]
    fn test_fields_are_trimmed() {
        let mut form = valid_form();
        form.title = "  Alphonso Mangoes  ".to_string();
        form.category = " Fruits ".to_string();

        let validated = validate(&form, Some(&jpeg()), true).unwrap();
        assert_eq!(validated.title, "Alphonso Mangoes");
        assert_eq!(validated.category, "Fruits");
    }
}
