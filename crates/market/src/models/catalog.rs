//! Catalog domain types (categories and products).

use chrono::{DateTime, Utc};
use serde::Serialize;

use farmstand_core::{CategoryId, FileId, Price, ProductId, UserId};

use super::{InvalidDocument, timestamp_field};
use crate::appwrite::{Document, Storage};

/// Fixed fallback shown when a product has no stored image, or the stored
/// reference fails to load at render time.
pub const PLACEHOLDER_IMAGE: &str = "/static/placeholder.png";

const CATEGORIES: &str = "categories";
const PRODUCTS: &str = "products";

/// A product category.
#[derive(Debug, Clone, Serialize)]
pub struct Category {
    /// Category document id.
    pub id: CategoryId,
    /// Sequential display number assigned at creation.
    pub category_id: i64,
    /// Unique display name; products reference it by string.
    pub name: String,
    /// Description shown on the category page.
    pub description: String,
    /// Category image reference or URL.
    pub image: String,
    /// When the category was created.
    pub created_at: DateTime<Utc>,
    /// When the category was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Map a raw document into a category.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidDocument`] when a required field is missing.
    pub fn from_document(doc: &Document) -> Result<Self, InvalidDocument> {
        let invalid = |field| InvalidDocument::new(CATEGORIES, doc, field);

        let name = doc.non_empty_field("name").ok_or_else(|| invalid("name"))?;

        Ok(Self {
            id: CategoryId::new(&doc.id),
            category_id: doc.i64_field("categoryId").unwrap_or(0),
            name: name.to_owned(),
            description: doc
                .non_empty_field("description")
                .unwrap_or("No description available")
                .to_owned(),
            image: doc.str_field("image").unwrap_or_default().to_owned(),
            created_at: timestamp_field(doc, "createdAt", &doc.created_at)
                .ok_or_else(|| invalid("createdAt"))?,
            updated_at: timestamp_field(doc, "updatedAt", &doc.updated_at)
                .ok_or_else(|| invalid("updatedAt"))?,
        })
    }
}

/// A product listed by a farmer.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    /// Product document id.
    pub id: ProductId,
    /// Auth identity of the owning farmer.
    pub farmer_id: UserId,
    /// Listing title.
    pub title: String,
    /// Listing description.
    pub description: String,
    /// Unit price in whole rupees.
    pub price: Price,
    /// Units in stock.
    pub quantity: i64,
    /// Discount percentage.
    pub discount: i64,
    /// Stock-keeping unit label.
    pub sku: String,
    /// Denormalized category name; matched against `Category::name` by
    /// trimmed, case-folded equality (a mismatch hides the product, it
    /// never errors).
    pub category: String,
    /// Whether the product is surfaced on the home page.
    pub is_featured: bool,
    /// Stored image reference, when one exists.
    pub file_id: Option<FileId>,
    /// Display URL resolved at read time ([`PLACEHOLDER_IMAGE`] when the
    /// reference is absent).
    pub image_url: String,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Map a raw document into a product, resolving the image URL.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidDocument`] when a required field is missing or
    /// malformed.
    pub fn from_document(doc: &Document, storage: &Storage) -> Result<Self, InvalidDocument> {
        let invalid = |field| InvalidDocument::new(PRODUCTS, doc, field);

        let farmer_id = doc
            .non_empty_field("farmerId")
            .ok_or_else(|| invalid("farmerId"))?;
        let title = doc.non_empty_field("title").ok_or_else(|| invalid("title"))?;
        let price = doc.i64_field("price").ok_or_else(|| invalid("price"))?;
        let category = doc
            .non_empty_field("category")
            .ok_or_else(|| invalid("category"))?;

        let file_id = doc.non_empty_field("fileId").map(FileId::new);
        let image_url = file_id.as_ref().map_or_else(
            || PLACEHOLDER_IMAGE.to_owned(),
            |id| storage.file_view_url(id.as_str()),
        );

        Ok(Self {
            id: ProductId::new(&doc.id),
            farmer_id: UserId::new(farmer_id),
            title: title.to_owned(),
            description: doc.str_field("description").unwrap_or_default().to_owned(),
            price: Price::new(price),
            quantity: doc.i64_field("quantity").unwrap_or(0),
            discount: doc.i64_field("discount").unwrap_or(0),
            sku: doc.str_field("sku").unwrap_or_default().to_owned(),
            category: category.to_owned(),
            is_featured: doc.bool_field("isFeatured").unwrap_or(false),
            file_id,
            image_url,
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
    use secrecy::SecretString;

    use super::*;
    use crate::appwrite::AppwriteClient;
    use crate::config::AppwriteConfig;

    fn test_storage() -> Storage {
        let config = AppwriteConfig {
            endpoint: "https://cloud.appwrite.io/v1".to_string(),
            project_id: "farmstand".to_string(),
            api_key: SecretString::from("k9$Jq2!xB7@mR4#vZ8&wN1*pT5^cL0"),
            database_id: "marketplace".to_string(),
            users_collection_id: "users".to_string(),
            products_collection_id: "products".to_string(),
            categories_collection_id: "categories".to_string(),
            orders_collection_id: "orders".to_string(),
            bucket_id: "product-images".to_string(),
        };
        Storage::new(AppwriteClient::new(&config), &config)
    }

    fn product_json() -> serde_json::Value {
        serde_json::json!({
            "$id": "prod1",
            "$createdAt": "2025-03-02T08:00:00+00:00",
            "$updatedAt": "2025-03-02T08:00:00+00:00",
            "farmerId": "auth1",
            "title": "Alphonso Mangoes",
            "description": "Ripe and ready",
            "price": 450,
            "quantity": 20,
            "discount": 10,
            "sku": "MNG-01",
            "category": "Fruits",
            "isFeatured": true,
            "fileId": "img1",
            "createdAt": "2025-03-02T08:00:00+00:00",
            "updatedAt": "2025-03-02T08:00:00+00:00",
        })
    }

    #[test]
    fn test_product_from_document() {
        let doc: Document = serde_json::from_value(product_json()).unwrap();
        let product = Product::from_document(&doc, &test_storage()).unwrap();

        assert_eq!(product.title, "Alphonso Mangoes");
        assert_eq!(product.price, Price::new(450));
        assert!(product.is_featured);
        assert!(product.image_url.contains("/files/img1/view"));
    }

    #[test]
    fn test_product_without_image_gets_placeholder() {
        let mut json = product_json();
        json.as_object_mut().unwrap().remove("fileId");
        let doc: Document = serde_json::from_value(json).unwrap();

        let product = Product::from_document(&doc, &test_storage()).unwrap();
        assert_eq!(product.file_id, None);
        assert_eq!(product.image_url, PLACEHOLDER_IMAGE);
    }

    #[test]
    fn test_product_missing_price_is_rejected() {
        let mut json = product_json();
        json.as_object_mut().unwrap().remove("price");
        let doc: Document = serde_json::from_value(json).unwrap();

        let err = Product::from_document(&doc, &test_storage()).unwrap_err();
        assert_eq!(err.field, "price");
    }

    #[test]
    fn test_category_description_default() {
        let doc: Document = serde_json::from_value(serde_json::json!({
            "$id": "cat1",
            "$createdAt": "2025-03-01T00:00:00+00:00",
            "$updatedAt": "2025-03-01T00:00:00+00:00",
            "categoryId": "4",
            "name": "Fruits",
        }))
        .unwrap();

        let category = Category::from_document(&doc).unwrap();
        assert_eq!(category.category_id, 4);
        assert_eq!(category.description, "No description available");
    }

    #[test]
    fn test_category_missing_name_is_rejected() {
        let doc: Document = serde_json::from_value(serde_json::json!({
            "$id": "cat1",
            "$createdAt": "2025-03-01T00:00:00+00:00",
            "$updatedAt": "2025-03-01T00:00:00+00:00",
            "description": "No name",
        }))
        .unwrap();

        assert!(Category::from_document(&doc).is_err());
    }
}
