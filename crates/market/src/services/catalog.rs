//! Catalog reads and the category/product join.
//!
//! Categories come back ordered by name; products are fetched in full and
//! joined client-side by normalized category name. Result sets are small
//! enough that there is no pagination, and every page load refetches.

use tracing::instrument;

use farmstand_core::ProductId;
use serde::Serialize;

use crate::appwrite::Query;
use crate::error::{AppError, Result};
use crate::models::{Category, Product, convert_all};
use crate::state::AppState;

/// A category with the products whose denormalized category string matches
/// its name.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryListing {
    /// The category itself.
    pub category: Category,
    /// Products filed under it.
    pub products: Vec<Product>,
}

/// Normalize a category string for join comparison.
fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// The catalog join: a product appears under a category iff
/// `trim(lower(product.category)) == trim(lower(category.name))`.
///
/// There is no referential integrity; a product whose category matches no
/// category name is silently absent from every listing.
#[must_use]
pub fn join_catalog(categories: Vec<Category>, products: &[Product]) -> Vec<CategoryListing> {
    categories
        .into_iter()
        .map(|category| {
            let key = normalize(&category.name);
            let products = products
                .iter()
                .filter(|p| normalize(&p.category) == key)
                .cloned()
                .collect();
            CategoryListing { category, products }
        })
        .collect()
}

/// Products flagged for the home page.
#[must_use]
pub fn featured(products: &[Product]) -> Vec<Product> {
    products.iter().filter(|p| p.is_featured).cloned().collect()
}

/// Case-insensitive title substring search.
#[must_use]
pub fn search(products: &[Product], query: &str) -> Vec<Product> {
    let needle = normalize(query);
    if needle.is_empty() {
        return Vec::new();
    }
    products
        .iter()
        .filter(|p| p.title.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Fetch all categories, ordered by name ascending.
///
/// # Errors
///
/// Returns [`AppError::Store`] on a failed read.
#[instrument(skip(state))]
pub async fn fetch_categories(state: &AppState) -> Result<Vec<Category>> {
    let page = state
        .documents()
        .list(state.categories_collection(), &[Query::order_asc("name")])
        .await?;

    Ok(convert_all(&page.documents, Category::from_document))
}

/// Fetch all products, unfiltered, with image URLs resolved.
///
/// # Errors
///
/// Returns [`AppError::Store`] on a failed read.
#[instrument(skip(state))]
pub async fn fetch_products(state: &AppState) -> Result<Vec<Product>> {
    let page = state
        .documents()
        .list(state.products_collection(), &[])
        .await?;

    Ok(convert_all(&page.documents, |doc| {
        Product::from_document(doc, state.storage())
    }))
}

/// Fetch the products owned by one farmer.
///
/// # Errors
///
/// Returns [`AppError::Store`] on a failed read.
#[instrument(skip(state))]
pub async fn fetch_farmer_products(state: &AppState, farmer_id: &str) -> Result<Vec<Product>> {
    let page = state
        .documents()
        .list(
            state.products_collection(),
            &[Query::equal("farmerId", farmer_id)],
        )
        .await?;

    Ok(convert_all(&page.documents, |doc| {
        Product::from_document(doc, state.storage())
    }))
}

/// Fetch one product by id.
///
/// # Errors
///
/// Returns [`AppError::NotFound`] when the id does not exist, or the
/// document cannot be mapped.
pub async fn fetch_product(state: &AppState, id: &ProductId) -> Result<Product> {
    let doc = state
        .documents()
        .get(state.products_collection(), id.as_str())
        .await
        .map_err(|e| {
            if e.is_not_found() {
                AppError::NotFound(format!("product {id}"))
            } else {
                AppError::Store(e)
            }
        })?;

    Product::from_document(&doc, state.storage())
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// Fetch categories and products together and join them.
///
/// # Errors
///
/// Returns [`AppError::Store`] when either read fails.
pub async fn load_catalog(state: &AppState) -> Result<Vec<CategoryListing>> {
    let categories = fetch_categories(state).await?;
    let products = fetch_products(state).await?;
    Ok(join_catalog(categories, &products))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use farmstand_core::{CategoryId, Price, UserId};

    use super::*;
    use crate::models::PLACEHOLDER_IMAGE;

    fn category(name: &str) -> Category {
        Category {
            id: CategoryId::new(format!("cat-{name}")),
            category_id: 1,
            name: name.to_string(),
            description: "No description available".to_string(),
            image: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn product(title: &str, category: &str) -> Product {
        Product {
            id: farmstand_core::ProductId::new(format!("prod-{title}")),
            farmer_id: UserId::new("farmer1"),
            title: title.to_string(),
            description: String::new(),
            price: Price::new(100),
            quantity: 5,
            discount: 0,
            sku: String::new(),
            category: category.to_string(),
            is_featured: false,
            file_id: None,
            image_url: PLACEHOLDER_IMAGE.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_join_matches_normalized_names() {
        let categories = vec![category("Fruits")];
        let products = vec![
            product("Mangoes", "Fruits"),
            product("Bananas", "  fruits "),
            product("Spinach", "Vegetables"),
        ];

        let listings = join_catalog(categories, &products);
        assert_eq!(listings.len(), 1);
        let titles: Vec<_> = listings[0].products.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Mangoes", "Bananas"]);
    }

    #[test]
    fn test_join_mismatch_hides_product_silently() {
        // "Fruit" != "Fruits" after normalization, so the product simply
        // does not surface; no error anywhere.
        let listings = join_catalog(vec![category("Fruits")], &[product("Kiwi", "Fruit")]);
        assert!(listings[0].products.is_empty());
    }

    #[test]
    fn test_join_is_case_and_whitespace_insensitive_both_ways() {
        let listings = join_catalog(vec![category(" FRUITS ")], &[product("Kiwi", "fruits")]);
        assert_eq!(listings[0].products.len(), 1);
    }

    #[test]
    fn test_featured_filter() {
        let mut p1 = product("Mangoes", "Fruits");
        p1.is_featured = true;
        let p2 = product("Bananas", "Fruits");

        let result = featured(&[p1, p2]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].title, "Mangoes");
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let products = vec![product("Alphonso Mangoes", "Fruits"), product("Bananas", "Fruits")];
        let result = search(&products, "mango");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].title, "Alphonso Mangoes");
    }

    #[test]
    fn test_search_empty_query_returns_nothing() {
        let products = vec![product("Bananas", "Fruits")];
        assert!(search(&products, "   ").is_empty());
    }
}
