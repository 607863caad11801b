//! Public catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use farmstand_core::ProductId;

use crate::error::{AppError, Result};
use crate::layout::LayoutMode;
use crate::middleware::auth::OptionalAuth;
use crate::models::{Category, CurrentUser, Product};
use crate::services::catalog::{self, CategoryListing};
use crate::state::AppState;

/// Home page payload.
#[derive(Debug, Serialize)]
pub struct HomeView {
    pub layout: LayoutMode,
    pub user: Option<CurrentUser>,
    pub featured: Vec<Product>,
    pub categories: Vec<Category>,
}

/// One category page payload.
#[derive(Debug, Serialize)]
pub struct CategoryPageView {
    pub category: Category,
    pub products: Vec<Product>,
}

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// URL slug for a category name (`"Leafy Greens"` -> `"leafy-greens"`).
#[must_use]
pub fn category_slug(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "-")
}

/// Home page: featured products plus the category list.
pub async fn home(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
) -> Result<Json<HomeView>> {
    let categories = catalog::fetch_categories(&state).await?;
    let products = catalog::fetch_products(&state).await?;

    Ok(Json(HomeView {
        layout: LayoutMode::from_path("/"),
        user,
        featured: catalog::featured(&products),
        categories,
    }))
}

/// All categories, each with its joined products.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<CategoryListing>>> {
    let listings = catalog::load_catalog(&state).await?;
    Ok(Json(listings))
}

/// One category page, addressed by slug.
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<CategoryPageView>> {
    let categories = catalog::fetch_categories(&state).await?;
    let category = categories
        .into_iter()
        .find(|c| category_slug(&c.name) == slug)
        .ok_or_else(|| AppError::NotFound("Category not found.".to_string()))?;

    let products = catalog::fetch_products(&state).await?;
    let listings = catalog::join_catalog(vec![category], &products);
    let listing = listings
        .into_iter()
        .next()
        .ok_or_else(|| AppError::Internal("join produced no listing".to_string()))?;

    Ok(Json(CategoryPageView {
        category: listing.category,
        products: listing.products,
    }))
}

/// Product detail page.
pub async fn product_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>> {
    let product = catalog::fetch_product(&state, &ProductId::new(id)).await?;
    Ok(Json(product))
}

/// Title search over the full product list.
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Product>>> {
    let products = catalog::fetch_products(&state).await?;
    Ok(Json(catalog::search(&products, &query.q)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_slug() {
        assert_eq!(category_slug("Fruits"), "fruits");
        assert_eq!(category_slug("Leafy Greens"), "leafy-greens");
        assert_eq!(category_slug("  Dairy  "), "dairy");
    }
}
