//! Admin route handlers (user management, categories, dashboard counts).

use axum::{
    Form, Json,
    extract::{Path, State},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::appwrite::{Query, unique_id};
use crate::error::{AppError, Result, ValidationError};
use crate::layout::LayoutMode;
use crate::middleware::auth::RequireAdmin;
use crate::models::{Category, UserProfile, convert_all};
use crate::state::AppState;

/// Admin dashboard payload.
#[derive(Debug, Serialize)]
pub struct AdminDashboardView {
    pub layout: LayoutMode,
    pub total_users: u64,
    pub total_products: u64,
}

/// Category creation form.
#[derive(Debug, Deserialize)]
pub struct CategoryForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
}

/// Dashboard counts.
pub async fn dashboard(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<Json<AdminDashboardView>> {
    let users = state
        .documents()
        .list(state.users_collection(), &[Query::limit(1)])
        .await?;
    let products = state
        .documents()
        .list(state.products_collection(), &[Query::limit(1)])
        .await?;

    Ok(Json(AdminDashboardView {
        layout: LayoutMode::from_path("/admin"),
        total_users: users.total,
        total_products: products.total,
    }))
}

/// All user profiles.
pub async fn list_users(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<Json<Vec<UserProfile>>> {
    let page = state
        .documents()
        .list(state.users_collection(), &[])
        .await?;

    Ok(Json(convert_all(&page.documents, UserProfile::from_document)))
}

/// Delete a user profile by document id.
pub async fn delete_user(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    state
        .documents()
        .delete(state.users_collection(), &id)
        .await
        .map_err(AppError::Write)?;

    tracing::info!(user = %id, "user profile deleted by admin");
    Ok(Json(json!({ "status": "deleted" })))
}

/// The next sequential category number, given the newest existing one.
fn next_category_id(latest: Option<i64>) -> i64 {
    latest.map_or(1, |id| id + 1)
}

/// Create a category.
///
/// Name, description, and image are all required. The sequential display
/// number comes from the newest category; this read-then-increment is racy
/// under concurrent admins, which is accepted (the number is display-only).
pub async fn create_category(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Form(form): Form<CategoryForm>,
) -> Result<Json<Category>> {
    let mut validation = ValidationError::default();
    if form.name.trim().is_empty() {
        validation.missing("name");
    }
    if form.description.trim().is_empty() {
        validation.missing("description");
    }
    if form.image.trim().is_empty() {
        validation.missing("image");
    }
    validation.into_result()?;

    let latest = state
        .documents()
        .list(
            state.categories_collection(),
            &[Query::order_desc("createdAt"), Query::limit(1)],
        )
        .await?;
    let category_id = next_category_id(
        latest
            .documents
            .first()
            .and_then(|doc| doc.i64_field("categoryId")),
    );

    let now = Utc::now();
    let doc = state
        .documents()
        .create(
            state.categories_collection(),
            &unique_id(),
            json!({
                "categoryId": category_id.to_string(),
                "name": form.name.trim(),
                "description": form.description.trim(),
                "image": form.image.trim(),
                "createdAt": now.to_rfc3339(),
                "updatedAt": now.to_rfc3339(),
            }),
        )
        .await
        .map_err(AppError::Write)?;

    tracing::info!(category = %doc.id, name = %form.name.trim(), "category created");
    Category::from_document(&doc).map(Json).map_err(|e| AppError::Internal(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_category_id_starts_at_one() {
        assert_eq!(next_category_id(None), 1);
    }

    #[test]
    fn test_next_category_id_increments() {
        assert_eq!(next_category_id(Some(7)), 8);
    }
}
