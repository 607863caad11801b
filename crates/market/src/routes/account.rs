//! Account route handlers (profile views, payment-link management).

use axum::{Form, Json, extract::State};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::Result;
use crate::middleware::auth::{RequireAuth, RequireFarmer, auth_secret};
use crate::models::UserProfile;
use crate::services::profile;
use crate::state::AppState;

/// Resolve and return the logged-in user's profile.
///
/// Serves both `/account` and `/api/me`. Goes back to the auth service and
/// user store on every request rather than trusting the session snapshot,
/// so admin edits show up immediately.
pub async fn show(
    State(state): State<AppState>,
    _auth: RequireAuth,
    session: Session,
) -> Result<Json<UserProfile>> {
    let secret = auth_secret(&session).await.ok().flatten();
    let resolved = profile::resolve_profile(&state, secret.as_deref()).await?;
    Ok(Json(resolved))
}

/// Payment-link form fields.
#[derive(Debug, Deserialize)]
pub struct PaymentLinkForm {
    pub payment_link: String,
}

/// Set or replace the farmer's payment-collection link.
pub async fn set_payment_link(
    State(state): State<AppState>,
    RequireFarmer(farmer): RequireFarmer,
    Form(form): Form<PaymentLinkForm>,
) -> Result<Json<serde_json::Value>> {
    profile::set_payment_link(&state, farmer.profile_id.as_str(), &form.payment_link).await?;
    Ok(Json(serde_json::json!({ "status": "saved" })))
}
