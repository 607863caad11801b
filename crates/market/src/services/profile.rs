//! Session/profile resolution and account flows.
//!
//! A profile is looked up by the auth-service identity first; older records
//! were written before `userId` was reliably populated, so lookup falls back
//! to the email join key before giving up with `ProfileNotFound`.

use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use farmstand_core::{Email, Role};

use crate::appwrite::{AuthUser, Query, unique_id};
use crate::error::{AppError, Result, ValidationError};
use crate::models::UserProfile;
use crate::state::AppState;

/// Registration form fields.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterForm {
    /// Display name.
    pub name: String,
    /// Account email.
    pub email: String,
    /// Account password (forwarded to the auth service, never stored).
    pub password: String,
    /// Role to register as.
    #[serde(rename = "register_type")]
    pub role: Role,
    /// Contact phone.
    #[serde(default)]
    pub phone: String,
    /// Postal address.
    #[serde(default)]
    pub address: String,
    /// National-id number.
    #[serde(default)]
    pub aadhaar: String,
}

/// Resolve the current session into an application-level profile.
///
/// Read-only: no state is touched anywhere.
///
/// # Errors
///
/// - [`AppError::Unauthorized`] when there is no session secret or the auth
///   service rejects it.
/// - [`AppError::ProfileNotFound`] when neither the identity key nor the
///   email fallback matches a profile record.
#[instrument(skip_all)]
pub async fn resolve_profile(state: &AppState, auth_secret: Option<&str>) -> Result<UserProfile> {
    let secret = auth_secret.ok_or_else(|| AppError::Unauthorized("no active session".into()))?;

    let auth_user = state
        .account()
        .get(secret)
        .await
        .map_err(|e| AppError::Unauthorized(format!("session rejected: {e}")))?;

    lookup_profile(state, &auth_user).await
}

/// Look up the profile record for an authenticated account.
///
/// # Errors
///
/// Returns [`AppError::ProfileNotFound`] when both lookups return empty.
pub async fn lookup_profile(state: &AppState, auth_user: &AuthUser) -> Result<UserProfile> {
    let users = state.users_collection();

    let mut page = state
        .documents()
        .list(users, &[Query::equal("userId", &auth_user.id)])
        .await?;

    if page.documents.is_empty() {
        tracing::warn!(user = %auth_user.id, "no profile by userId, trying email fallback");
        page = state
            .documents()
            .list(users, &[Query::equal("email", &auth_user.email)])
            .await?;
    }

    let doc = page.documents.first().ok_or(AppError::ProfileNotFound)?;
    UserProfile::from_document(doc).map_err(|e| AppError::Internal(e.to_string()))
}

/// Look up a profile by auth identity alone (e.g. a product's farmer).
///
/// # Errors
///
/// Returns [`AppError::ProfileNotFound`] when no record matches.
pub async fn profile_by_user_id(state: &AppState, user_id: &str) -> Result<UserProfile> {
    let page = state
        .documents()
        .list(
            state.users_collection(),
            &[Query::equal("userId", user_id)],
        )
        .await?;

    let doc = page.documents.first().ok_or(AppError::ProfileNotFound)?;
    UserProfile::from_document(doc).map_err(|e| AppError::Internal(e.to_string()))
}

/// Register a new account and its profile record.
///
/// # Errors
///
/// - [`AppError::Validation`] when name, email, or password is empty, or the
///   email is malformed.
/// - [`AppError::Write`] when the auth service or document store rejects the
///   write.
#[instrument(skip(state, form), fields(role = %form.role))]
pub async fn register(state: &AppState, form: &RegisterForm) -> Result<UserProfile> {
    let mut validation = ValidationError::default();
    if form.name.trim().is_empty() {
        validation.missing("name");
    }
    if form.email.trim().is_empty() {
        validation.missing("email");
    }
    if form.password.is_empty() {
        validation.missing("password");
    }
    validation.into_result()?;

    let email = Email::parse(&form.email).map_err(|_| {
        let mut v = ValidationError::default();
        v.invalid("email");
        AppError::Validation(v)
    })?;

    let auth_user = state
        .account()
        .create(&unique_id(), email.as_str(), &form.password, &form.name)
        .await
        .map_err(AppError::Write)?;

    let now = Utc::now();
    let doc = state
        .documents()
        .create(
            state.users_collection(),
            &unique_id(),
            json!({
                "userId": auth_user.id,
                "email": email.as_str(),
                "name": form.name,
                "registerType": form.role,
                "phone": form.phone,
                "address": form.address,
                "adharNumber": form.aadhaar,
                "createdAt": now.to_rfc3339(),
                "updatedAt": now.to_rfc3339(),
            }),
        )
        .await
        .map_err(AppError::Write)?;

    tracing::info!(role = %form.role, "registered new user");
    UserProfile::from_document(&doc).map_err(|e| AppError::Internal(e.to_string()))
}

/// Log in with email and password.
///
/// Returns the auth session secret (to stash in the cookie session) and the
/// resolved profile.
///
/// # Errors
///
/// - [`AppError::Unauthorized`] on bad credentials.
/// - [`AppError::ProfileNotFound`] when the account has no profile record.
pub async fn login(state: &AppState, email: &str, password: &str) -> Result<(String, UserProfile)> {
    let session = state
        .account()
        .create_email_session(email, password)
        .await
        .map_err(|e| AppError::Unauthorized(format!("login failed: {e}")))?;

    let auth_user = state
        .account()
        .get(&session.secret)
        .await
        .map_err(|e| AppError::Unauthorized(format!("session rejected: {e}")))?;

    let profile = lookup_profile(state, &auth_user).await?;
    Ok((session.secret, profile))
}

/// Delete the current auth session (logout).
///
/// # Errors
///
/// Returns [`AppError::Store`] if the auth service call fails.
pub async fn logout(state: &AppState, auth_secret: &str) -> Result<()> {
    state
        .account()
        .delete_current_session(auth_secret)
        .await?;
    Ok(())
}

/// Set or replace a farmer's payment-collection link.
///
/// # Errors
///
/// Returns [`AppError::Validation`] on an empty link and [`AppError::Write`]
/// when the update is rejected.
pub async fn set_payment_link(
    state: &AppState,
    profile_id: &str,
    payment_link: &str,
) -> Result<()> {
    if payment_link.trim().is_empty() {
        let mut v = ValidationError::default();
        v.missing("payment_link");
        return Err(AppError::Validation(v));
    }

    state
        .documents()
        .update(
            state.users_collection(),
            profile_id,
            json!({
                "razorpayLink": payment_link.trim(),
                "updatedAt": Utc::now().to_rfc3339(),
            }),
        )
        .await
        .map_err(AppError::Write)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_form_role_parses() {
        let form: RegisterForm = serde_json::from_str(
            r#"{
                "name": "Ravi",
                "email": "ravi@example.com",
                "password": "pw",
                "register_type": "farmer"
            }"#,
        )
        .expect("form should parse");
        assert_eq!(form.role, Role::Farmer);
        assert!(form.phone.is_empty());
    }
}
