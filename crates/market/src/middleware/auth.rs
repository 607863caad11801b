//! Route guards and authentication extractors.
//!
//! The gate decision itself is the pure [`authorize`] function; the axum
//! extractors resolve the current user from the cookie session and apply it.
//! There is exactly one gate definition - dashboards differ only in the
//! role they pass.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use farmstand_core::Role;

use crate::models::{CurrentUser, session_keys};

// =============================================================================
// Gate decision
// =============================================================================

/// Outcome of a gate check for a guarded view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Render the guarded view.
    Allow,
    /// Auth state is still resolving; render a neutral pending state,
    /// never a redirect (avoids the flash-redirect race).
    Pending,
    /// Not logged in; go to the login page.
    RedirectToLogin,
    /// Logged in with the wrong role; go home.
    RedirectHome,
}

/// Decide whether a view gated to `required` may render.
///
/// Idempotent and side-effect-free: same inputs, same decision.
#[must_use]
pub fn authorize(
    required: Option<Role>,
    user: Option<&CurrentUser>,
    auth_loading: bool,
) -> GateDecision {
    if auth_loading {
        return GateDecision::Pending;
    }

    let Some(user) = user else {
        return GateDecision::RedirectToLogin;
    };

    match required {
        Some(role) if role != user.role => GateDecision::RedirectHome,
        _ => GateDecision::Allow,
    }
}

// =============================================================================
// Extractors
// =============================================================================

/// Error returned when a gate check refuses a request.
pub enum GateRejection {
    /// Redirect to login page (for page requests).
    RedirectToLogin,
    /// Redirect to home (role mismatch, page requests).
    RedirectHome,
    /// Unauthorized response (for API requests).
    Unauthorized,
    /// Forbidden response (role mismatch, API requests).
    Forbidden,
}

impl IntoResponse for GateRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/login").into_response(),
            Self::RedirectHome => Redirect::to("/").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            Self::Forbidden => StatusCode::FORBIDDEN.into_response(),
        }
    }
}

/// Read the cached current user from the cookie session.
async fn session_user(parts: &mut Parts) -> Option<CurrentUser> {
    let session = parts.extensions.get::<Session>()?;
    session
        .get::<CurrentUser>(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten()
}

/// Apply the gate for a request, mapping the decision to a rejection.
async fn gate(parts: &mut Parts, required: Option<Role>) -> Result<CurrentUser, GateRejection> {
    let user = session_user(parts).await;
    let is_api = parts.uri.path().starts_with("/api/");

    // By the time an extractor runs the session has been read, so the
    // loading state cannot occur here.
    match authorize(required, user.as_ref(), false) {
        GateDecision::Allow => {
            // authorize() only allows with a user present
            user.ok_or(GateRejection::Unauthorized)
        }
        GateDecision::RedirectToLogin => Err(if is_api {
            GateRejection::Unauthorized
        } else {
            GateRejection::RedirectToLogin
        }),
        GateDecision::RedirectHome => Err(if is_api {
            GateRejection::Forbidden
        } else {
            GateRejection::RedirectHome
        }),
        GateDecision::Pending => Err(GateRejection::Unauthorized),
    }
}

/// Extractor that requires a logged-in user of any role.
pub struct RequireAuth(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = GateRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        gate(parts, None).await.map(Self)
    }
}

/// Extractor that requires the admin role.
///
/// # Example
///
/// ```rust,ignore
/// async fn manage_users(
///     RequireAdmin(admin): RequireAdmin,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", admin.name)
/// }
/// ```
pub struct RequireAdmin(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = GateRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        gate(parts, Some(Role::Admin)).await.map(Self)
    }
}

/// Extractor that requires the farmer role.
pub struct RequireFarmer(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireFarmer
where
    S: Send + Sync,
{
    type Rejection = GateRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        gate(parts, Some(Role::Farmer)).await.map(Self)
    }
}

/// Extractor that requires the customer role.
pub struct RequireCustomer(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireCustomer
where
    S: Send + Sync,
{
    type Rejection = GateRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        gate(parts, Some(Role::Customer)).await.map(Self)
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireAuth`, this does not reject the request when nobody is
/// logged in.
pub struct OptionalAuth(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(session_user(parts).await))
    }
}

// =============================================================================
// Session helpers
// =============================================================================

/// Store the logged-in user and auth secret in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
    auth_secret: &str,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_USER, user).await?;
    session
        .insert(session_keys::AUTH_SECRET, auth_secret)
        .await
}

/// Read the hosted auth session secret from the session.
///
/// # Errors
///
/// Returns an error if the session backend fails.
pub async fn auth_secret(
    session: &Session,
) -> Result<Option<String>, tower_sessions::session::Error> {
    session.get::<String>(session_keys::AUTH_SECRET).await
}

/// Clear the session state (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentUser>(session_keys::CURRENT_USER)
        .await?;
    session.remove::<String>(session_keys::AUTH_SECRET).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use farmstand_core::{Email, UserId};

    fn user_with_role(role: Role) -> CurrentUser {
        CurrentUser {
            profile_id: UserId::new("profile1"),
            user_id: UserId::new("auth1"),
            name: "Test User".to_string(),
            email: Email::parse("test@example.com").expect("valid email"),
            role,
            phone: "9876543210".to_string(),
        }
    }

    #[test]
    fn test_loading_never_redirects() {
        // Even with no user resolved yet, a loading auth state must render
        // a pending view rather than bouncing to login.
        assert_eq!(
            authorize(Some(Role::Admin), None, true),
            GateDecision::Pending
        );
        assert_eq!(authorize(None, None, true), GateDecision::Pending);
    }

    #[test]
    fn test_no_user_redirects_to_login() {
        assert_eq!(
            authorize(Some(Role::Customer), None, false),
            GateDecision::RedirectToLogin
        );
        assert_eq!(authorize(None, None, false), GateDecision::RedirectToLogin);
    }

    #[test]
    fn test_role_mismatch_redirects_home_not_login() {
        let farmer = user_with_role(Role::Farmer);
        assert_eq!(
            authorize(Some(Role::Admin), Some(&farmer), false),
            GateDecision::RedirectHome
        );
    }

    #[test]
    fn test_matching_role_allows() {
        let admin = user_with_role(Role::Admin);
        assert_eq!(
            authorize(Some(Role::Admin), Some(&admin), false),
            GateDecision::Allow
        );
    }

    #[test]
    fn test_no_required_role_allows_any_user() {
        let customer = user_with_role(Role::Customer);
        assert_eq!(
            authorize(None, Some(&customer), false),
            GateDecision::Allow
        );
    }

    #[test]
    fn test_authorize_is_idempotent() {
        let farmer = user_with_role(Role::Farmer);
        let first = authorize(Some(Role::Admin), Some(&farmer), false);
        let second = authorize(Some(Role::Admin), Some(&farmer), false);
        assert_eq!(first, second);
    }
}
