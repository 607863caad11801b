//! Browser-session state.
//!
//! The cookie session stores two things after login: the auth-service
//! session secret (so server-side calls can act as the user) and a cached
//! [`CurrentUser`] snapshot for the route guards.

use serde::{Deserialize, Serialize};

use farmstand_core::{Email, Role, UserId};

use super::user::UserProfile;

/// Session storage keys.
pub mod session_keys {
    /// Key for the cached [`super::CurrentUser`].
    pub const CURRENT_USER: &str = "current_user";
    /// Key for the auth-service session secret.
    pub const AUTH_SECRET: &str = "auth_session_secret";
}

/// Snapshot of the logged-in user kept in the cookie session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Profile document id.
    pub profile_id: UserId,
    /// Auth-service identity.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: Email,
    /// Role deciding which dashboards this user may open.
    pub role: Role,
    /// Contact phone, prefilled into the checkout widget.
    pub phone: String,
}

impl From<&UserProfile> for CurrentUser {
    fn from(profile: &UserProfile) -> Self {
        Self {
            profile_id: profile.id.clone(),
            user_id: profile.user_id.clone(),
            name: profile.name.clone(),
            email: profile.email.clone(),
            role: profile.role,
            phone: profile.phone.clone(),
        }
    }
}
