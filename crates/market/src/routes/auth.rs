//! Auth route handlers (login, register, logout).

use axum::{
    Form,
    extract::State,
    response::Redirect,
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::auth::{auth_secret, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::profile::{self, RegisterForm};
use crate::state::AppState;

/// Login form fields.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Log in and land on the role's dashboard.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Redirect> {
    let (secret, user_profile) = profile::login(&state, &form.email, &form.password).await?;

    let current = CurrentUser::from(&user_profile);
    set_current_user(&session, &current, &secret)
        .await
        .map_err(|e| AppError::Internal(format!("session write failed: {e}")))?;

    set_sentry_user(&current.user_id, Some(current.email.as_str()));
    tracing::info!(role = %current.role, "user logged in");

    Ok(Redirect::to(user_profile.role.dashboard_path()))
}

/// Register a new account, then send the user to log in.
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<Redirect> {
    profile::register(&state, &form).await?;
    Ok(Redirect::to("/login"))
}

/// Log out: delete the hosted session, clear the cookie session.
///
/// The cookie session is cleared even when the hosted session delete fails;
/// a dangling remote session expires on its own.
pub async fn logout(State(state): State<AppState>, session: Session) -> Result<Redirect> {
    if let Ok(Some(secret)) = auth_secret(&session).await {
        if let Err(e) = profile::logout(&state, &secret).await {
            tracing::warn!(error = %e, "hosted session delete failed during logout");
        }
    }

    clear_current_user(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session clear failed: {e}")))?;
    clear_sentry_user();

    Ok(Redirect::to("/login"))
}
