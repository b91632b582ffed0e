//! Authentication route handlers.
//!
//! Login, signup, and logout. Failed submissions re-render the form with the
//! entered values, the field-error map, and a summary line; only a successful
//! submission navigates away.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::forms::{FieldErrors, LoginForm, SignupForm};
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub email: String,
    pub errors: FieldErrors,
    pub message: Option<String>,
}

/// Signup page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/signup.html")]
pub struct SignupTemplate {
    pub name: String,
    pub email: String,
    pub errors: FieldErrors,
    pub message: Option<String>,
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page() -> impl IntoResponse {
    LoginTemplate {
        email: String::new(),
        errors: FieldErrors::default(),
        message: None,
    }
}

/// Handle login form submission.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let entered_email = form.email.clone().unwrap_or_default();

    let payload = match form.validate() {
        Ok(payload) => payload,
        Err(errors) => {
            return LoginTemplate {
                email: entered_email,
                errors,
                message: None,
            }
            .into_response();
        }
    };

    let auth = AuthService::new(state.pool());
    match auth.login(&payload.email, &payload.password).await {
        Ok(tenant) => {
            let user = CurrentUser {
                name: tenant.name.clone(),
                email: tenant.email.clone(),
            };
            if let Err(e) = set_current_user(&session, &user).await {
                tracing::error!("Failed to set session: {e}");
                return LoginTemplate {
                    email: entered_email,
                    errors: FieldErrors::default(),
                    message: Some("Something went wrong.".to_owned()),
                }
                .into_response();
            }

            set_sentry_user(&tenant.id, Some(tenant.email.as_str()));
            Redirect::to("/dashboard").into_response()
        }
        Err(e) => {
            match &e {
                AuthError::InvalidCredentials => {
                    tracing::warn!("Login failed: invalid credentials");
                }
                other => tracing::error!(error = %other, "Login failed"),
            }

            LoginTemplate {
                email: entered_email,
                errors: FieldErrors::default(),
                message: Some(e.user_message().to_owned()),
            }
            .into_response()
        }
    }
}

// =============================================================================
// Signup Routes
// =============================================================================

/// Display the signup page.
pub async fn signup_page() -> impl IntoResponse {
    SignupTemplate {
        name: String::new(),
        email: String::new(),
        errors: FieldErrors::default(),
        message: None,
    }
}

/// Handle signup form submission.
///
/// A new account is signed in immediately.
pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SignupForm>,
) -> Response {
    let entered_name = form.name.clone().unwrap_or_default();
    let entered_email = form.email.clone().unwrap_or_default();

    let payload = match form.validate() {
        Ok(payload) => payload,
        Err(errors) => {
            return SignupTemplate {
                name: entered_name,
                email: entered_email,
                errors,
                message: None,
            }
            .into_response();
        }
    };

    let auth = AuthService::new(state.pool());
    match auth
        .signup(&payload.name, &payload.email, &payload.password)
        .await
    {
        Ok(tenant) => {
            let user = CurrentUser {
                name: tenant.name.clone(),
                email: tenant.email.clone(),
            };
            if let Err(e) = set_current_user(&session, &user).await {
                tracing::error!("Failed to set session: {e}");
                return SignupTemplate {
                    name: entered_name,
                    email: entered_email,
                    errors: FieldErrors::default(),
                    message: Some("Something went wrong.".to_owned()),
                }
                .into_response();
            }

            set_sentry_user(&tenant.id, Some(tenant.email.as_str()));
            Redirect::to("/dashboard").into_response()
        }
        Err(e) => {
            match &e {
                AuthError::UserAlreadyExists => {
                    tracing::warn!("Signup failed: email already registered");
                }
                other => tracing::error!(error = %other, "Signup failed"),
            }

            SignupTemplate {
                name: entered_name,
                email: entered_email,
                errors: FieldErrors::default(),
                message: Some(e.user_message().to_owned()),
            }
            .into_response()
        }
    }
}

// =============================================================================
// Logout Route
// =============================================================================

/// Handle logout.
///
/// Clears the current user and destroys the whole session record.
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session: {e}");
    }

    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {e}");
    }

    clear_sentry_user();
    Redirect::to("/auth/login").into_response()
}
