//! Registration, login, and logout handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::{IntoResponse, Redirect, Response};
use tower_sessions::Session;
use tracing::instrument;

use learnsphere_core::Email;

use crate::db::UserRepository;
use crate::error::{AppError, set_sentry_user};
use crate::filters;
use crate::middleware::set_current_user;
use crate::models::session::{CurrentUser, Flash};
use crate::services::auth::{AuthError, AuthService, MIN_PASSWORD_LENGTH};
use crate::state::AppState;

use super::command::{LoginForm, RegisterForm};
use super::{PageContext, set_flash};

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub ctx: PageContext,
    pub errors: Vec<String>,
    /// Prefill values so one typo doesn't wipe the form.
    pub username: String,
    pub email: String,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub ctx: PageContext,
    pub errors: Vec<String>,
    pub identifier: String,
}

/// Display the registration form.
#[instrument(skip(session))]
pub async fn register_page(session: &Session) -> Result<Response, AppError> {
    let ctx = PageContext::gather(session).await?;

    Ok(RegisterTemplate {
        ctx,
        errors: Vec::new(),
        username: String::new(),
        email: String::new(),
    }
    .into_response())
}

/// Display the login form.
#[instrument(skip(session))]
pub async fn login_page(session: &Session) -> Result<Response, AppError> {
    let ctx = PageContext::gather(session).await?;

    Ok(LoginTemplate {
        ctx,
        errors: Vec::new(),
        identifier: String::new(),
    }
    .into_response())
}

/// Validate the registration form, collecting every failure.
fn validate_register_form(
    username: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> Vec<String> {
    let mut errors = Vec::new();

    if username.is_empty() || email.is_empty() || password.is_empty() || confirm_password.is_empty()
    {
        errors.push("All fields are required.".to_string());
    }

    if Email::parse(email).is_err() {
        errors.push("Invalid email format.".to_string());
    }

    if password.len() < MIN_PASSWORD_LENGTH {
        errors.push(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long."
        ));
    }

    if password != confirm_password {
        errors.push("Passwords do not match.".to_string());
    }

    errors
}

/// Handle a registration submission.
///
/// All validation failures are collected and re-rendered inline on the form;
/// on success the visitor is sent to the login view with a flash.
#[instrument(skip(state, session, form))]
pub async fn register(
    state: &AppState,
    session: &Session,
    form: RegisterForm,
) -> Result<Response, AppError> {
    let username = form.username.trim().to_string();
    let email = form.email.trim().to_string();

    let mut errors =
        validate_register_form(&username, &email, &form.password, &form.confirm_password);

    if errors.is_empty() {
        // Pre-check uniqueness for a friendly inline error; the unique
        // index remains the backstop against races.
        if let Ok(parsed) = Email::parse(&email)
            && UserRepository::new(state.pool())
                .identifier_taken(&parsed, &username)
                .await?
        {
            errors.push("Email or username already exists.".to_string());
        }
    }

    if errors.is_empty() {
        match AuthService::new(state.pool())
            .register(&username, &email, &form.password)
            .await
        {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "user registered");
                set_flash(session, Flash::success("Registration successful! Please login."))
                    .await?;
                return Ok(Redirect::to("/?view=login").into_response());
            }
            // Lost the race against a concurrent registration
            Err(AuthError::UserAlreadyExists) => {
                errors.push("Email or username already exists.".to_string());
            }
            Err(other) => return Err(other.into()),
        }
    }

    let ctx = PageContext::gather(session).await?;
    Ok(RegisterTemplate {
        ctx,
        errors,
        username,
        email,
    }
    .into_response())
}

/// Handle a login submission.
#[instrument(skip(state, session, form))]
pub async fn login(
    state: &AppState,
    session: &Session,
    form: LoginForm,
) -> Result<Response, AppError> {
    let identifier = form.identifier.trim().to_string();

    let mut errors = Vec::new();
    if identifier.is_empty() || form.password.is_empty() {
        errors.push("Email/username and password are required.".to_string());
    }

    if errors.is_empty() {
        match AuthService::new(state.pool())
            .login(&identifier, &form.password)
            .await
        {
            Ok(user) => {
                let current = CurrentUser::from(&user);
                set_current_user(session, &current).await?;
                set_sentry_user(&user.id, Some(user.email.as_str()));
                tracing::info!(user_id = %user.id, "user logged in");

                set_flash(session, Flash::success("Login successful!")).await?;
                return Ok(Redirect::to("/").into_response());
            }
            // Unknown identifier and wrong password are deliberately the
            // same message.
            Err(AuthError::InvalidCredentials) => {
                errors.push("Invalid email/username or password.".to_string());
            }
            Err(other) => return Err(other.into()),
        }
    }

    let ctx = PageContext::gather(session).await?;
    Ok(LoginTemplate {
        ctx,
        errors,
        identifier,
    }
    .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_fields_required() {
        let errors = validate_register_form("", "a@b.com", "secret1", "secret1");
        assert!(errors.contains(&"All fields are required.".to_string()));
    }

    #[test]
    fn test_invalid_email_rejected() {
        let errors = validate_register_form("asha", "not-an-email", "secret1", "secret1");
        assert!(errors.contains(&"Invalid email format.".to_string()));
    }

    #[test]
    fn test_short_password_rejected() {
        let errors = validate_register_form("asha", "a@b.com", "12345", "12345");
        assert!(
            errors.contains(&"Password must be at least 6 characters long.".to_string())
        );
    }

    #[test]
    fn test_password_mismatch_rejected() {
        let errors = validate_register_form("asha", "a@b.com", "secret1", "secret2");
        assert!(errors.contains(&"Passwords do not match.".to_string()));
    }

    #[test]
    fn test_failures_are_collected_not_short_circuited() {
        let errors = validate_register_form("", "bad", "123", "456");
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_valid_form_passes() {
        let errors = validate_register_form("asha", "asha@example.com", "secret1", "secret1");
        assert!(errors.is_empty());
    }
}
