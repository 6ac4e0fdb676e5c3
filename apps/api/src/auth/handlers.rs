use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::{optional_session, BearerToken};
use crate::errors::AppError;
use crate::extract::Json as JsonBody;
use crate::models::user::User;
use crate::state::AppState;

const CONFIRM_EMAIL_NOTICE: &str = "Check your email to confirm your account, then sign in.";

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl CredentialsRequest {
    fn validate(&self) -> Result<(&str, &str), AppError> {
        let email = self.email.trim();
        if email.is_empty() || self.password.is_empty() {
            return Err(AppError::Validation(
                "Email and password are required".to_string(),
            ));
        }
        Ok((email, self.password.as_str()))
    }
}

#[derive(Debug, Serialize)]
pub struct SignUpResponse {
    pub user: Option<User>,
    pub confirmation_required: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub access_token: String,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct CurrentUserResponse {
    pub user: Option<User>,
}

/// POST /api/v1/auth/sign-up
pub async fn handle_sign_up(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CredentialsRequest>,
) -> Result<Json<SignUpResponse>, AppError> {
    let auth = state.auth()?;
    let (email, password) = req.validate()?;

    let outcome = auth.sign_up(email, password).await?;
    let message = if outcome.confirmation_required {
        CONFIRM_EMAIL_NOTICE.to_string()
    } else {
        "Account created.".to_string()
    };

    Ok(Json(SignUpResponse {
        user: outcome.user,
        confirmation_required: outcome.confirmation_required,
        message,
    }))
}

/// POST /api/v1/auth/sign-in
pub async fn handle_sign_in(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CredentialsRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let auth = state.auth()?;
    let (email, password) = req.validate()?;

    let session = auth.sign_in(email, password).await?;
    info!("User {} signed in", session.user.id);

    Ok(Json(SessionResponse {
        access_token: session.access_token,
        user: session.user,
    }))
}

/// POST /api/v1/auth/sign-out
pub async fn handle_sign_out(
    State(state): State<AppState>,
    token: BearerToken,
) -> Result<StatusCode, AppError> {
    let auth = state.auth()?;
    auth.sign_out(token.require()?).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/session
/// Restores the signed-in user from the presented token, or `null`.
pub async fn handle_session(
    State(state): State<AppState>,
    token: BearerToken,
) -> Json<CurrentUserResponse> {
    let session = optional_session(state.auth.as_deref(), &token).await;
    Json(CurrentUserResponse {
        user: session.map(|s| s.user),
    })
}
