//! Session plumbing between the browser and the auth provider.
//!
//! The browser keeps the provider's access token and presents it as
//! `Authorization: Bearer`. Extracting the token never touches the network;
//! handlers resolve it to a `Session` only after their local checks pass.

pub mod handlers;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    RequestPartsExt,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use tracing::{debug, warn};

use crate::backend::{AuthProvider, BackendError};
use crate::errors::AppError;
use crate::models::user::Session;

/// The bearer token of the request, if any.
#[derive(Debug, Clone, Default)]
pub struct BearerToken(pub Option<String>);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .ok()
            .map(|TypedHeader(Authorization(bearer))| bearer.token().to_string())
            .filter(|token| !token.is_empty());

        Ok(BearerToken(token))
    }
}

impl BearerToken {
    /// The token, or `Unauthorized` when the request is signed out.
    pub fn require(&self) -> Result<&str, AppError> {
        self.0.as_deref().ok_or(AppError::Unauthorized)
    }
}

/// Resolves a token the caller insists on. A refused token means the user
/// has to sign in again.
pub async fn require_session(auth: &dyn AuthProvider, token: &str) -> Result<Session, AppError> {
    match auth.user_for_token(token).await {
        Ok(user) => Ok(Session {
            user,
            access_token: token.to_string(),
        }),
        Err(BackendError::AuthRejected(msg)) => {
            debug!("Access token refused: {msg}");
            Err(AppError::Unauthorized)
        }
        Err(e) => Err(e.into()),
    }
}

/// Resolves the token when the request carries one. Writes open to anonymous
/// visitors use this: no token means anonymous, but a presented token must be
/// valid and a provider outage is an error.
pub async fn session_if_present(
    auth: &dyn AuthProvider,
    token: &BearerToken,
) -> Result<Option<Session>, AppError> {
    match token.0.as_deref() {
        Some(token) => require_session(auth, token).await.map(Some),
        None => Ok(None),
    }
}

/// Resolves an optional token for read paths. Anything
/// short of a valid token falls back to browsing signed out.
pub async fn optional_session(
    auth: Option<&dyn AuthProvider>,
    token: &BearerToken,
) -> Option<Session> {
    let (auth, token) = (auth?, token.0.as_deref()?);
    match auth.user_for_token(token).await {
        Ok(user) => Some(Session {
            user,
            access_token: token.to_string(),
        }),
        Err(BackendError::AuthRejected(msg)) => {
            debug!("Ignoring refused access token: {msg}");
            None
        }
        Err(e) => {
            warn!("Could not restore session, continuing signed out: {e}");
            None
        }
    }
}
