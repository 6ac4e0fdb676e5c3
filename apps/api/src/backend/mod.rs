//! Backend client: the single point of entry for calls to the hosted store and auth provider.
//!
//! Handlers never talk HTTP to the backend directly: they go through the
//! `DataStore` and `AuthProvider` traits carried in `AppState`. The production
//! implementation of both is `SupabaseClient`.

use std::collections::HashSet;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::models::pain::{NewPainEntry, PainEntry};
use crate::models::post::{NewComment, NewPost, Post, PostLike};
use crate::models::user::{Session, User};

#[cfg(test)]
pub mod memory;
pub mod postgrest;
pub mod supabase;

pub use supabase::SupabaseClient;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Authentication rejected: {0}")]
    AuthRejected(String),

    /// The provider refused the submitted values, e.g. a password that is too weak.
    #[error("Rejected input: {0}")]
    Invalid(String),

    #[error("Invalid backend URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Table and RPC access. Reads take an optional session so anonymous
/// visitors can browse; the store's row-level security decides what they see.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// All posts, newest first, with their comments embedded.
    async fn list_posts(&self, session: Option<&Session>) -> Result<Vec<Post>, BackendError>;

    /// Ids of the posts the session's user has liked.
    async fn liked_post_ids(&self, session: &Session) -> Result<HashSet<i64>, BackendError>;

    async fn insert_post(
        &self,
        session: Option<&Session>,
        post: &NewPost,
    ) -> Result<(), BackendError>;

    async fn find_like(
        &self,
        session: &Session,
        post_id: i64,
    ) -> Result<Option<PostLike>, BackendError>;

    async fn insert_like(&self, session: &Session, post_id: i64) -> Result<(), BackendError>;

    async fn delete_like(&self, session: &Session, like_id: i64) -> Result<(), BackendError>;

    async fn increment_likes(&self, session: &Session, post_id: i64)
        -> Result<(), BackendError>;

    async fn decrement_likes(&self, session: &Session, post_id: i64)
        -> Result<(), BackendError>;

    async fn insert_comment(
        &self,
        session: &Session,
        comment: &NewComment,
    ) -> Result<(), BackendError>;

    /// The session user's entries, newest first, at most `limit`.
    async fn recent_pain_entries(
        &self,
        session: &Session,
        limit: usize,
    ) -> Result<Vec<PainEntry>, BackendError>;

    async fn insert_pain_entry(
        &self,
        session: &Session,
        entry: &NewPainEntry,
    ) -> Result<(), BackendError>;
}

#[derive(Debug, Clone, Serialize)]
pub struct SignUpOutcome {
    pub user: Option<User>,
    /// True when the provider holds the account until the emailed link is followed.
    pub confirmation_required: bool,
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, BackendError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, BackendError>;

    async fn sign_out(&self, access_token: &str) -> Result<(), BackendError>;

    /// Restores the user behind an access token. Expired or unknown tokens
    /// yield `BackendError::AuthRejected`.
    async fn user_for_token(&self, access_token: &str) -> Result<User, BackendError>;
}
