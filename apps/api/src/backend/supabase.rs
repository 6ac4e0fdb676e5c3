use std::collections::HashSet;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use url::Url;

use crate::backend::postgrest::{Direction, Query};
use crate::backend::{AuthProvider, BackendError, DataStore, SignUpOutcome};
use crate::config::BackendConfig;
use crate::models::pain::{NewPainEntry, PainEntry};
use crate::models::post::{NewComment, NewPost, NewPostLike, Post, PostLike};
use crate::models::user::{Session, User};

const REST_PATH: &str = "rest/v1/";
const AUTH_PATH: &str = "auth/v1/";

const POSTS: &str = "posts";
const COMMENTS: &str = "comments";
const POST_LIKES: &str = "post_likes";
const PAIN_ENTRIES: &str = "pain_entries";

/// Client for the hosted backend: REST tables, RPC functions and the auth API.
///
/// Every request carries the public `apikey` header. The bearer token is the
/// signed-in user's access token when there is one, the public key otherwise,
/// so row-level security sees the right role.
#[derive(Clone)]
pub struct SupabaseClient {
    client: Client,
    rest_url: Url,
    auth_url: Url,
    anon_key: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
    error_code: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        self.message
            .or(self.msg)
            .or(self.error_description)
            .or(self.error)
    }

    /// The auth API answers a wrong password or a dead token with a 400
    /// carrying one of these codes.
    fn refuses_credentials(&self) -> bool {
        const REFUSALS: [&str; 3] = ["invalid_grant", "invalid_credentials", "bad_jwt"];
        [&self.error, &self.error_code]
            .into_iter()
            .flatten()
            .any(|code| REFUSALS.contains(&code.as_str()))
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: User,
}

#[derive(Debug, Deserialize)]
struct LikedRow {
    post_id: i64,
}

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

impl SupabaseClient {
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        let base = with_trailing_slash(&config.url);

        Ok(Self {
            client,
            rest_url: base.join(REST_PATH)?,
            auth_url: base.join(AUTH_PATH)?,
            anon_key: config.anon_key.clone(),
        })
    }

    fn bearer<'a>(&'a self, session: Option<&'a Session>) -> &'a str {
        session
            .map(|s| s.access_token.as_str())
            .unwrap_or(&self.anon_key)
    }

    fn request(&self, method: Method, url: Url, token: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: Query,
        session: Option<&Session>,
    ) -> Result<Vec<T>, BackendError> {
        debug!("GET {table}?{}", query.to_query_string());
        let response = self
            .request(Method::GET, self.rest_url.join(table)?, self.bearer(session))
            .query(query.params())
            .send()
            .await?;

        Ok(check(response).await?.json().await?)
    }

    async fn insert<B: Serialize + Sync>(
        &self,
        table: &str,
        body: &B,
        session: Option<&Session>,
    ) -> Result<(), BackendError> {
        debug!("POST {table}");
        let response = self
            .request(Method::POST, self.rest_url.join(table)?, self.bearer(session))
            .header("Prefer", "return=minimal")
            .json(body)
            .send()
            .await?;

        check(response).await?;
        Ok(())
    }

    async fn delete(
        &self,
        table: &str,
        query: Query,
        session: Option<&Session>,
    ) -> Result<(), BackendError> {
        debug!("DELETE {table}?{}", query.to_query_string());
        let response = self
            .request(Method::DELETE, self.rest_url.join(table)?, self.bearer(session))
            .query(query.params())
            .send()
            .await?;

        check(response).await?;
        Ok(())
    }

    async fn rpc(&self, function: &str, args: Value, session: &Session) -> Result<(), BackendError> {
        debug!("RPC {function}");
        let url = self.rest_url.join(&format!("rpc/{function}"))?;
        let response = self
            .request(Method::POST, url, &session.access_token)
            .json(&args)
            .send()
            .await?;

        check(response).await?;
        Ok(())
    }
}

#[async_trait]
impl DataStore for SupabaseClient {
    async fn list_posts(&self, session: Option<&Session>) -> Result<Vec<Post>, BackendError> {
        let query = Query::select(&format!("*,{COMMENTS}(*)"))
            .order("created_at", Direction::Desc)
            .order_embedded(COMMENTS, "created_at", Direction::Asc);
        self.select(POSTS, query, session).await
    }

    async fn liked_post_ids(&self, session: &Session) -> Result<HashSet<i64>, BackendError> {
        let query = Query::select("post_id").eq("user_id", session.user.id);
        let rows: Vec<LikedRow> = self.select(POST_LIKES, query, Some(session)).await?;
        Ok(rows.into_iter().map(|r| r.post_id).collect())
    }

    async fn insert_post(
        &self,
        session: Option<&Session>,
        post: &NewPost,
    ) -> Result<(), BackendError> {
        self.insert(POSTS, post, session).await
    }

    async fn find_like(
        &self,
        session: &Session,
        post_id: i64,
    ) -> Result<Option<PostLike>, BackendError> {
        let query = Query::select("*")
            .eq("post_id", post_id)
            .eq("user_id", session.user.id)
            .limit(1);
        let rows: Vec<PostLike> = self.select(POST_LIKES, query, Some(session)).await?;
        Ok(rows.into_iter().next())
    }

    async fn insert_like(&self, session: &Session, post_id: i64) -> Result<(), BackendError> {
        let like = NewPostLike {
            post_id,
            user_id: session.user.id,
        };
        self.insert(POST_LIKES, &like, Some(session)).await
    }

    async fn delete_like(&self, session: &Session, like_id: i64) -> Result<(), BackendError> {
        self.delete(POST_LIKES, Query::new().eq("id", like_id), Some(session))
            .await
    }

    async fn increment_likes(
        &self,
        session: &Session,
        post_id: i64,
    ) -> Result<(), BackendError> {
        self.rpc("increment_likes", json!({ "post_id": post_id }), session)
            .await
    }

    async fn decrement_likes(
        &self,
        session: &Session,
        post_id: i64,
    ) -> Result<(), BackendError> {
        self.rpc("decrement_likes", json!({ "post_id": post_id }), session)
            .await
    }

    async fn insert_comment(
        &self,
        session: &Session,
        comment: &NewComment,
    ) -> Result<(), BackendError> {
        self.insert(COMMENTS, comment, Some(session)).await
    }

    async fn recent_pain_entries(
        &self,
        session: &Session,
        limit: usize,
    ) -> Result<Vec<PainEntry>, BackendError> {
        let query = Query::select("*")
            .eq("user_id", session.user.id)
            .order("created_at", Direction::Desc)
            .limit(limit);
        self.select(PAIN_ENTRIES, query, Some(session)).await
    }

    async fn insert_pain_entry(
        &self,
        session: &Session,
        entry: &NewPainEntry,
    ) -> Result<(), BackendError> {
        self.insert(PAIN_ENTRIES, entry, Some(session)).await
    }
}

#[async_trait]
impl AuthProvider for SupabaseClient {
    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, BackendError> {
        let response = self
            .request(Method::POST, self.auth_url.join("signup")?, &self.anon_key)
            .json(&Credentials { email, password })
            .send()
            .await?;

        let body: Value = check_auth(response).await?.json().await?;
        let outcome = parse_sign_up(body)?;
        info!(
            "Sign-up accepted (confirmation required: {})",
            outcome.confirmation_required
        );
        Ok(outcome)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, BackendError> {
        let mut url = self.auth_url.join("token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");

        let response = self
            .request(Method::POST, url, &self.anon_key)
            .json(&Credentials { email, password })
            .send()
            .await?;

        let token: TokenResponse = check_auth(response).await?.json().await?;
        Ok(Session {
            user: token.user,
            access_token: token.access_token,
        })
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), BackendError> {
        let response = self
            .request(Method::POST, self.auth_url.join("logout")?, access_token)
            .send()
            .await?;

        check_auth(response).await?;
        Ok(())
    }

    async fn user_for_token(&self, access_token: &str) -> Result<User, BackendError> {
        let response = self
            .request(Method::GET, self.auth_url.join("user")?, access_token)
            .send()
            .await?;

        Ok(check_auth(response).await?.json().await?)
    }
}

/// Passes successful responses through; turns anything else into `BackendError::Api`
/// carrying the provider's message when the body has one.
async fn check(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body);
    warn!("Backend returned {}: {}", status, message);

    Err(BackendError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Like `check`, for the auth API: refused credentials or tokens become
/// `AuthRejected`, refused input becomes `Invalid`.
async fn check_auth(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let error = auth_error(status.as_u16(), &body);
    warn!("Auth API returned {}: {}", status, error);
    Err(error)
}

fn auth_error(status: u16, body: &str) -> BackendError {
    let parsed = serde_json::from_str::<ErrorBody>(body).ok();
    let refused = parsed.as_ref().is_some_and(ErrorBody::refuses_credentials);
    let message = parsed
        .and_then(ErrorBody::into_message)
        .unwrap_or_else(|| body.to_string());

    match status {
        401 | 403 => BackendError::AuthRejected(message),
        400 if refused => BackendError::AuthRejected(message),
        422 => BackendError::Invalid(message),
        _ => BackendError::Api { status, message },
    }
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(ErrorBody::into_message)
        .unwrap_or_else(|| body.to_string())
}

/// The sign-up endpoint answers with a full session when the project
/// auto-confirms accounts, and with a bare user object when it waits for
/// email confirmation.
fn parse_sign_up(body: Value) -> Result<SignUpOutcome, serde_json::Error> {
    if body.get("access_token").is_some() {
        let token: TokenResponse = serde_json::from_value(body)?;
        return Ok(SignUpOutcome {
            user: Some(token.user),
            confirmation_required: false,
        });
    }

    let nested = body.get("user").cloned();
    let user = if let Some(nested) = nested {
        Some(serde_json::from_value::<User>(nested)?)
    } else if body.get("id").is_some() {
        Some(serde_json::from_value::<User>(body)?)
    } else {
        None
    };

    Ok(SignUpOutcome {
        user,
        confirmation_required: true,
    })
}

fn with_trailing_slash(url: &Url) -> Url {
    let mut url = url.clone();
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
