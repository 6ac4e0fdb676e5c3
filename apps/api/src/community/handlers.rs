use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

use crate::auth::{optional_session, require_session, session_if_present, BearerToken};
use crate::community::comments::{add_comment, validate_comment, NewCommentRequest};
use crate::community::feed::{current_feed, CategoryFilter, FeedResponse};
use crate::community::likes::toggle_like;
use crate::community::posts::{create_post, NewPostRequest, PostDraft};
use crate::errors::AppError;
use crate::extract::{Json as JsonBody, Path, Query};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    #[serde(default)]
    pub category: CategoryFilter,
}

/// GET /api/v1/posts
pub async fn handle_list_posts(
    State(state): State<AppState>,
    token: BearerToken,
    Query(query): Query<FeedQuery>,
) -> Json<FeedResponse> {
    let session = optional_session(state.auth.as_deref(), &token).await;
    Json(current_feed(state.store.as_deref(), session.as_ref(), query.category).await)
}

/// POST /api/v1/posts
pub async fn handle_create_post(
    State(state): State<AppState>,
    token: BearerToken,
    Query(query): Query<FeedQuery>,
    JsonBody(req): JsonBody<NewPostRequest>,
) -> Result<(StatusCode, Json<FeedResponse>), AppError> {
    let store = state.store()?;
    let draft = PostDraft::validate(req)?;

    let session = session_if_present(state.auth()?, &token).await?;
    create_post(store, session.as_ref(), draft).await?;

    let feed = current_feed(Some(store), session.as_ref(), query.category).await;
    Ok((StatusCode::CREATED, Json(feed)))
}

/// POST /api/v1/posts/:id/like
pub async fn handle_toggle_like(
    State(state): State<AppState>,
    token: BearerToken,
    Path(post_id): Path<i64>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<FeedResponse>, AppError> {
    let store = state.store()?;
    let session = require_session(state.auth()?, token.require()?).await?;

    toggle_like(store, &session, post_id).await?;

    Ok(Json(
        current_feed(Some(store), Some(&session), query.category).await,
    ))
}

/// POST /api/v1/posts/:id/comments
pub async fn handle_add_comment(
    State(state): State<AppState>,
    token: BearerToken,
    Path(post_id): Path<i64>,
    Query(query): Query<FeedQuery>,
    JsonBody(req): JsonBody<NewCommentRequest>,
) -> Result<(StatusCode, Json<FeedResponse>), AppError> {
    let store = state.store()?;
    let token = token.require()?;
    let text = validate_comment(&req.text)?;
    let session = require_session(state.auth()?, token).await?;

    add_comment(store, &session, post_id, text).await?;

    let feed = current_feed(Some(store), Some(&session), query.category).await;
    Ok((StatusCode::CREATED, Json(feed)))
}
