use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

use crate::auth::{require_session, BearerToken};
use crate::errors::{AppError, DEGRADED_NOTICE};
use crate::extract::{Json as JsonBody, Query};
use crate::state::AppState;
use crate::tracker::entries::{
    clamp_level, current_entries, record_entry, NewEntryRequest, TrackerResponse,
};
use crate::tracker::severity::SeverityView;

/// GET /api/v1/pain-entries
pub async fn handle_list_entries(
    State(state): State<AppState>,
    token: BearerToken,
) -> Result<Json<TrackerResponse>, AppError> {
    let Some(store) = state.store.as_deref() else {
        return Ok(Json(TrackerResponse::empty_with_notice(DEGRADED_NOTICE)));
    };
    let session = require_session(state.auth()?, token.require()?).await?;

    Ok(Json(current_entries(store, &session).await))
}

/// POST /api/v1/pain-entries
pub async fn handle_record_entry(
    State(state): State<AppState>,
    token: BearerToken,
    JsonBody(req): JsonBody<NewEntryRequest>,
) -> Result<(StatusCode, Json<TrackerResponse>), AppError> {
    let store = state.store()?;
    let session = require_session(state.auth()?, token.require()?).await?;

    record_entry(store, &session, req).await?;

    Ok((StatusCode::CREATED, Json(current_entries(store, &session).await)))
}

#[derive(Debug, Deserialize)]
pub struct SeverityQuery {
    pub level: i64,
}

/// GET /api/v1/severity?level=N
pub async fn handle_severity(Query(query): Query<SeverityQuery>) -> Json<SeverityView> {
    Json(SeverityView::for_level(clamp_level(query.level)))
}
