//! Handlers for preview grants.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use vitrine_core::types::DbId;
use vitrine_db::models::site::IssuePreviewToken;

use crate::error::AppResult;
use crate::query::PreviewParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/sites/{id}/preview-token
///
/// Returns the plaintext token once; only its digest is stored.
pub async fn issue_preview_token(
    State(state): State<AppState>,
    Path(site_id): Path<DbId>,
    input: Option<Json<IssuePreviewToken>>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = input.unwrap_or_default();
    let grant = state
        .sites
        .issue_preview_token(site_id, input.ttl_secs)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: grant })))
}

/// GET /api/v1/public/sites/{slug}/preview?token=
///
/// The latest draft document, for holders of a valid grant.
pub async fn resolve_preview(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<PreviewParams>,
) -> AppResult<impl IntoResponse> {
    let document = state.sites.resolve_preview(&slug, &params.token).await?;
    Ok(Json(DataResponse { data: document }))
}
