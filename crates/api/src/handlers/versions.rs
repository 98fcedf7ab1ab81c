//! Handlers for site revisions and refinement.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use vitrine_core::types::{DbId, VersionNumber};
use vitrine_db::models::site_version::{AppendSiteVersion, RefineSite};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/sites/{id}/versions
///
/// Newest first.
pub async fn list_versions(
    State(state): State<AppState>,
    Path(site_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let versions = state.sites.list_versions(site_id).await?;
    Ok(Json(DataResponse { data: versions }))
}

/// POST /api/v1/sites/{id}/versions
pub async fn append_version(
    State(state): State<AppState>,
    Path(site_id): Path<DbId>,
    Json(input): Json<AppendSiteVersion>,
) -> AppResult<impl IntoResponse> {
    let version = state.sites.append_version(site_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: version })))
}

/// GET /api/v1/sites/{id}/versions/{version}
pub async fn get_version(
    State(state): State<AppState>,
    Path((site_id, version)): Path<(DbId, VersionNumber)>,
) -> AppResult<impl IntoResponse> {
    let version = state.sites.get_version(site_id, version).await?;
    Ok(Json(DataResponse { data: version }))
}

/// POST /api/v1/sites/{id}/refine
///
/// Asks the refinement engine for a new revision based on the latest one.
pub async fn refine(
    State(state): State<AppState>,
    Path(site_id): Path<DbId>,
    Json(input): Json<RefineSite>,
) -> AppResult<impl IntoResponse> {
    let version = state.sites.refine(site_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: version })))
}
