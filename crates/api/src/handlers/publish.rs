//! Handlers for publish, rollback and archive.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use vitrine_core::types::DbId;
use vitrine_db::models::site_version::{PublishSite, RollbackSite};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/sites/{id}/publish
pub async fn publish(
    State(state): State<AppState>,
    Path(site_id): Path<DbId>,
    Json(input): Json<PublishSite>,
) -> AppResult<impl IntoResponse> {
    let site = state.sites.publish(site_id, input.version).await?;
    Ok(Json(DataResponse { data: site }))
}

/// POST /api/v1/sites/{id}/rollback
///
/// Clones the requested revision into a new one and publishes it.
pub async fn rollback(
    State(state): State<AppState>,
    Path(site_id): Path<DbId>,
    Json(input): Json<RollbackSite>,
) -> AppResult<impl IntoResponse> {
    let outcome = state
        .sites
        .rollback(site_id, input.version, input.notes, input.created_by)
        .await?;
    Ok(Json(DataResponse { data: outcome }))
}

/// POST /api/v1/sites/{id}/archive
pub async fn archive_site(
    State(state): State<AppState>,
    Path(site_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let site = state.sites.archive(site_id).await?;
    Ok(Json(DataResponse { data: site }))
}
