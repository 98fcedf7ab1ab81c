//! Handlers for site creation, lookup, duplication and info updates.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use vitrine_core::types::DbId;
use vitrine_db::models::site::{CreateSite, DuplicateSite, UpdateSiteInfo};

use crate::error::AppResult;
use crate::query::{ListSitesParams, SlugParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// Payload of the availability check.
#[derive(Debug, Serialize)]
pub struct SlugAvailability {
    pub slug: String,
    pub available: bool,
}

/// GET /api/v1/sites?owner_id=&include_archived=
///
/// Archived sites are omitted unless `include_archived=true`.
pub async fn list_sites(
    State(state): State<AppState>,
    Query(params): Query<ListSitesParams>,
) -> AppResult<impl IntoResponse> {
    let sites = state
        .sites
        .list_sites(params.owner_id, params.include_archived)
        .await?;
    Ok(Json(DataResponse { data: sites }))
}

/// POST /api/v1/sites
pub async fn create_site(
    State(state): State<AppState>,
    Json(input): Json<CreateSite>,
) -> AppResult<impl IntoResponse> {
    let site = state.sites.create_site(&input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: site })))
}

/// GET /api/v1/sites/slug-availability?slug=
pub async fn slug_availability(
    State(state): State<AppState>,
    Query(params): Query<SlugParams>,
) -> AppResult<impl IntoResponse> {
    let available = state.sites.slug_available(&params.slug).await?;
    Ok(Json(DataResponse {
        data: SlugAvailability {
            slug: params.slug,
            available,
        },
    }))
}

/// GET /api/v1/sites/{id}
///
/// Archived sites remain readable here.
pub async fn get_site(
    State(state): State<AppState>,
    Path(site_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let site = state.sites.get_site(site_id).await?;
    Ok(Json(DataResponse { data: site }))
}

/// PUT /api/v1/sites/{id}
///
/// Partial update of name, slug and status (`archived` only).
pub async fn update_site(
    State(state): State<AppState>,
    Path(site_id): Path<DbId>,
    Json(input): Json<UpdateSiteInfo>,
) -> AppResult<impl IntoResponse> {
    let site = state.sites.update_site_info(site_id, &input).await?;
    Ok(Json(DataResponse { data: site }))
}

/// POST /api/v1/sites/{id}/duplicate
pub async fn duplicate_site(
    State(state): State<AppState>,
    Path(source_id): Path<DbId>,
    Json(input): Json<DuplicateSite>,
) -> AppResult<impl IntoResponse> {
    let site = state.sites.duplicate_site(source_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: site })))
}
