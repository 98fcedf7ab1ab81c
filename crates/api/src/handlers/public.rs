use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/public/sites/{slug}
///
/// Serves the frozen snapshot of a published site. Drafts and archived
/// sites are 404.
pub async fn get_published(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let published = state.sites.get_published_by_slug(&slug).await?;
    Ok(Json(DataResponse { data: published }))
}
