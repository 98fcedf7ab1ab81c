//! Route definitions for site management, mounted at `/sites`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{preview, publish, sites, versions};
use crate::state::AppState;

/// ```text
/// GET    /                          -> list_sites
/// POST   /                          -> create_site
/// GET    /slug-availability         -> slug_availability
/// GET    /{id}                      -> get_site
/// PUT    /{id}                      -> update_site
/// POST   /{id}/duplicate            -> duplicate_site
/// POST   /{id}/archive              -> archive_site
/// GET    /{id}/versions             -> list_versions
/// POST   /{id}/versions             -> append_version
/// GET    /{id}/versions/{version}   -> get_version
/// POST   /{id}/refine               -> refine
/// POST   /{id}/publish              -> publish
/// POST   /{id}/rollback             -> rollback
/// POST   /{id}/preview-token        -> issue_preview_token
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(sites::list_sites).post(sites::create_site))
        .route("/slug-availability", get(sites::slug_availability))
        .route("/{id}", get(sites::get_site).put(sites::update_site))
        .route("/{id}/duplicate", post(sites::duplicate_site))
        .route("/{id}/archive", post(publish::archive_site))
        .route(
            "/{id}/versions",
            get(versions::list_versions).post(versions::append_version),
        )
        .route("/{id}/versions/{version}", get(versions::get_version))
        .route("/{id}/refine", post(versions::refine))
        .route("/{id}/publish", post(publish::publish))
        .route("/{id}/rollback", post(publish::rollback))
        .route("/{id}/preview-token", post(preview::issue_preview_token))
}
