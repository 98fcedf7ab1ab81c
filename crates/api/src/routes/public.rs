//! Unauthenticated routes, mounted at `/public/sites`.

use axum::routing::get;
use axum::Router;

use crate::handlers::{preview, public};
use crate::state::AppState;

/// ```text
/// GET    /{slug}            -> get_published
/// GET    /{slug}/preview    -> resolve_preview (?token=)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{slug}", get(public::get_published))
        .route("/{slug}/preview", get(preview::resolve_preview))
}
