pub mod health;
pub mod public;
pub mod sites;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /sites/...            operator endpoints (see routes::sites)
/// /public/sites/...     visitor and preview endpoints (see routes::public)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/sites", sites::router())
        .nest("/public/sites", public::router())
}
