//! Shared "load or NotFound" helpers.

use sqlx::{PgConnection, PgPool};
use vitrine_core::error::CoreError;
use vitrine_core::types::DbId;
use vitrine_db::models::site::Site;
use vitrine_db::models::site_version::SiteVersion;
use vitrine_db::repositories::{SiteRepo, SiteVersionRepo};

use crate::error::SiteResult;

pub(crate) fn site_not_found(id: DbId) -> CoreError {
    CoreError::NotFound { entity: "site", id }
}

pub(crate) async fn find_site(pool: &PgPool, id: DbId) -> SiteResult<Site> {
    SiteRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| site_not_found(id).into())
}

/// Load a site under its row lock.
pub(crate) async fn lock_site(conn: &mut PgConnection, id: DbId) -> SiteResult<Site> {
    SiteRepo::lock_by_id(conn, id)
        .await?
        .ok_or_else(|| site_not_found(id).into())
}

/// The newest revision of a site. Every site has at least one.
pub(crate) async fn latest_version(conn: &mut PgConnection, site_id: DbId) -> SiteResult<SiteVersion> {
    SiteVersionRepo::find_latest(conn, site_id)
        .await?
        .ok_or_else(|| {
            CoreError::NotFound {
                entity: "site_version",
                id: site_id,
            }
            .into()
        })
}
