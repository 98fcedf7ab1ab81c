//! Append-only, gap-free revision numbering.
//!
//! Numbers are assigned as `MAX(version) + 1` while the site row lock is
//! held, so concurrent appends to one site serialize and land on 1..N with
//! no gaps. The `(site_id, version)` unique constraint backs this up: a
//! violation means some writer skipped the lock, and the append is retried
//! from a fresh transaction.

use sqlx::{PgConnection, PgPool};
use vitrine_core::error::CoreError;
use vitrine_core::site_status::ensure_writable;
use vitrine_core::types::{DbId, VersionNumber};
use vitrine_db::is_unique_violation;
use vitrine_db::models::site_version::{NewSiteVersion, SiteVersion};
use vitrine_db::repositories::SiteVersionRepo;

use crate::error::{SiteError, SiteResult};
use crate::lookup::{find_site, latest_version, lock_site};

/// Unique constraint on `(site_id, version)`.
pub const VERSION_UNIQUE_CONSTRAINT: &str = "uq_site_versions_site_version";

/// Append attempts before giving up with [`CoreError::VersionRace`].
pub const MAX_APPEND_ATTEMPTS: u32 = 5;

pub struct VersionStore;

impl VersionStore {
    /// Write revision 1 of a site created in the same transaction.
    pub async fn create_initial(
        conn: &mut PgConnection,
        site_id: DbId,
        input: &NewSiteVersion,
    ) -> SiteResult<SiteVersion> {
        Ok(SiteVersionRepo::insert(conn, site_id, 1, input).await?)
    }

    /// Append a revision as `max + 1`.
    ///
    /// Rejected with [`CoreError::SiteArchived`] once the site is archived.
    pub async fn append(
        pool: &PgPool,
        site_id: DbId,
        input: &NewSiteVersion,
    ) -> SiteResult<SiteVersion> {
        for attempt in 1..=MAX_APPEND_ATTEMPTS {
            let mut tx = pool.begin().await?;
            let site = lock_site(&mut tx, site_id).await?;
            ensure_writable(site.id, site.status())?;

            match Self::append_locked(&mut tx, site_id, input).await {
                Ok(version) => {
                    tx.commit().await?;
                    tracing::info!(
                        site_id,
                        version = version.version,
                        sections = input.document.section_count(),
                        "Revision appended"
                    );
                    return Ok(version);
                }
                Err(SiteError::Database(e)) if is_unique_violation(&e, VERSION_UNIQUE_CONSTRAINT) => {
                    tx.rollback().await?;
                    tracing::warn!(site_id, attempt, "Version number taken concurrently, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(CoreError::VersionRace {
            site_id,
            attempts: MAX_APPEND_ATTEMPTS,
        }
        .into())
    }

    /// Insert `max + 1` on a connection that already holds the site lock.
    pub async fn append_locked(
        conn: &mut PgConnection,
        site_id: DbId,
        input: &NewSiteVersion,
    ) -> SiteResult<SiteVersion> {
        let next = SiteVersionRepo::max_version(conn, site_id).await? + 1;
        Ok(SiteVersionRepo::insert(conn, site_id, next, input).await?)
    }

    /// All revisions of a site, newest first.
    pub async fn list(pool: &PgPool, site_id: DbId) -> SiteResult<Vec<SiteVersion>> {
        find_site(pool, site_id).await?;
        Ok(SiteVersionRepo::list_by_site(pool, site_id).await?)
    }

    /// One revision of a site.
    pub async fn get(
        pool: &PgPool,
        site_id: DbId,
        version: VersionNumber,
    ) -> SiteResult<SiteVersion> {
        find_site(pool, site_id).await?;
        let mut conn = pool.acquire().await?;
        SiteVersionRepo::find(&mut conn, site_id, version)
            .await?
            .ok_or_else(|| CoreError::VersionNotFound { site_id, version }.into())
    }

    /// The newest revision of a site.
    pub async fn latest(pool: &PgPool, site_id: DbId) -> SiteResult<SiteVersion> {
        find_site(pool, site_id).await?;
        let mut conn = pool.acquire().await?;
        latest_version(&mut conn, site_id).await
    }
}
