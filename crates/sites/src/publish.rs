//! Publish, rollback and archive.
//!
//! Publishing copies a revision's document into the site's snapshot; later
//! appends never touch it. Rollback never repoints to an old number: it
//! clones the target into a new revision and publishes that, so history
//! stays append-only.

use serde::Serialize;
use sqlx::{PgConnection, PgPool};
use vitrine_core::error::CoreError;
use vitrine_core::site_status::{ensure_writable, SiteStatus};
use vitrine_core::types::{DbId, VersionNumber};
use vitrine_db::is_unique_violation;
use vitrine_db::models::site::Site;
use vitrine_db::models::site_version::{NewSiteVersion, SiteVersion};
use vitrine_db::repositories::{SiteRepo, SiteVersionRepo};

use crate::error::{SiteError, SiteResult};
use crate::lookup::lock_site;
use crate::slug_registry::SlugRegistry;
use crate::version_store::{VersionStore, VERSION_UNIQUE_CONSTRAINT};

/// Result of a rollback: the site and the revision that is now live.
#[derive(Debug, Clone, Serialize)]
pub struct RollbackOutcome {
    pub site: Site,
    pub version: SiteVersion,
    pub rolled_back_to: VersionNumber,
}

pub struct PublishCoordinator;

impl PublishCoordinator {
    /// Make `version` the live snapshot of the site.
    ///
    /// Publishing the already-published version only refreshes `published_at`.
    pub async fn publish(pool: &PgPool, site_id: DbId, version: VersionNumber) -> SiteResult<Site> {
        let mut tx = pool.begin().await?;
        let site = lock_site(&mut tx, site_id).await?;

        let published = Self::publish_locked(&mut tx, &site, version).await?;
        tx.commit().await?;

        tracing::info!(
            site_id,
            version,
            previous = ?site.published_version,
            "Site published"
        );
        Ok(published)
    }

    /// Publish on a connection that already holds the lock on `site`.
    pub async fn publish_locked(
        conn: &mut PgConnection,
        site: &Site,
        version: VersionNumber,
    ) -> SiteResult<Site> {
        let site_id = site.id;
        if !site.status().can_transition_to(SiteStatus::Published) {
            return Err(CoreError::SiteArchived(site_id).into());
        }
        let revision = SiteVersionRepo::find(conn, site_id, version)
            .await?
            .ok_or(CoreError::VersionNotFound { site_id, version })?;
        revision.document.validate_publishable()?;

        SiteRepo::set_published(conn, site_id, version)
            .await?
            .ok_or_else(|| CoreError::VersionNotFound { site_id, version }.into())
    }

    /// Clone revision `version` into a new revision and publish it.
    ///
    /// Notes default to `"Rollback to version N"`.
    pub async fn rollback(
        pool: &PgPool,
        site_id: DbId,
        version: VersionNumber,
        notes: Option<String>,
        created_by: Option<DbId>,
    ) -> SiteResult<RollbackOutcome> {
        let mut tx = pool.begin().await?;
        let site = lock_site(&mut tx, site_id).await?;
        ensure_writable(site.id, site.status())?;

        let target = SiteVersionRepo::find(&mut tx, site_id, version)
            .await?
            .ok_or(CoreError::VersionNotFound { site_id, version })?;
        target.document.validate_publishable()?;

        let clone = NewSiteVersion::new(
            target.document.0,
            Some(target.theme.0),
            Some(notes.unwrap_or_else(|| format!("Rollback to version {version}"))),
            created_by,
        );
        let new_version = match VersionStore::append_locked(&mut tx, site_id, &clone).await {
            Ok(v) => v,
            Err(SiteError::Database(e)) if is_unique_violation(&e, VERSION_UNIQUE_CONSTRAINT) => {
                return Err(CoreError::VersionRace {
                    site_id,
                    attempts: 1,
                }
                .into());
            }
            Err(e) => return Err(e),
        };
        let site = Self::publish_locked(&mut tx, &site, new_version.version).await?;
        tx.commit().await?;

        tracing::info!(
            site_id,
            rolled_back_to = version,
            version = new_version.version,
            "Site rolled back"
        );
        Ok(RollbackOutcome {
            site,
            version: new_version,
            rolled_back_to: version,
        })
    }

    /// Archive a site. Archiving an archived site returns it unchanged.
    pub async fn archive(pool: &PgPool, site_id: DbId) -> SiteResult<Site> {
        let mut tx = pool.begin().await?;
        let site = lock_site(&mut tx, site_id).await?;
        let archived = Self::archive_locked(&mut tx, &site).await?;
        tx.commit().await?;
        Ok(archived)
    }

    /// Archive on a connection that already holds the site lock: terminal
    /// status, preview grant cleared, slug released.
    pub async fn archive_locked(conn: &mut PgConnection, site: &Site) -> SiteResult<Site> {
        if site.status() == SiteStatus::Archived {
            return Ok(site.clone());
        }
        SiteRepo::archive(conn, site.id).await?;
        let archived = SlugRegistry::release(conn, site.id).await?;
        tracing::info!(site_id = site.id, "Site archived");
        Ok(archived)
    }
}
