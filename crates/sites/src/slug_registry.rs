//! Globally unique public slugs.
//!
//! A slug is reserved by the row that holds it: the partial unique index
//! `uq_sites_active_slug` admits one active holder per slug. Allocation reads
//! the taken candidates, picks the smallest free suffix, and inserts inside a
//! savepoint so that losing a race only costs a retry.

use sqlx::{Connection, PgConnection, PgPool};
use vitrine_core::error::CoreError;
use vitrine_core::slug::{candidate, first_free_suffix, slug_base, validate_slug};
use vitrine_core::types::DbId;
use vitrine_db::is_unique_violation;
use vitrine_db::models::site::Site;
use vitrine_db::repositories::SiteRepo;

use crate::error::SiteResult;

/// Unique index that reserves active slugs.
pub const ACTIVE_SLUG_INDEX: &str = "uq_sites_active_slug";

/// Allocation attempts before giving up with [`CoreError::SlugConflict`].
pub const MAX_ALLOCATION_ATTEMPTS: u32 = 10;

pub struct SlugRegistry;

impl SlugRegistry {
    /// Insert a new draft site under the first free slug derived from
    /// `slug_source` (`base`, `base-2`, `base-3`, ...), starting the probe at
    /// candidate `min_suffix`. Duplicates pass 2 so copies are always suffixed.
    ///
    /// Must run inside a transaction; each attempt uses its own savepoint.
    pub async fn allocate_unique(
        conn: &mut PgConnection,
        owner_id: DbId,
        name: &str,
        slug_source: &str,
        min_suffix: u32,
    ) -> SiteResult<Site> {
        let base = slug_base(slug_source);

        for attempt in 1..=MAX_ALLOCATION_ATTEMPTS {
            let taken = SiteRepo::active_slugs_with_base(conn, &base).await?;
            let suffix =
                first_free_suffix(&base, taken.iter().map(String::as_str), min_suffix);
            let slug = candidate(&base, suffix);

            let mut savepoint = conn.begin().await?;
            match SiteRepo::insert(&mut savepoint, owner_id, name, &slug).await {
                Ok(site) => {
                    savepoint.commit().await?;
                    return Ok(site);
                }
                Err(e) if is_unique_violation(&e, ACTIVE_SLUG_INDEX) => {
                    savepoint.rollback().await?;
                    tracing::debug!(slug = %slug, attempt, "Slug taken concurrently, probing again");
                }
                Err(e) => return Err(e.into()),
            }
        }

        tracing::warn!(base = %base, "Slug allocation gave up");
        Err(CoreError::SlugConflict(base).into())
    }

    /// Point a locked site at `new_slug`.
    ///
    /// Keeping the current slug is a no-op. A slug held by another active
    /// site is a [`CoreError::SlugConflict`].
    pub async fn rename(conn: &mut PgConnection, site: &Site, new_slug: &str) -> SiteResult<Site> {
        validate_slug(new_slug)?;
        if site.slug == new_slug && site.slug_active {
            return Ok(site.clone());
        }
        if SiteRepo::slug_in_use(conn, new_slug, Some(site.id)).await? {
            return Err(CoreError::SlugConflict(new_slug.to_string()).into());
        }

        match SiteRepo::update_slug(conn, site.id, new_slug).await {
            Ok(updated) => {
                tracing::info!(site_id = site.id, from = %site.slug, to = %new_slug, "Site slug changed");
                Ok(updated)
            }
            Err(e) if is_unique_violation(&e, ACTIVE_SLUG_INDEX) => {
                Err(CoreError::SlugConflict(new_slug.to_string()).into())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Free a site's slug for reuse by other sites.
    pub async fn release(conn: &mut PgConnection, site_id: DbId) -> SiteResult<Site> {
        let site = SiteRepo::release_slug(conn, site_id).await?;
        tracing::info!(site_id, slug = %site.slug, "Slug released");
        Ok(site)
    }

    /// Whether `slug` is well-formed and held by no active site.
    pub async fn is_available(pool: &PgPool, slug: &str) -> SiteResult<bool> {
        validate_slug(slug)?;
        let mut conn = pool.acquire().await?;
        Ok(!SiteRepo::slug_in_use(&mut conn, slug, None).await?)
    }
}
