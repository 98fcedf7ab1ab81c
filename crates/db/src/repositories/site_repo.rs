//! Repository for the `sites` table.
//!
//! Mutating queries take a `&mut PgConnection` so callers run them inside a
//! transaction that already holds the site row lock (see [`SiteRepo::lock_by_id`]).

use sqlx::{PgConnection, PgPool};
use vitrine_core::site_status::SiteStatus;
use vitrine_core::types::{DbId, Timestamp, VersionNumber};

use crate::models::site::Site;

/// Column list for sites queries.
const COLUMNS: &str = "id, owner_id, name, slug, slug_active, status_id, \
    published_version, published_snapshot, published_at, \
    preview_token_hash, preview_expires_at, archived_at, created_at, updated_at";

/// Column list qualified with the `s` alias, for joined updates.
const S_COLUMNS: &str = "s.id, s.owner_id, s.name, s.slug, s.slug_active, s.status_id, \
    s.published_version, s.published_snapshot, s.published_at, \
    s.preview_token_hash, s.preview_expires_at, s.archived_at, s.created_at, s.updated_at";

/// Provides data access for sites.
pub struct SiteRepo;

impl SiteRepo {
    /// Insert a new draft site holding `slug`.
    ///
    /// Fails with a unique violation on `uq_sites_active_slug` if another
    /// active site already holds the slug.
    pub async fn insert(
        conn: &mut PgConnection,
        owner_id: DbId,
        name: &str,
        slug: &str,
    ) -> Result<Site, sqlx::Error> {
        let query = format!(
            "INSERT INTO sites (owner_id, name, slug, status_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Site>(&query)
            .bind(owner_id)
            .bind(name)
            .bind(slug)
            .bind(SiteStatus::Draft.id())
            .fetch_one(conn)
            .await
    }

    /// Find a site by ID, archived or not.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Site>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sites WHERE id = $1");
        sqlx::query_as::<_, Site>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Load a site and take its row lock until the transaction ends.
    pub async fn lock_by_id(conn: &mut PgConnection, id: DbId) -> Result<Option<Site>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sites WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Site>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Find the site currently holding `slug`.
    pub async fn find_active_by_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<Site>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sites WHERE slug = $1 AND slug_active");
        sqlx::query_as::<_, Site>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// List an owner's sites, most recently updated first.
    pub async fn list_by_owner(
        pool: &PgPool,
        owner_id: DbId,
        include_archived: bool,
    ) -> Result<Vec<Site>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sites
             WHERE owner_id = $1
               AND ($2 OR status_id <> $3)
             ORDER BY updated_at DESC, id DESC"
        );
        sqlx::query_as::<_, Site>(&query)
            .bind(owner_id)
            .bind(include_archived)
            .bind(SiteStatus::Archived.id())
            .fetch_all(pool)
            .await
    }

    /// Active slugs equal to `base` or of the form `base-*`.
    ///
    /// `base` must already be a normalized slug, so it contains no `LIKE`
    /// metacharacters.
    pub async fn active_slugs_with_base(
        conn: &mut PgConnection,
        base: &str,
    ) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT slug FROM sites
             WHERE slug_active AND (slug = $1 OR slug LIKE $1 || '-%')",
        )
        .bind(base)
        .fetch_all(conn)
        .await?;
        Ok(rows.into_iter().map(|(slug,)| slug).collect())
    }

    /// Whether an active site other than `except` holds `slug`.
    pub async fn slug_in_use(
        conn: &mut PgConnection,
        slug: &str,
        except: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let (in_use,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(
                SELECT 1 FROM sites
                WHERE slug = $1 AND slug_active AND ($2::BIGINT IS NULL OR id <> $2)
             )",
        )
        .bind(slug)
        .bind(except)
        .fetch_one(conn)
        .await?;
        Ok(in_use)
    }

    /// Rename a site.
    pub async fn update_name(
        conn: &mut PgConnection,
        id: DbId,
        name: &str,
    ) -> Result<Site, sqlx::Error> {
        let query = format!("UPDATE sites SET name = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Site>(&query)
            .bind(id)
            .bind(name)
            .fetch_one(conn)
            .await
    }

    /// Point a site at a new slug.
    ///
    /// Fails with a unique violation on `uq_sites_active_slug` if another
    /// active site took the slug first.
    pub async fn update_slug(
        conn: &mut PgConnection,
        id: DbId,
        slug: &str,
    ) -> Result<Site, sqlx::Error> {
        let query = format!("UPDATE sites SET slug = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Site>(&query)
            .bind(id)
            .bind(slug)
            .fetch_one(conn)
            .await
    }

    /// Publish `version`: copy its document into the snapshot and mark the
    /// site published.
    ///
    /// The copy happens inside the statement, so the snapshot is exactly the
    /// stored revision. Returns `None` if the revision does not exist.
    pub async fn set_published(
        conn: &mut PgConnection,
        id: DbId,
        version: VersionNumber,
    ) -> Result<Option<Site>, sqlx::Error> {
        let query = format!(
            "UPDATE sites s SET
                published_version = v.version,
                published_snapshot = v.document,
                published_at = NOW(),
                status_id = $3
             FROM site_versions v
             WHERE s.id = $1 AND v.site_id = s.id AND v.version = $2
             RETURNING {S_COLUMNS}"
        );
        sqlx::query_as::<_, Site>(&query)
            .bind(id)
            .bind(version)
            .bind(SiteStatus::Published.id())
            .fetch_optional(conn)
            .await
    }

    /// Move a site to the terminal archived status and clear its preview grant.
    ///
    /// Publish state is left in place for the audit trail; archived sites are
    /// never served.
    pub async fn archive(conn: &mut PgConnection, id: DbId) -> Result<Site, sqlx::Error> {
        let query = format!(
            "UPDATE sites SET
                status_id = $2,
                archived_at = NOW(),
                preview_token_hash = NULL,
                preview_expires_at = NULL
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Site>(&query)
            .bind(id)
            .bind(SiteStatus::Archived.id())
            .fetch_one(conn)
            .await
    }

    /// Give up a site's slug so another site may claim it.
    pub async fn release_slug(conn: &mut PgConnection, id: DbId) -> Result<Site, sqlx::Error> {
        let query = format!("UPDATE sites SET slug_active = FALSE WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Site>(&query)
            .bind(id)
            .fetch_one(conn)
            .await
    }

    /// Store a preview grant, replacing any previous one.
    pub async fn set_preview_grant(
        conn: &mut PgConnection,
        id: DbId,
        token_hash: &str,
        expires_at: Timestamp,
    ) -> Result<Site, sqlx::Error> {
        let query = format!(
            "UPDATE sites SET preview_token_hash = $2, preview_expires_at = $3
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Site>(&query)
            .bind(id)
            .bind(token_hash)
            .bind(expires_at)
            .fetch_one(conn)
            .await
    }
}
