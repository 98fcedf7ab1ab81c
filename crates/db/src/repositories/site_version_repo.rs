//! Repository for the `site_versions` table.
//!
//! Revisions are insert-only; the table's trigger rejects updates and deletes.

use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};
use vitrine_core::types::{DbId, VersionNumber};

use crate::models::site_version::{NewSiteVersion, SiteVersion};

/// Column list for site_versions queries.
const COLUMNS: &str = "id, site_id, version, document, theme, notes, created_by, created_at";

/// Provides insert and read operations for site revisions.
pub struct SiteVersionRepo;

impl SiteVersionRepo {
    /// Insert revision `version` of a site.
    ///
    /// Fails with a unique violation on `uq_site_versions_site_version` if
    /// the number is already taken.
    pub async fn insert(
        conn: &mut PgConnection,
        site_id: DbId,
        version: VersionNumber,
        input: &NewSiteVersion,
    ) -> Result<SiteVersion, sqlx::Error> {
        let query = format!(
            "INSERT INTO site_versions (site_id, version, document, theme, notes, created_by)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SiteVersion>(&query)
            .bind(site_id)
            .bind(version)
            .bind(Json(&input.document))
            .bind(Json(&input.theme))
            .bind(&input.notes)
            .bind(input.created_by)
            .fetch_one(conn)
            .await
    }

    /// Highest version number of a site (0 if it has none).
    pub async fn max_version(
        conn: &mut PgConnection,
        site_id: DbId,
    ) -> Result<VersionNumber, sqlx::Error> {
        let (max,): (VersionNumber,) = sqlx::query_as(
            "SELECT COALESCE(MAX(version), 0) FROM site_versions WHERE site_id = $1",
        )
        .bind(site_id)
        .fetch_one(conn)
        .await?;
        Ok(max)
    }

    /// Find one revision of a site.
    pub async fn find(
        conn: &mut PgConnection,
        site_id: DbId,
        version: VersionNumber,
    ) -> Result<Option<SiteVersion>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM site_versions WHERE site_id = $1 AND version = $2");
        sqlx::query_as::<_, SiteVersion>(&query)
            .bind(site_id)
            .bind(version)
            .fetch_optional(conn)
            .await
    }

    /// Find the highest-numbered revision of a site.
    pub async fn find_latest(
        conn: &mut PgConnection,
        site_id: DbId,
    ) -> Result<Option<SiteVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM site_versions
             WHERE site_id = $1
             ORDER BY version DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, SiteVersion>(&query)
            .bind(site_id)
            .fetch_optional(conn)
            .await
    }

    /// List all revisions of a site, newest first.
    pub async fn list_by_site(
        pool: &PgPool,
        site_id: DbId,
    ) -> Result<Vec<SiteVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM site_versions
             WHERE site_id = $1
             ORDER BY version DESC"
        );
        sqlx::query_as::<_, SiteVersion>(&query)
            .bind(site_id)
            .fetch_all(pool)
            .await
    }
}
