//! Time-limited preview grants for a site's latest draft.

use chrono::Utc;
use serde::Serialize;
use sqlx::PgPool;
use vitrine_core::document::Document;
use vitrine_core::error::CoreError;
use vitrine_core::preview::{check_grant, generate_token, validate_ttl_secs};
use vitrine_core::site_status::ensure_writable;
use vitrine_core::types::{DbId, Timestamp};
use vitrine_db::repositories::SiteRepo;

use crate::error::SiteResult;
use crate::lookup::{latest_version, lock_site};

/// A freshly issued grant. The token is only ever returned here.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedPreview {
    pub token: String,
    pub expires_at: Timestamp,
}

pub struct PreviewTokenIssuer;

impl PreviewTokenIssuer {
    /// Issue a grant valid for `ttl_secs`, replacing any previous grant.
    pub async fn issue(pool: &PgPool, site_id: DbId, ttl_secs: i64) -> SiteResult<IssuedPreview> {
        let ttl = validate_ttl_secs(ttl_secs)?;

        let mut tx = pool.begin().await?;
        let site = lock_site(&mut tx, site_id).await?;
        ensure_writable(site.id, site.status())?;

        let token = generate_token();
        let expires_at = Utc::now() + ttl;
        SiteRepo::set_preview_grant(&mut tx, site_id, &token.hash, expires_at).await?;
        tx.commit().await?;

        tracing::info!(site_id, %expires_at, "Preview token issued");
        Ok(IssuedPreview {
            token: token.plaintext,
            expires_at,
        })
    }

    /// Resolve a preview link to the site's latest draft document.
    pub async fn resolve(pool: &PgPool, slug: &str, token: &str) -> SiteResult<Document> {
        Self::resolve_at(pool, slug, token, Utc::now()).await
    }

    /// [`Self::resolve`] against an explicit clock.
    pub async fn resolve_at(
        pool: &PgPool,
        slug: &str,
        token: &str,
        now: Timestamp,
    ) -> SiteResult<Document> {
        let site = SiteRepo::find_active_by_slug(pool, slug)
            .await?
            .ok_or_else(|| CoreError::SlugNotFound(slug.to_string()))?;

        if let Err(e) = check_grant(
            site.preview_token_hash.as_deref(),
            site.preview_expires_at,
            token,
            now,
        ) {
            tracing::debug!(site_id = site.id, error = %e, "Preview rejected");
            return Err(e.into());
        }

        let mut conn = pool.acquire().await?;
        let latest = latest_version(&mut conn, site.id).await?;
        Ok(latest.document.0)
    }
}
