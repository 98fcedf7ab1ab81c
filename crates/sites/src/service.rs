//! The single entry point the HTTP layer talks to.

use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;
use vitrine_core::document::Document;
use vitrine_core::error::CoreError;
use vitrine_core::preview::DEFAULT_TTL_SECS;
use vitrine_core::refinement::{refine_document, InFlightRefinements, RefinementEngine, DEFAULT_TIMEOUT};
use vitrine_core::site_status::{ensure_writable, SiteStatus};
use vitrine_core::types::{DbId, VersionNumber};
use vitrine_db::models::site::{CreateSite, DuplicateSite, PublishedSite, Site, UpdateSiteInfo};
use vitrine_db::models::site_version::{AppendSiteVersion, NewSiteVersion, RefineSite, SiteVersion};
use vitrine_db::repositories::SiteRepo;

use crate::error::SiteResult;
use crate::lifecycle::SiteLifecycleManager;
use crate::lookup::find_site;
use crate::preview::{IssuedPreview, PreviewTokenIssuer};
use crate::publish::{PublishCoordinator, RollbackOutcome};
use crate::slug_registry::SlugRegistry;
use crate::version_store::VersionStore;

/// Tunables for [`SiteService`].
#[derive(Debug, Clone)]
pub struct SiteServiceConfig {
    /// Lifetime of a preview grant when the caller does not pick one.
    pub preview_ttl_secs: i64,
    /// Budget for a single refinement engine call.
    pub refinement_timeout: Duration,
}

impl Default for SiteServiceConfig {
    fn default() -> Self {
        Self {
            preview_ttl_secs: DEFAULT_TTL_SECS,
            refinement_timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Site versioning and publishing, backed by one connection pool.
///
/// Cheap to share: wrap in an `Arc` and clone into request handlers.
pub struct SiteService {
    pool: PgPool,
    config: SiteServiceConfig,
    engine: Option<Arc<dyn RefinementEngine>>,
    in_flight: InFlightRefinements,
}

impl SiteService {
    pub fn new(pool: PgPool, config: SiteServiceConfig) -> Self {
        Self {
            pool,
            config,
            engine: None,
            in_flight: InFlightRefinements::new(),
        }
    }

    /// Attach the engine used by [`SiteService::refine`].
    pub fn with_refinement_engine(mut self, engine: Arc<dyn RefinementEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    // -- lifecycle ----------------------------------------------------------

    pub async fn create_site(&self, input: &CreateSite) -> SiteResult<Site> {
        SiteLifecycleManager::create(&self.pool, input).await
    }

    pub async fn duplicate_site(&self, source_id: DbId, input: &DuplicateSite) -> SiteResult<Site> {
        SiteLifecycleManager::duplicate(&self.pool, source_id, input).await
    }

    pub async fn update_site_info(&self, site_id: DbId, input: &UpdateSiteInfo) -> SiteResult<Site> {
        SiteLifecycleManager::update_info(&self.pool, site_id, input).await
    }

    /// An owner's sites; archived ones only when asked for.
    pub async fn list_sites(&self, owner_id: DbId, include_archived: bool) -> SiteResult<Vec<Site>> {
        Ok(SiteRepo::list_by_owner(&self.pool, owner_id, include_archived).await?)
    }

    /// A site by ID, archived or not.
    pub async fn get_site(&self, site_id: DbId) -> SiteResult<Site> {
        find_site(&self.pool, site_id).await
    }

    pub async fn slug_available(&self, slug: &str) -> SiteResult<bool> {
        SlugRegistry::is_available(&self.pool, slug).await
    }

    // -- revisions ----------------------------------------------------------

    pub async fn list_versions(&self, site_id: DbId) -> SiteResult<Vec<SiteVersion>> {
        VersionStore::list(&self.pool, site_id).await
    }

    pub async fn get_version(&self, site_id: DbId, version: VersionNumber) -> SiteResult<SiteVersion> {
        VersionStore::get(&self.pool, site_id, version).await
    }

    /// Validate an operator-supplied document and append it.
    pub async fn append_version(
        &self,
        site_id: DbId,
        input: &AppendSiteVersion,
    ) -> SiteResult<SiteVersion> {
        let document = Document::from_value(input.document.clone())?;
        if let Some(theme) = &input.theme {
            theme.validate()?;
        }
        let revision = NewSiteVersion::new(
            document,
            input.theme.clone(),
            input.notes.clone(),
            input.created_by,
        );
        VersionStore::append(&self.pool, site_id, &revision).await
    }

    /// Ask the refinement engine to rewrite the latest revision and append
    /// the result.
    ///
    /// One refinement per site at a time. The engine call runs outside any
    /// transaction; nothing is written unless it returns a valid document.
    pub async fn refine(&self, site_id: DbId, input: &RefineSite) -> SiteResult<SiteVersion> {
        let engine = self.engine.as_ref().ok_or_else(|| {
            CoreError::GenerationFailure("refinement engine not configured".into())
        })?;
        let _guard = self.in_flight.try_acquire(site_id)?;

        let site = find_site(&self.pool, site_id).await?;
        ensure_writable(site.id, site.status())?;
        let latest = VersionStore::latest(&self.pool, site_id).await?;

        let document = match refine_document(
            engine.as_ref(),
            &latest.document,
            &input.instruction,
            self.config.refinement_timeout,
        )
        .await
        {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!(site_id, base_version = latest.version, error = %e, "Refinement failed");
                return Err(e.into());
            }
        };

        let revision = NewSiteVersion::new(document, None, input.notes.clone(), input.created_by);
        let appended = VersionStore::append(&self.pool, site_id, &revision).await?;
        tracing::info!(
            site_id,
            base_version = latest.version,
            version = appended.version,
            "Refinement applied"
        );
        Ok(appended)
    }

    // -- publishing ---------------------------------------------------------

    pub async fn publish(&self, site_id: DbId, version: VersionNumber) -> SiteResult<Site> {
        PublishCoordinator::publish(&self.pool, site_id, version).await
    }

    pub async fn rollback(
        &self,
        site_id: DbId,
        version: VersionNumber,
        notes: Option<String>,
        created_by: Option<DbId>,
    ) -> SiteResult<RollbackOutcome> {
        PublishCoordinator::rollback(&self.pool, site_id, version, notes, created_by).await
    }

    pub async fn archive(&self, site_id: DbId) -> SiteResult<Site> {
        PublishCoordinator::archive(&self.pool, site_id).await
    }

    /// The frozen snapshot served at a slug.
    ///
    /// Only active, published sites resolve; drafts and archived sites are
    /// [`CoreError::SlugNotFound`].
    pub async fn get_published_by_slug(&self, slug: &str) -> SiteResult<PublishedSite> {
        let not_found = || CoreError::SlugNotFound(slug.to_string());
        let site = SiteRepo::find_active_by_slug(&self.pool, slug)
            .await?
            .ok_or_else(not_found)?;
        if site.status() != SiteStatus::Published {
            return Err(not_found().into());
        }
        let (Some(version), Some(snapshot)) = (site.published_version, site.published_snapshot) else {
            return Err(not_found().into());
        };

        Ok(PublishedSite {
            name: site.name,
            slug: site.slug,
            version,
            published_at: site.published_at,
            document: snapshot.0,
        })
    }

    // -- previews -----------------------------------------------------------

    /// Issue a preview grant; `ttl_secs` defaults to the configured lifetime.
    pub async fn issue_preview_token(
        &self,
        site_id: DbId,
        ttl_secs: Option<i64>,
    ) -> SiteResult<IssuedPreview> {
        let ttl_secs = ttl_secs.unwrap_or(self.config.preview_ttl_secs);
        PreviewTokenIssuer::issue(&self.pool, site_id, ttl_secs).await
    }

    pub async fn resolve_preview(&self, slug: &str, token: &str) -> SiteResult<Document> {
        PreviewTokenIssuer::resolve(&self.pool, slug, token).await
    }
}
