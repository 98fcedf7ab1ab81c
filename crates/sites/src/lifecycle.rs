//! Site creation, duplication and info updates.

use sqlx::PgPool;
use vitrine_core::document::Document;
use vitrine_core::site_name::{copy_name, normalize_name};
use vitrine_core::site_status::{ensure_writable, requested_transition, SiteStatus};
use vitrine_core::types::DbId;
use vitrine_db::models::site::{CreateSite, DuplicateSite, Site, UpdateSiteInfo};
use vitrine_db::models::site_version::NewSiteVersion;
use vitrine_db::repositories::SiteRepo;

use crate::error::SiteResult;
use crate::lookup::{find_site, latest_version, lock_site};
use crate::publish::PublishCoordinator;
use crate::slug_registry::SlugRegistry;
use crate::version_store::VersionStore;

pub struct SiteLifecycleManager;

impl SiteLifecycleManager {
    /// Create a draft site with a fresh slug and revision 1.
    ///
    /// The name and document are validated before anything is written.
    pub async fn create(pool: &PgPool, input: &CreateSite) -> SiteResult<Site> {
        let name = normalize_name(&input.name)?;
        let document = Document::from_value(input.document.clone())?;
        let initial = NewSiteVersion::new(
            document,
            None,
            Some("Initial version".to_string()),
            input.created_by,
        );

        let mut tx = pool.begin().await?;
        let site = SlugRegistry::allocate_unique(&mut tx, input.owner_id, &name, &name, 1).await?;
        VersionStore::create_initial(&mut tx, site.id, &initial).await?;
        tx.commit().await?;

        tracing::info!(site_id = site.id, owner_id = site.owner_id, slug = %site.slug, "Site created");
        Ok(site)
    }

    /// Copy a site's latest revision into a new draft site.
    ///
    /// The copy gets `"<name> (copy)"`, a slug derived from the source name,
    /// and a single revision. Publish state, preview grants and history stay
    /// with the source. Archived sources may be duplicated.
    pub async fn duplicate(
        pool: &PgPool,
        source_id: DbId,
        input: &DuplicateSite,
    ) -> SiteResult<Site> {
        let source = find_site(pool, source_id).await?;

        let mut tx = pool.begin().await?;
        let latest = latest_version(&mut tx, source_id).await?;
        let initial = NewSiteVersion::new(
            latest.document.0,
            Some(latest.theme.0),
            Some(format!(
                "Duplicated from site {source_id} version {}",
                latest.version
            )),
            input.created_by,
        );

        let site = SlugRegistry::allocate_unique(
            &mut tx,
            input.owner_id,
            &copy_name(&source.name),
            &source.name,
            2,
        )
        .await?;
        VersionStore::create_initial(&mut tx, site.id, &initial).await?;
        tx.commit().await?;

        tracing::info!(
            site_id = site.id,
            source_id,
            source_version = latest.version,
            slug = %site.slug,
            "Site duplicated"
        );
        Ok(site)
    }

    /// Apply a partial update of name, slug and status in one transaction.
    ///
    /// The only status change accepted is to `archived`. Any change to an
    /// archived site is rejected.
    pub async fn update_info(
        pool: &PgPool,
        site_id: DbId,
        input: &UpdateSiteInfo,
    ) -> SiteResult<Site> {
        let name = input.name.as_deref().map(normalize_name).transpose()?;

        let mut tx = pool.begin().await?;
        let mut site = lock_site(&mut tx, site_id).await?;

        let next_status = match input.status.as_deref() {
            Some(requested) => requested_transition(site.id, site.status(), requested)?,
            None => None,
        };
        if name.is_some() || input.slug.is_some() {
            ensure_writable(site.id, site.status())?;
        }

        if let Some(name) = name.filter(|n| *n != site.name) {
            site = SiteRepo::update_name(&mut tx, site.id, &name).await?;
            tracing::info!(site_id, name = %site.name, "Site renamed");
        }
        if let Some(slug) = input.slug.as_deref() {
            site = SlugRegistry::rename(&mut tx, &site, slug).await?;
        }
        if next_status == Some(SiteStatus::Archived) {
            site = PublishCoordinator::archive_locked(&mut tx, &site).await?;
        }

        tx.commit().await?;
        Ok(site)
    }
}
