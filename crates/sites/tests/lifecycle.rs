//! Site creation, slug allocation, duplication, info updates and archive.

mod common;

use assert_matches::assert_matches;
use common::{append_input, create_site, document, service, OWNER};
use sqlx::PgPool;
use vitrine_core::error::CoreError;
use vitrine_core::site_status::SiteStatus;
use vitrine_db::models::site::{CreateSite, DuplicateSite, UpdateSiteInfo};
use vitrine_sites::SiteError;

// ---------------------------------------------------------------------------
// Creation and slugs
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_site_starts_as_draft_with_revision_1(pool: PgPool) {
    let svc = service(pool);
    let site = create_site(&svc, "Café & Cia!!").await;

    assert_eq!(site.slug, "cafe-cia");
    assert_eq!(site.name, "Café & Cia!!");
    assert_eq!(site.status(), SiteStatus::Draft);
    assert!(site.published_version.is_none());

    let versions = svc.list_versions(site.id).await.unwrap();
    assert_eq!(versions.len(), 1);
    assert_eq!(versions[0].version, 1);
    assert_eq!(versions[0].notes.as_deref(), Some("Initial version"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_slug_allocation_suffixes(pool: PgPool) {
    let svc = service(pool);
    let a = create_site(&svc, "Loja").await;
    let b = create_site(&svc, "Loja").await;
    let c = create_site(&svc, "loja").await;

    assert_eq!(a.slug, "loja");
    assert_eq!(b.slug, "loja-2");
    assert_eq!(c.slug, "loja-3");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_creates_get_distinct_slugs(pool: PgPool) {
    let svc = service(pool);
    let inputs: Vec<CreateSite> = (0..5)
        .map(|_| CreateSite {
            owner_id: OWNER,
            name: "Padaria".to_string(),
            document: document("v1"),
            created_by: None,
        })
        .collect();
    let results = futures::future::join_all(inputs.iter().map(|input| svc.create_site(input))).await;

    let mut slugs: Vec<String> = results.into_iter().map(|r| r.unwrap().slug).collect();
    slugs.sort();
    assert_eq!(
        slugs,
        vec!["padaria", "padaria-2", "padaria-3", "padaria-4", "padaria-5"]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_name_without_slug_characters_falls_back(pool: PgPool) {
    let svc = service(pool);
    let site = create_site(&svc, "!!!").await;
    assert_eq!(site.slug, "site");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_document_writes_nothing(pool: PgPool) {
    let svc = service(pool.clone());
    let result = svc
        .create_site(&CreateSite {
            owner_id: OWNER,
            name: "Loja".to_string(),
            document: serde_json::json!({ "metadata": { "title": "" } }),
            created_by: None,
        })
        .await;
    assert_matches!(result, Err(SiteError::Core(CoreError::Validation(_))));

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sites")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_blank_name_rejected(pool: PgPool) {
    let svc = service(pool);
    let result = svc
        .create_site(&CreateSite {
            owner_id: OWNER,
            name: "   ".to_string(),
            document: document("v1"),
            created_by: None,
        })
        .await;
    assert_matches!(result, Err(SiteError::Core(CoreError::Validation(_))));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_slug_available(pool: PgPool) {
    let svc = service(pool);
    create_site(&svc, "Loja").await;

    assert!(!svc.slug_available("loja").await.unwrap());
    assert!(svc.slug_available("loja-2").await.unwrap());
    assert_matches!(
        svc.slug_available("Not A Slug").await,
        Err(SiteError::Core(CoreError::Validation(_)))
    );
}

// ---------------------------------------------------------------------------
// Duplication
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_copies_latest_revision_only(pool: PgPool) {
    let svc = service(pool);
    let source = create_site(&svc, "Loja").await;
    svc.append_version(source.id, &append_input("v2")).await.unwrap();
    svc.publish(source.id, 2).await.unwrap();
    svc.issue_preview_token(source.id, None).await.unwrap();

    let source_before = svc.get_site(source.id).await.unwrap();
    let versions_before = svc.list_versions(source.id).await.unwrap();

    let copy = svc
        .duplicate_site(
            source.id,
            &DuplicateSite {
                owner_id: 7,
                created_by: Some(7),
            },
        )
        .await
        .unwrap();

    assert_ne!(copy.id, source.id);
    assert_eq!(copy.name, "Loja (copy)");
    assert_eq!(copy.slug, "loja-2");
    assert_eq!(copy.owner_id, 7);
    assert_eq!(copy.status(), SiteStatus::Draft);
    assert!(copy.published_version.is_none());
    assert!(copy.published_snapshot.is_none());
    assert!(copy.preview_token_hash.is_none());

    let copy_versions = svc.list_versions(copy.id).await.unwrap();
    assert_eq!(copy_versions.len(), 1);
    assert_eq!(copy_versions[0].version, 1);
    assert_eq!(copy_versions[0].document.0, versions_before[0].document.0);
    assert_eq!(copy_versions[0].theme.0, versions_before[0].theme.0);

    // Source untouched.
    let source_after = svc.get_site(source.id).await.unwrap();
    assert_eq!(source_after.updated_at, source_before.updated_at);
    assert_eq!(source_after.published_version, Some(2));
    let versions_after = svc.list_versions(source.id).await.unwrap();
    assert_eq!(versions_after.len(), versions_before.len());
    for (after, before) in versions_after.iter().zip(&versions_before) {
        assert_eq!(after.version, before.version);
        assert_eq!(after.created_at, before.created_at);
        assert_eq!(after.document.0, before.document.0);
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_of_archived_site_is_allowed(pool: PgPool) {
    let svc = service(pool);
    let source = create_site(&svc, "Loja").await;
    svc.archive(source.id).await.unwrap();

    let copy = svc
        .duplicate_site(
            source.id,
            &DuplicateSite {
                owner_id: OWNER,
                created_by: None,
            },
        )
        .await
        .unwrap();
    // Copies are always suffixed, even when the base slug was released.
    assert_eq!(copy.slug, "loja-2");
    assert_eq!(copy.name, "Loja (copy)");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_missing_source(pool: PgPool) {
    let svc = service(pool);
    let result = svc
        .duplicate_site(
            999,
            &DuplicateSite {
                owner_id: OWNER,
                created_by: None,
            },
        )
        .await;
    assert_matches!(
        result,
        Err(SiteError::Core(CoreError::NotFound { id: 999, .. }))
    );
}

// ---------------------------------------------------------------------------
// Info updates
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_name_and_slug(pool: PgPool) {
    let svc = service(pool);
    let site = create_site(&svc, "Loja").await;

    let updated = svc
        .update_site_info(
            site.id,
            &UpdateSiteInfo {
                name: Some("  Loja Nova ".to_string()),
                slug: Some("loja-nova".to_string()),
                status: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Loja Nova");
    assert_eq!(updated.slug, "loja-nova");
    assert!(svc.slug_available("loja").await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_rename_to_taken_slug_conflicts(pool: PgPool) {
    let svc = service(pool);
    let a = create_site(&svc, "Loja").await;
    create_site(&svc, "Padaria").await;

    let result = svc
        .update_site_info(
            a.id,
            &UpdateSiteInfo {
                slug: Some("padaria".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert_matches!(result, Err(SiteError::Core(CoreError::SlugConflict(s))) if s == "padaria");

    // Keeping the current slug is fine.
    let same = svc
        .update_site_info(
            a.id,
            &UpdateSiteInfo {
                slug: Some("loja".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(same.slug, "loja");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_slug_rejected(pool: PgPool) {
    let svc = service(pool);
    let site = create_site(&svc, "Loja").await;
    let result = svc
        .update_site_info(
            site.id,
            &UpdateSiteInfo {
                slug: Some("Loja Nova".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert_matches!(result, Err(SiteError::Core(CoreError::Validation(_))));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_status_update_only_archives(pool: PgPool) {
    let svc = service(pool);
    let site = create_site(&svc, "Loja").await;

    let result = svc
        .update_site_info(
            site.id,
            &UpdateSiteInfo {
                status: Some("published".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert_matches!(result, Err(SiteError::Core(CoreError::Validation(_))));

    let archived = svc
        .update_site_info(
            site.id,
            &UpdateSiteInfo {
                status: Some("archived".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(archived.status(), SiteStatus::Archived);
    assert!(!archived.slug_active);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_failed_update_is_atomic(pool: PgPool) {
    let svc = service(pool);
    let a = create_site(&svc, "Loja").await;
    create_site(&svc, "Padaria").await;

    let result = svc
        .update_site_info(
            a.id,
            &UpdateSiteInfo {
                name: Some("Renamed".to_string()),
                slug: Some("padaria".to_string()),
                status: None,
            },
        )
        .await;
    assert!(result.is_err());

    let after = svc.get_site(a.id).await.unwrap();
    assert_eq!(after.name, "Loja");
    assert_eq!(after.slug, "loja");
}

// ---------------------------------------------------------------------------
// Archive
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_archive_hides_and_freezes_site(pool: PgPool) {
    let svc = service(pool);
    let site = create_site(&svc, "Loja").await;
    let kept = create_site(&svc, "Padaria").await;
    svc.publish(site.id, 1).await.unwrap();

    let archived = svc.archive(site.id).await.unwrap();
    assert_eq!(archived.status(), SiteStatus::Archived);
    assert!(archived.archived_at.is_some());

    // Hidden from the default listing, still readable by ID.
    let listed = svc.list_sites(OWNER, false).await.unwrap();
    assert_eq!(listed.iter().map(|s| s.id).collect::<Vec<_>>(), vec![kept.id]);
    let all = svc.list_sites(OWNER, true).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(svc.get_site(site.id).await.unwrap().id, site.id);

    // Every mutation is refused.
    let id = site.id;
    assert_matches!(
        svc.publish(id, 1).await,
        Err(SiteError::Core(CoreError::SiteArchived(x))) if x == id
    );
    assert_matches!(
        svc.append_version(id, &append_input("v2")).await,
        Err(SiteError::Core(CoreError::SiteArchived(_)))
    );
    assert_matches!(
        svc.rollback(id, 1, None, None).await,
        Err(SiteError::Core(CoreError::SiteArchived(_)))
    );
    assert_matches!(
        svc.issue_preview_token(id, None).await,
        Err(SiteError::Core(CoreError::SiteArchived(_)))
    );
    assert_matches!(
        svc.update_site_info(
            id,
            &UpdateSiteInfo {
                name: Some("Again".to_string()),
                ..Default::default()
            }
        )
        .await,
        Err(SiteError::Core(CoreError::SiteArchived(_)))
    );

    // No longer served.
    assert_matches!(
        svc.get_published_by_slug("loja").await,
        Err(SiteError::Core(CoreError::SlugNotFound(_)))
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_archive_is_idempotent(pool: PgPool) {
    let svc = service(pool);
    let site = create_site(&svc, "Loja").await;
    let first = svc.archive(site.id).await.unwrap();
    let second = svc.archive(site.id).await.unwrap();
    assert_eq!(first.archived_at, second.archived_at);
    assert_eq!(second.status(), SiteStatus::Archived);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_archived_slug_is_reusable(pool: PgPool) {
    let svc = service(pool);
    let old = create_site(&svc, "Loja").await;
    svc.archive(old.id).await.unwrap();

    let new = create_site(&svc, "Loja").await;
    assert_eq!(new.slug, "loja");
    assert_ne!(new.id, old.id);

    // The archived site keeps its slug text for the record.
    assert_eq!(svc.get_site(old.id).await.unwrap().slug, "loja");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_missing_site(pool: PgPool) {
    let svc = service(pool);
    assert_matches!(
        svc.get_site(12345).await,
        Err(SiteError::Core(CoreError::NotFound { entity: "site", .. }))
    );
}
