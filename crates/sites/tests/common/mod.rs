//! Shared fixtures for the site service integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use serde_json::{json, Value};
use sqlx::PgPool;
use vitrine_core::refinement::RefinementEngine;
use vitrine_db::models::site::{CreateSite, Site};
use vitrine_db::models::site_version::AppendSiteVersion;
use vitrine_sites::{SiteService, SiteServiceConfig};

pub const OWNER: i64 = 42;

pub fn service(pool: PgPool) -> SiteService {
    SiteService::new(pool, SiteServiceConfig::default())
}

pub fn service_with_engine(pool: PgPool, engine: Arc<dyn RefinementEngine>) -> SiteService {
    SiteService::new(pool, SiteServiceConfig::default()).with_refinement_engine(engine)
}

/// A publishable document whose hero headline is `headline`.
pub fn document(headline: &str) -> Value {
    json!({
        "metadata": { "title": "Loja", "description": "Uma loja" },
        "theme": { "primary_color": "#336699", "font_family": "Inter" },
        "pages": [{
            "name": "Home",
            "sections": [
                { "type": "hero", "content": { "headline": headline } },
                { "type": "cta", "content": {
                    "headline": "Fale conosco",
                    "button_label": "Contato",
                    "button_href": "/contato"
                }}
            ]
        }]
    })
}

/// A valid draft document with no pages (not publishable).
pub fn empty_document() -> Value {
    json!({
        "metadata": { "title": "Rascunho" },
        "theme": { "primary_color": "#000", "font_family": "Inter" },
        "pages": []
    })
}

pub async fn create_site(svc: &SiteService, name: &str) -> Site {
    svc.create_site(&CreateSite {
        owner_id: OWNER,
        name: name.to_string(),
        document: document("v1"),
        created_by: Some(1),
    })
    .await
    .unwrap()
}

pub fn append_input(headline: &str) -> AppendSiteVersion {
    AppendSiteVersion {
        document: document(headline),
        theme: None,
        notes: None,
        created_by: Some(1),
    }
}
