//! Site revision model.
//!
//! Revisions are immutable snapshots of a site's document, numbered 1, 2, ...
//! per site without gaps.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use vitrine_core::document::{Document, Theme};
use vitrine_core::types::{DbId, Timestamp, VersionNumber};

/// A row from the `site_versions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SiteVersion {
    pub id: DbId,
    pub site_id: DbId,
    pub version: VersionNumber,
    pub document: Json<Document>,
    pub theme: Json<Theme>,
    pub notes: Option<String>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
}

/// Everything needed to write one revision.
#[derive(Debug, Clone)]
pub struct NewSiteVersion {
    pub document: Document,
    pub theme: Theme,
    pub notes: Option<String>,
    pub created_by: Option<DbId>,
}

impl NewSiteVersion {
    /// Build a revision. A supplied theme replaces the document's own, so the
    /// stored document and theme columns always agree.
    pub fn new(
        mut document: Document,
        theme: Option<Theme>,
        notes: Option<String>,
        created_by: Option<DbId>,
    ) -> Self {
        if let Some(theme) = theme {
            document.theme = theme;
        }
        let theme = document.theme.clone();
        Self {
            document,
            theme,
            notes,
            created_by,
        }
    }
}

/// DTO for appending a revision.
#[derive(Debug, Deserialize)]
pub struct AppendSiteVersion {
    /// Validated against the document shape before anything is written.
    pub document: serde_json::Value,
    /// Defaults to the document's theme.
    pub theme: Option<Theme>,
    pub notes: Option<String>,
    pub created_by: Option<DbId>,
}

/// DTO for asking the refinement engine for a new revision.
#[derive(Debug, Deserialize)]
pub struct RefineSite {
    pub instruction: String,
    pub notes: Option<String>,
    pub created_by: Option<DbId>,
}

/// DTO for rolling back to an earlier revision.
#[derive(Debug, Deserialize)]
pub struct RollbackSite {
    pub version: VersionNumber,
    pub notes: Option<String>,
    pub created_by: Option<DbId>,
}

/// DTO for publishing a revision.
#[derive(Debug, Deserialize)]
pub struct PublishSite {
    pub version: VersionNumber,
}
