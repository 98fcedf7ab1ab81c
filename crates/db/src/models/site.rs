//! Site entity and its write DTOs.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use vitrine_core::document::Document;
use vitrine_core::site_status::{SiteStatus, StatusId};
use vitrine_core::types::{DbId, Timestamp, VersionNumber};

/// A row from the `sites` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Site {
    pub id: DbId,
    pub owner_id: DbId,
    pub name: String,
    pub slug: String,
    /// `false` once the slug has been released (on archive).
    pub slug_active: bool,
    pub status_id: StatusId,
    pub published_version: Option<VersionNumber>,
    pub published_snapshot: Option<Json<Document>>,
    pub published_at: Option<Timestamp>,
    #[serde(skip_serializing)]
    pub preview_token_hash: Option<String>,
    pub preview_expires_at: Option<Timestamp>,
    pub archived_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Site {
    /// The lifecycle status of this site.
    ///
    /// `status_id` is a foreign key into `site_statuses`, so an unknown ID
    /// cannot come from the database; it is treated as archived (read-only).
    pub fn status(&self) -> SiteStatus {
        SiteStatus::from_id(self.status_id).unwrap_or(SiteStatus::Archived)
    }
}

/// DTO for creating a site together with its first revision.
#[derive(Debug, Deserialize)]
pub struct CreateSite {
    pub owner_id: DbId,
    pub name: String,
    /// Validated against the document shape before anything is written.
    pub document: serde_json::Value,
    pub created_by: Option<DbId>,
}

/// DTO for duplicating an existing site into a new draft.
#[derive(Debug, Deserialize)]
pub struct DuplicateSite {
    pub owner_id: DbId,
    pub created_by: Option<DbId>,
}

/// DTO for updating site info. Only `Some` fields are applied.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateSiteInfo {
    pub name: Option<String>,
    pub slug: Option<String>,
    /// Only `"archived"` (or the current status) is accepted.
    pub status: Option<String>,
}

/// The public view of a published site: its frozen snapshot only.
#[derive(Debug, Clone, Serialize)]
pub struct PublishedSite {
    pub name: String,
    pub slug: String,
    pub version: VersionNumber,
    pub published_at: Option<Timestamp>,
    pub document: Document,
}

/// DTO for issuing a preview grant. The lifetime defaults to the server setting.
#[derive(Debug, Default, Deserialize)]
pub struct IssuePreviewToken {
    pub ttl_secs: Option<i64>,
}
