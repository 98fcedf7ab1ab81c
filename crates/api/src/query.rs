//! Query parameter types for API handlers.

use serde::Deserialize;
use vitrine_core::types::DbId;

/// `?owner_id=&include_archived=` for the site listing.
#[derive(Debug, Deserialize)]
pub struct ListSitesParams {
    pub owner_id: DbId,
    #[serde(default)]
    pub include_archived: bool,
}

/// `?slug=` for the availability check.
#[derive(Debug, Deserialize)]
pub struct SlugParams {
    pub slug: String,
}

/// `?token=` on preview links.
#[derive(Debug, Deserialize)]
pub struct PreviewParams {
    #[serde(default)]
    pub token: String,
}
