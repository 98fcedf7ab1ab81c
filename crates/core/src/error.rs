use crate::types::{DbId, VersionNumber};

/// Domain errors shared by every layer.
///
/// `NotFound`, `TokenInvalid`, `TokenExpired` and `SiteArchived` are terminal
/// for a request. `SlugConflict`, `GenerationFailure` and `VersionRace` may
/// succeed when retried with adjusted input or later.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Version {version} not found for site {site_id}")]
    VersionNotFound {
        site_id: DbId,
        version: VersionNumber,
    },

    #[error("No active site with slug '{0}'")]
    SlugNotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Slug '{0}' is already in use")]
    SlugConflict(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Site {0} is archived and no longer accepts changes")]
    SiteArchived(DbId),

    #[error("Preview token is invalid")]
    TokenInvalid,

    #[error("Preview token has expired")]
    TokenExpired,

    #[error("Document generation failed: {0}")]
    GenerationFailure(String),

    #[error("Could not allocate a version for site {site_id} after {attempts} attempts")]
    VersionRace { site_id: DbId, attempts: u32 },

    #[error("Internal error: {0}")]
    Internal(String),
}
