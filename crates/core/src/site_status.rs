//! Site lifecycle status and its state machine.
//!
//! The enum discriminants match the seed data order (1-based) of the
//! `site_statuses` lookup table.
//!
//! ```text
//! draft ──publish──▶ published ──publish/rollback──▶ published
//!   │                    │
//!   └──────archive───────┴──────▶ archived (terminal)
//! ```
//!
//! Appending revisions never changes the status: a published site keeps
//! serving its snapshot while new drafts accumulate behind it.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::DbId;

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

/// Site lifecycle status.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteStatus {
    Draft = 1,
    Published = 2,
    Archived = 3,
}

impl SiteStatus {
    /// Return the database status ID.
    pub fn id(self) -> StatusId {
        self as StatusId
    }

    /// Look up a status by its database ID.
    pub fn from_id(id: StatusId) -> Option<Self> {
        match id {
            1 => Some(Self::Draft),
            2 => Some(Self::Published),
            3 => Some(Self::Archived),
            _ => None,
        }
    }

    /// Parse the wire name used by the HTTP layer.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "draft" => Some(Self::Draft),
            "published" => Some(Self::Published),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Archived => "archived",
        }
    }

    /// Whether the site still accepts appends, publishes, renames and grants.
    pub fn accepts_writes(self) -> bool {
        self != Self::Archived
    }

    /// Whether the state machine has an edge from `self` to `next`.
    ///
    /// Self-loops are allowed for `Published` (re-publish) and `Archived`
    /// (idempotent archive).
    pub fn can_transition_to(self, next: SiteStatus) -> bool {
        matches!(
            (self, next),
            (Self::Draft, Self::Published)
                | (Self::Published, Self::Published)
                | (Self::Draft, Self::Archived)
                | (Self::Published, Self::Archived)
                | (Self::Archived, Self::Archived)
        )
    }
}

impl From<SiteStatus> for StatusId {
    fn from(value: SiteStatus) -> Self {
        value as StatusId
    }
}

/// Fail with [`CoreError::SiteArchived`] unless the site accepts writes.
pub fn ensure_writable(site_id: DbId, status: SiteStatus) -> Result<(), CoreError> {
    if status.accepts_writes() {
        Ok(())
    } else {
        Err(CoreError::SiteArchived(site_id))
    }
}

/// Resolve a status change requested directly by an operator.
///
/// Operators may only archive a site (or restate its current status, which
/// is a no-op and yields `None`). Publishing goes through the publish
/// operation, and nothing leaves `archived`.
pub fn requested_transition(
    site_id: DbId,
    current: SiteStatus,
    requested: &str,
) -> Result<Option<SiteStatus>, CoreError> {
    let next = SiteStatus::from_name(requested).ok_or_else(|| {
        CoreError::Validation(format!(
            "Unknown status '{requested}'. Valid statuses: draft, published, archived"
        ))
    })?;

    if next == current {
        return Ok(None);
    }
    ensure_writable(site_id, current)?;
    if !current.can_transition_to(next) {
        return Err(CoreError::Validation(format!(
            "Cannot change status from {} to {}",
            current.as_str(),
            next.as_str()
        )));
    }
    if next != SiteStatus::Archived {
        return Err(CoreError::Validation(format!(
            "Status can only be changed to 'archived' directly; use publish to go from {} to {}",
            current.as_str(),
            next.as_str()
        )));
    }
    Ok(Some(next))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn status_ids_match_seed_data() {
        assert_eq!(SiteStatus::Draft.id(), 1);
        assert_eq!(SiteStatus::Published.id(), 2);
        assert_eq!(SiteStatus::Archived.id(), 3);
    }

    #[test]
    fn status_id_round_trip() {
        for status in [SiteStatus::Draft, SiteStatus::Published, SiteStatus::Archived] {
            assert_eq!(SiteStatus::from_id(status.id()), Some(status));
            assert_eq!(SiteStatus::from_name(status.as_str()), Some(status));
        }
        assert_eq!(SiteStatus::from_id(9), None);
    }

    #[test]
    fn status_into_status_id() {
        let id: StatusId = SiteStatus::Published.into();
        assert_eq!(id, 2);
    }

    #[test]
    fn transitions() {
        use SiteStatus::*;
        assert!(Draft.can_transition_to(Published));
        assert!(Published.can_transition_to(Published));
        assert!(Draft.can_transition_to(Archived));
        assert!(Published.can_transition_to(Archived));

        assert!(!Published.can_transition_to(Draft));
        assert!(!Archived.can_transition_to(Draft));
        assert!(!Archived.can_transition_to(Published));
    }

    #[test]
    fn archived_is_terminal_for_writes() {
        assert!(ensure_writable(1, SiteStatus::Draft).is_ok());
        assert!(ensure_writable(1, SiteStatus::Published).is_ok());
        assert_matches!(
            ensure_writable(7, SiteStatus::Archived),
            Err(CoreError::SiteArchived(7))
        );
    }

    #[test]
    fn operator_may_only_archive() {
        assert_matches!(
            requested_transition(1, SiteStatus::Draft, "archived"),
            Ok(Some(SiteStatus::Archived))
        );
        assert_matches!(
            requested_transition(1, SiteStatus::Draft, "published"),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            requested_transition(1, SiteStatus::Published, "draft"),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn requested_change_must_be_a_state_machine_edge() {
        assert_matches!(
            requested_transition(1, SiteStatus::Published, "draft"),
            Err(CoreError::Validation(msg)) if msg.starts_with("Cannot change status")
        );
    }

    #[test]
    fn restating_current_status_is_noop() {
        assert_matches!(
            requested_transition(1, SiteStatus::Published, "published"),
            Ok(None)
        );
        assert_matches!(
            requested_transition(1, SiteStatus::Archived, "archived"),
            Ok(None)
        );
    }

    #[test]
    fn nothing_leaves_archived() {
        assert_matches!(
            requested_transition(4, SiteStatus::Archived, "draft"),
            Err(CoreError::SiteArchived(4))
        );
    }

    #[test]
    fn unknown_status_rejected() {
        assert_matches!(
            requested_transition(1, SiteStatus::Draft, "deleted"),
            Err(CoreError::Validation(_))
        );
    }
}
