//! Site versioning and publishing over Postgres.
//!
//! Each component owns one concern and every mutation of a site runs in a
//! single transaction that first takes the site row lock:
//!
//! - [`slug_registry::SlugRegistry`]: globally unique public slugs
//! - [`version_store::VersionStore`]: append-only, gap-free revisions
//! - [`publish::PublishCoordinator`]: publish, rollback and archive
//! - [`preview::PreviewTokenIssuer`]: time-limited draft preview grants
//! - [`lifecycle::SiteLifecycleManager`]: create, duplicate, update info
//!
//! [`service::SiteService`] ties them together behind one handle.

pub mod error;
pub mod lifecycle;
mod lookup;
pub mod preview;
pub mod publish;
pub mod service;
pub mod slug_registry;
pub mod version_store;

pub use error::{SiteError, SiteResult};
pub use service::{SiteService, SiteServiceConfig};
