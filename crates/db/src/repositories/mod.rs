//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods. Single
//! statement reads accept any `PgExecutor` (a pool or an open transaction);
//! methods meant to run under a site lock take `&mut PgConnection`.

pub mod site_repo;
pub mod site_version_repo;

pub use site_repo::SiteRepo;
pub use site_version_repo::SiteVersionRepo;
