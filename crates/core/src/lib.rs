//! Pure domain logic for site versioning and publishing.
//!
//! Nothing in this crate touches the database or the network. Storage and
//! HTTP layers build on these types and rules.

pub mod document;
pub mod error;
pub mod hashing;
pub mod preview;
pub mod refinement;
pub mod site_name;
pub mod site_status;
pub mod slug;
pub mod types;
